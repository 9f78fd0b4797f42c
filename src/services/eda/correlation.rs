use super::classifier::resolve_columns;
use super::dataset::{ColumnClass, ColumnData, Dataset};
use super::types::{CorrelationMatrix, Statistic};
use super::utils::pearson;
use crate::error::EdaError;

/// Pearson correlation between every pair of the given numeric columns,
/// using only rows where both values are present.
pub fn correlation_matrix(dataset: &Dataset, columns: &[String]) -> Result<CorrelationMatrix, EdaError> {
    let rows = dataset.validate()?;
    let resolved = resolve_columns(dataset, columns, ColumnClass::Numeric)?;

    let mut values = vec![vec![Statistic::Undefined; resolved.len()]; resolved.len()];
    for (i, x) in resolved.iter().enumerate() {
        for (j, y) in resolved.iter().enumerate().skip(i) {
            let r = Statistic::from_option(pearson(&paired(&x.data, &y.data, rows)));
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}

fn paired(x: &ColumnData, y: &ColumnData, rows: usize) -> Vec<(f64, f64)> {
    (0..rows)
        .filter_map(|row| Some((x.number_at(row)?, y.number_at(row)?)))
        .collect()
}
