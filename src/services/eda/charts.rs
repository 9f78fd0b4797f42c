use super::classifier::resolve_columns;
use super::dataset::{ColumnClass, Dataset};
use super::types::{ChartSpec, ColumnClassification};
use crate::error::EdaError;

/// Lists the charts to draw for a dataset, in display order:
///
/// 1. one missing-value heatmap,
/// 2. a correlation heatmap when there are at least two numeric columns,
/// 3. a histogram per numeric column,
/// 4. a bar chart per categorical column,
/// 5. a scatter plot per pair of numeric columns (i < j).
///
/// Nothing is emitted in place of a chart that does not apply.
pub fn plan_charts(
    dataset: &Dataset,
    classification: &ColumnClassification,
) -> Result<Vec<ChartSpec>, EdaError> {
    dataset.validate()?;
    resolve_columns(dataset, &classification.numeric, ColumnClass::Numeric)?;
    resolve_columns(dataset, &classification.categorical, ColumnClass::Categorical)?;

    let numeric = &classification.numeric;
    let categorical = &classification.categorical;
    let pair_count = numeric.len() * numeric.len().saturating_sub(1) / 2;

    let mut charts = Vec::with_capacity(2 + numeric.len() + categorical.len() + pair_count);
    charts.push(ChartSpec::MissingHeatmap);

    if numeric.len() >= 2 {
        charts.push(ChartSpec::CorrelationHeatmap {
            columns: numeric.clone(),
        });
    }

    charts.extend(numeric.iter().map(|column| ChartSpec::Histogram {
        column: column.clone(),
    }));
    charts.extend(categorical.iter().map(|column| ChartSpec::BarChart {
        column: column.clone(),
    }));

    for (i, x) in numeric.iter().enumerate() {
        for y in numeric.iter().skip(i + 1) {
            charts.push(ChartSpec::Scatter {
                x: x.clone(),
                y: y.clone(),
            });
        }
    }

    tracing::debug!(
        "Planned {} charts ({} scatter pairs)",
        charts.len(),
        pair_count
    );
    Ok(charts)
}
