use std::collections::{HashMap, HashSet};
use rayon::prelude::*;
use super::classifier::resolve_columns;
use super::dataset::{ColumnClass, ColumnData, Dataset};
use super::types::*;
use super::utils::*;
use crate::error::EdaError;

/// Builds the descriptive report for one dataset.
///
/// Statistics are computed over non-missing values only. A numeric column
/// without any value reports `count = 0` and every other statistic as
/// [`Statistic::Undefined`]. Ragged datasets are refused rather than
/// truncated or padded.
pub fn build_summary(
    dataset: &Dataset,
    classification: &ColumnClassification,
) -> Result<DatasetSummary, EdaError> {
    let start = std::time::Instant::now();
    let rows = dataset.validate()?;
    let numeric_columns = resolve_columns(dataset, &classification.numeric, ColumnClass::Numeric)?;
    let categorical_columns =
        resolve_columns(dataset, &classification.categorical, ColumnClass::Categorical)?;

    let columns: Vec<String> = dataset.columns().iter().map(|c| c.name.clone()).collect();
    let missing: Vec<usize> = dataset.columns().iter().map(|c| c.data.missing_count()).collect();

    let dtypes = dataset
        .columns()
        .iter()
        .map(|c| (c.name.clone(), c.data.dtype_label()))
        .collect();
    let missing_counts = columns.iter().cloned().zip(missing.iter().copied()).collect();
    let missing_percentage = columns
        .iter()
        .cloned()
        .zip(missing.iter().map(|&m| percentage(m, rows)))
        .collect();

    let duplicate_row_count = count_duplicate_rows(dataset, rows);

    let numeric_summary = numeric_columns
        .par_iter()
        .map(|c| (c.name.clone(), summarize_numeric(&c.data)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect();

    let categorical_summary = categorical_columns
        .iter()
        .map(|c| (c.name.clone(), summarize_categorical(c.data.labels().unwrap_or_default())))
        .collect();

    tracing::info!(
        "Summary built for {} rows x {} columns ({} duplicates) in {:?}",
        rows,
        columns.len(),
        duplicate_row_count,
        start.elapsed()
    );

    Ok(DatasetSummary {
        shape: Shape {
            rows,
            columns: columns.len(),
        },
        columns,
        dtypes,
        missing_counts,
        missing_percentage,
        duplicate_row_count,
        numeric_summary,
        categorical_summary,
    })
}

/// Rows whose full tuple of values equals an earlier row. Missing cells in
/// the same position compare equal. The first occurrence is not counted.
fn count_duplicate_rows(dataset: &Dataset, rows: usize) -> usize {
    let mut seen = HashSet::with_capacity(rows);
    (0..rows).filter(|&row| !seen.insert(dataset.row_key(row))).count()
}

fn summarize_numeric(data: &ColumnData) -> NumericSummary {
    let mut values = data.numbers().unwrap_or_default();
    if values.is_empty() {
        return NumericSummary::undefined();
    }

    let avg = mean(&values);
    let std = sample_std(&values);
    sort_values(&mut values);

    NumericSummary {
        count: values.len(),
        mean: Statistic::from_option(avg),
        std: Statistic::from_option(std),
        min: Statistic::from_option(values.first().copied()),
        q1: Statistic::from_option(quantile_sorted(&values, 0.25)),
        median: Statistic::from_option(quantile_sorted(&values, 0.5)),
        q3: Statistic::from_option(quantile_sorted(&values, 0.75)),
        max: Statistic::from_option(values.last().copied()),
    }
}

fn summarize_categorical(labels: &[Option<String>]) -> CategoricalSummary {
    // (value, frequency) in order of first appearance
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for label in labels.iter().flatten() {
        match index.get(label.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(label.as_str(), counts.len());
                counts.push((label.as_str(), 1));
            }
        }
    }

    let unique_count = counts.len();
    // stable sort keeps first-appearance order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    CategoricalSummary {
        unique_count,
        top_values: counts
            .into_iter()
            .take(TOP_VALUES_LIMIT)
            .map(|(value, count)| TopValue {
                value: value.to_string(),
                count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::eda::classifier::classify;
    use crate::services::eda::dataset::Column;
    use anyhow::Result;

    fn text(values: &[Option<&str>]) -> ColumnData {
        ColumnData::Text(values.iter().map(|v| v.map(str::to_string)).collect())
    }

    fn age_city() -> Dataset {
        Dataset::new(vec![
            Column::new("age", ColumnData::Float(vec![Some(25.0), Some(30.0), None, Some(25.0)])),
            Column::new("city", text(&[Some("A"), Some("B"), Some("A"), Some("A")])),
        ])
    }

    fn summarize(ds: &Dataset) -> Result<DatasetSummary> {
        Ok(build_summary(ds, &classify(ds))?)
    }

    #[test]
    fn test_age_city_example() -> Result<()> {
        let summary = summarize(&age_city())?;

        assert_eq!(summary.shape, Shape { rows: 4, columns: 2 });
        assert_eq!(summary.columns, vec!["age", "city"]);
        assert_eq!(summary.dtypes.get("age"), Some(&"float64"));
        assert_eq!(summary.dtypes.get("city"), Some(&"object"));
        assert_eq!(summary.missing_counts.get("age"), Some(&1));
        assert_eq!(summary.missing_counts.get("city"), Some(&0));
        assert_eq!(summary.missing_percentage.get("age"), Some(&25.0));

        let age = summary.numeric_summary.get("age").expect("age summarised");
        assert_eq!(age.count, 3);
        assert_eq!(age.min, Statistic::Value(25.0));
        assert_eq!(age.max, Statistic::Value(30.0));
        assert_eq!(age.median, Statistic::Value(25.0));

        let city = summary.categorical_summary.get("city").expect("city summarised");
        assert_eq!(city.unique_count, 2);
        let top: Vec<(&str, usize)> = city.top_values.iter().map(|t| (t.value.as_str(), t.count)).collect();
        assert_eq!(top, vec![("A", 3), ("B", 1)]);
        Ok(())
    }

    #[test]
    fn test_age_city_last_row_repeats_first() -> Result<()> {
        // (25, "A") occurs at rows 0 and 3
        let summary = summarize(&age_city())?;
        assert_eq!(summary.duplicate_row_count, 1);
        Ok(())
    }

    #[test]
    fn test_two_identical_rows_among_five_count_once() -> Result<()> {
        let ds = Dataset::new(vec![
            Column::new("id", ColumnData::Int(vec![Some(1), Some(2), Some(2), Some(3), Some(4)])),
            Column::new("name", text(&[Some("a"), Some("b"), Some("b"), Some("c"), Some("d")])),
        ]);
        assert_eq!(summarize(&ds)?.duplicate_row_count, 1);
        Ok(())
    }

    #[test]
    fn test_every_repeat_is_counted() -> Result<()> {
        let ds = Dataset::new(vec![Column::new(
            "v",
            ColumnData::Int(vec![Some(7), Some(7), Some(7), Some(8), Some(8)]),
        )]);
        assert_eq!(summarize(&ds)?.duplicate_row_count, 3);
        Ok(())
    }

    #[test]
    fn test_missing_cells_compare_equal_in_duplicates() -> Result<()> {
        let ds = Dataset::new(vec![
            Column::new("x", ColumnData::Float(vec![None, Some(f64::NAN), Some(1.0)])),
            Column::new("y", text(&[Some("k"), Some("k"), Some("k")])),
        ]);
        assert_eq!(summarize(&ds)?.duplicate_row_count, 1);
        Ok(())
    }

    #[test]
    fn test_missing_position_distinguishes_rows() -> Result<()> {
        let ds = Dataset::new(vec![
            Column::new("x", ColumnData::Int(vec![None, Some(1)])),
            Column::new("y", ColumnData::Int(vec![Some(1), None])),
        ]);
        assert_eq!(summarize(&ds)?.duplicate_row_count, 0);
        Ok(())
    }

    #[test]
    fn test_zero_rows_report_undefined_stats() -> Result<()> {
        let ds = Dataset::new(vec![
            Column::new("x", ColumnData::Float(vec![])),
            Column::new("y", ColumnData::Int(vec![])),
        ]);
        let summary = summarize(&ds)?;

        assert_eq!(summary.shape, Shape { rows: 0, columns: 2 });
        assert_eq!(summary.duplicate_row_count, 0);
        assert!(summary.missing_percentage.iter().all(|(_, &p)| p == 0.0));
        assert!(summary.missing_counts.iter().all(|(_, &m)| m == 0));

        let x = summary.numeric_summary.get("x").expect("x present even without rows");
        assert_eq!(x, &NumericSummary::undefined());
        assert!(summary.categorical_summary.is_empty());
        Ok(())
    }

    #[test]
    fn test_all_missing_numeric_column_is_reported_not_dropped() -> Result<()> {
        let ds = Dataset::new(vec![Column::new("x", ColumnData::Float(vec![None, None]))]);
        let summary = summarize(&ds)?;
        let x = summary.numeric_summary.get("x").expect("x kept");
        assert_eq!(x.count, 0);
        assert!(x.mean.is_undefined() && x.max.is_undefined());
        assert_eq!(summary.missing_percentage.get("x"), Some(&100.0));
        Ok(())
    }

    #[test]
    fn test_single_value_has_undefined_std() -> Result<()> {
        let ds = Dataset::new(vec![Column::new("x", ColumnData::Int(vec![Some(4)]))]);
        let summary = summarize(&ds)?;
        let x = summary.numeric_summary.get("x").expect("x kept");
        assert_eq!(x.mean, Statistic::Value(4.0));
        assert!(x.std.is_undefined(), "std of one sample is not computable");
        assert_eq!(x.q1, Statistic::Value(4.0));
        Ok(())
    }

    #[test]
    fn test_infinite_values_are_reported() -> Result<()> {
        let ds = Dataset::new(vec![Column::new(
            "x",
            ColumnData::Float(vec![Some(1.0), Some(f64::INFINITY), Some(3.0)]),
        )]);
        let summary = summarize(&ds)?;
        let x = summary.numeric_summary.get("x").expect("x kept");
        assert_eq!(x.count, 3);
        assert_eq!(x.min, Statistic::Value(1.0));
        assert_eq!(x.median, Statistic::Value(3.0));
        assert_eq!(x.max, Statistic::Value(f64::INFINITY));
        assert_eq!(x.mean, Statistic::Value(f64::INFINITY));
        assert!(x.std.is_undefined(), "std over an infinity is NaN");
        Ok(())
    }

    #[test]
    fn test_top_values_ties_keep_first_appearance() -> Result<()> {
        let ds = Dataset::new(vec![Column::new(
            "c",
            text(&[
                Some("g"), Some("f"), Some("e"), Some("d"), Some("c"), Some("b"), Some("a"),
                Some("a"), None, Some("d"),
            ]),
        )]);
        let summary = summarize(&ds)?;
        let c = summary.categorical_summary.get("c").expect("c kept");
        assert_eq!(c.unique_count, 7, "missing is not a distinct value");
        let top: Vec<&str> = c.top_values.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(top, vec!["d", "a", "g", "f", "e"]);
        Ok(())
    }

    #[test]
    fn test_other_columns_only_appear_in_dtypes_and_missing() -> Result<()> {
        let ds = Dataset::new(vec![
            Column::new("flag", ColumnData::Bool(vec![Some(true), None])),
            Column::new("day", ColumnData::Date(vec![Some("2024-01-01".into()), None])),
        ]);
        let summary = summarize(&ds)?;
        assert_eq!(summary.dtypes.get("flag"), Some(&"bool"));
        assert_eq!(summary.missing_counts.get("day"), Some(&1));
        assert!(summary.numeric_summary.is_empty());
        assert!(summary.categorical_summary.is_empty());
        Ok(())
    }

    #[test]
    fn test_ragged_dataset_is_refused() {
        let ds = Dataset::new(vec![
            Column::new("a", ColumnData::Int(vec![Some(1), Some(2)])),
            Column::new("b", text(&[Some("x")])),
        ]);
        let err = build_summary(&ds, &classify(&ds));
        assert!(matches!(err, Err(EdaError::MalformedDataset(_))));
    }

    #[test]
    fn test_build_is_idempotent() -> Result<()> {
        let ds = age_city();
        assert_eq!(summarize(&ds)?, summarize(&ds)?);
        Ok(())
    }

    #[test]
    fn test_empty_summary_maps_are_serialized() -> Result<()> {
        let ds = Dataset::new(vec![Column::new("flag", ColumnData::Bool(vec![Some(true)]))]);
        let json = serde_json::to_value(summarize(&ds)?)?;
        assert_eq!(json["numeric_summary"], serde_json::json!({}));
        assert_eq!(json["categorical_summary"], serde_json::json!({}));
        assert_eq!(json["shape"]["rows"], 1);
        Ok(())
    }
}
