use super::dataset::{Column, ColumnClass, Dataset};
use super::types::ColumnClassification;
use crate::error::EdaError;

/// Splits the dataset's columns into numeric and categorical names by
/// declared type. Columns of any other type (booleans, dates) land in
/// neither list.
pub fn classify(dataset: &Dataset) -> ColumnClassification {
    let mut classification = ColumnClassification::default();
    for column in dataset.columns() {
        match column.data.class() {
            ColumnClass::Numeric => classification.numeric.push(column.name.clone()),
            ColumnClass::Categorical => classification.categorical.push(column.name.clone()),
            ColumnClass::Other => {}
        }
    }
    tracing::debug!(
        "Classified {} columns: {} numeric, {} categorical",
        dataset.width(),
        classification.numeric.len(),
        classification.categorical.len()
    );
    classification
}

/// Looks up each named column and checks it belongs to `class`.
pub(crate) fn resolve_columns<'a>(
    dataset: &'a Dataset,
    names: &[String],
    class: ColumnClass,
) -> Result<Vec<&'a Column>, EdaError> {
    names
        .iter()
        .map(|name| {
            let column = dataset
                .column(name)
                .ok_or_else(|| EdaError::UnknownColumn(name.clone()))?;
            if column.data.class() != class {
                return Err(EdaError::ClassMismatch {
                    column: name.clone(),
                    dtype: column.data.dtype_label(),
                    class: class.as_str(),
                });
            }
            Ok(column)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::eda::dataset::{Column, ColumnData};

    fn mixed_dataset() -> Dataset {
        Dataset::new(vec![
            Column::new("when", ColumnData::Datetime(vec![Some("2024-01-01T00:00:00".into())])),
            Column::new("price", ColumnData::Float(vec![Some(1.0)])),
            Column::new("city", ColumnData::Text(vec![Some("A".into())])),
            Column::new("flag", ColumnData::Bool(vec![Some(true)])),
            Column::new("qty", ColumnData::Int(vec![Some(3)])),
            Column::new("tier", ColumnData::Text(vec![None])),
        ])
    }

    #[test]
    fn test_partition_follows_dataset_order() {
        let classification = classify(&mixed_dataset());
        assert_eq!(classification.numeric, vec!["price", "qty"]);
        assert_eq!(classification.categorical, vec!["city", "tier"]);
    }

    #[test]
    fn test_partition_is_disjoint_subset_of_columns() {
        let ds = mixed_dataset();
        let classification = classify(&ds);
        for name in classification.numeric.iter().chain(&classification.categorical) {
            assert!(ds.column(name).is_some(), "{} must be a dataset column", name);
        }
        assert!(
            classification.numeric.iter().all(|n| !classification.categorical.contains(n)),
            "numeric and categorical sets must not overlap"
        );
    }

    #[test]
    fn test_other_types_are_excluded() {
        let classification = classify(&mixed_dataset());
        let all: Vec<&String> = classification.numeric.iter().chain(&classification.categorical).collect();
        assert!(!all.iter().any(|n| n.as_str() == "when" || n.as_str() == "flag"));
    }

    #[test]
    fn test_resolve_rejects_unknown_and_mismatched_columns() {
        let ds = mixed_dataset();
        let unknown = resolve_columns(&ds, &["nope".to_string()], ColumnClass::Numeric);
        assert_eq!(unknown, Err(EdaError::UnknownColumn("nope".to_string())));

        let mismatched = resolve_columns(&ds, &["city".to_string()], ColumnClass::Numeric);
        assert!(matches!(mismatched, Err(EdaError::ClassMismatch { .. })));
    }

    #[test]
    fn test_empty_dataset_has_empty_partition() {
        assert_eq!(classify(&Dataset::default()), ColumnClassification::default());
    }
}
