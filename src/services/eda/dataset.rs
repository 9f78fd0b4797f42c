use std::collections::HashSet;
use crate::error::EdaError;

/// Which statistics and charts apply to a column. Fixed by the column's
/// declared type when the dataset is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnClass {
    Numeric,
    Categorical,
    Other,
}

impl ColumnClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnClass::Numeric => "numeric",
            ColumnClass::Categorical => "categorical",
            ColumnClass::Other => "other",
        }
    }
}

/// Cell values of one column. The variant is the column's declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int(Vec<Option<i64>>),
    /// NaN cells count as missing.
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Bool(Vec<Option<bool>>),
    /// ISO-8601 dates, kept as text.
    Date(Vec<Option<String>>),
    /// ISO-8601 timestamps, kept as text.
    Datetime(Vec<Option<String>>),
}

/// Hashable view of one cell, used to compare whole rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKey<'a> {
    Missing,
    Int(i64),
    Float(u64),
    Text(&'a str),
    Bool(bool),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Text(v)
            | ColumnData::Date(v)
            | ColumnData::Datetime(v) => v.len(),
        }
    }

    /// Type label shown in reports. Uses the pandas names users of the
    /// dashboard already know.
    pub fn dtype_label(&self) -> &'static str {
        match self {
            ColumnData::Int(_) => "int64",
            ColumnData::Float(_) => "float64",
            ColumnData::Text(_) => "object",
            ColumnData::Bool(_) => "bool",
            ColumnData::Date(_) | ColumnData::Datetime(_) => "datetime64[ns]",
        }
    }

    pub fn class(&self) -> ColumnClass {
        match self {
            ColumnData::Int(_) | ColumnData::Float(_) => ColumnClass::Numeric,
            ColumnData::Text(_) => ColumnClass::Categorical,
            ColumnData::Bool(_) | ColumnData::Date(_) | ColumnData::Datetime(_) => ColumnClass::Other,
        }
    }

    pub fn is_missing(&self, row: usize) -> bool {
        matches!(self.cell_key(row), CellKey::Missing)
    }

    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&row| self.is_missing(row)).count()
    }

    /// Numeric value at `row`, `None` when missing or when the column is not numeric.
    pub fn number_at(&self, row: usize) -> Option<f64> {
        match self {
            ColumnData::Int(v) => v.get(row).copied().flatten().map(|x| x as f64),
            ColumnData::Float(v) => v.get(row).copied().flatten().filter(|x| !x.is_nan()),
            _ => None,
        }
    }

    /// Non-missing values of a numeric column in row order.
    pub fn numbers(&self) -> Option<Vec<f64>> {
        match self {
            ColumnData::Int(_) | ColumnData::Float(_) => {
                Some((0..self.len()).filter_map(|row| self.number_at(row)).collect())
            }
            _ => None,
        }
    }

    /// Cells of a text or categorical column.
    pub fn labels(&self) -> Option<&[Option<String>]> {
        match self {
            ColumnData::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn cell_key(&self, row: usize) -> CellKey<'_> {
        match self {
            ColumnData::Int(v) => match v.get(row).copied().flatten() {
                Some(x) => CellKey::Int(x),
                None => CellKey::Missing,
            },
            ColumnData::Float(v) => match v.get(row).copied().flatten() {
                Some(x) if x.is_nan() => CellKey::Missing,
                // -0.0 and 0.0 compare equal
                Some(x) if x == 0.0 => CellKey::Float(0.0f64.to_bits()),
                Some(x) => CellKey::Float(x.to_bits()),
                None => CellKey::Missing,
            },
            ColumnData::Bool(v) => match v.get(row).copied().flatten() {
                Some(b) => CellKey::Bool(b),
                None => CellKey::Missing,
            },
            ColumnData::Text(v)
            | ColumnData::Date(v)
            | ColumnData::Datetime(v) => match v.get(row).and_then(|s| s.as_deref()) {
                Some(s) => CellKey::Text(s),
                None => CellKey::Missing,
            },
        }
    }

    /// Cell rendered for display; missing cells render as an empty string.
    pub fn display_at(&self, row: usize) -> String {
        match self.cell_key(row) {
            CellKey::Missing => String::new(),
            CellKey::Int(x) => x.to_string(),
            CellKey::Float(bits) => f64::from_bits(bits).to_string(),
            CellKey::Text(s) => s.to_string(),
            CellKey::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// In-memory table of named columns. Built once per upload and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Row count, taken from the first column. Only meaningful once
    /// [`Dataset::validate`] has passed.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    /// Checks that all columns have the same length and that names are
    /// unique. Returns the row count.
    pub fn validate(&self) -> Result<usize, EdaError> {
        let height = self.height();
        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(EdaError::MalformedDataset(format!(
                    "column name '{}' appears more than once",
                    column.name
                )));
            }
            if column.data.len() != height {
                return Err(EdaError::MalformedDataset(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name,
                    column.data.len(),
                    height
                )));
            }
        }
        Ok(height)
    }

    pub fn row_key(&self, row: usize) -> Vec<CellKey<'_>> {
        self.columns.iter().map(|c| c.data.cell_key(row)).collect()
    }

    /// First `limit` rows rendered as text.
    pub fn preview(&self, limit: usize) -> Vec<Vec<String>> {
        (0..self.height().min(limit))
            .map(|row| self.columns.iter().map(|c| c.data.display_at(row)).collect())
            .collect()
    }
}
