use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

pub const TOP_VALUES_LIMIT: usize = 5;

/// A descriptive statistic that may not be computable, e.g. the standard
/// deviation of a single sample. `Undefined` is neither zero nor absent: it
/// serializes as `null` in a field that is always present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistic {
    Value(f64),
    Undefined,
}

impl Statistic {
    /// NaN is undefined. Infinities are values.
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) if !v.is_nan() => Statistic::Value(v),
            _ => Statistic::Undefined,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Statistic::Value(v) => Some(v),
            Statistic::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Statistic::Undefined)
    }
}

impl Serialize for Statistic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Statistic::Value(v) => serializer.serialize_f64(*v),
            Statistic::Undefined => serializer.serialize_none(),
        }
    }
}

/// Per-column values kept in dataset column order. Serializes as a JSON
/// object whose keys follow that order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap<T>(Vec<(String, T)>);

impl<T> ColumnMap<T> {
    pub fn get(&self, column: &str) -> Option<&T> {
        self.0.iter().find(|(name, _)| name == column).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(name, v)| (name.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> FromIterator<(String, T)> for ColumnMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        ColumnMap(iter.into_iter().collect())
    }
}

impl<T: Serialize> Serialize for ColumnMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Names of the numeric and categorical columns, each in dataset order.
/// The two lists never share a name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Statistic,
    pub std: Statistic,
    pub min: Statistic,
    #[serde(rename = "25%")]
    pub q1: Statistic,
    #[serde(rename = "50%")]
    pub median: Statistic,
    #[serde(rename = "75%")]
    pub q3: Statistic,
    pub max: Statistic,
}

impl NumericSummary {
    pub fn undefined() -> Self {
        Self {
            count: 0,
            mean: Statistic::Undefined,
            std: Statistic::Undefined,
            min: Statistic::Undefined,
            q1: Statistic::Undefined,
            median: Statistic::Undefined,
            q3: Statistic::Undefined,
            max: Statistic::Undefined,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopValue {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoricalSummary {
    pub unique_count: usize,
    pub top_values: SmallVec<[TopValue; TOP_VALUES_LIMIT]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub shape: Shape,
    pub columns: Vec<String>,
    pub dtypes: ColumnMap<&'static str>,
    pub missing_counts: ColumnMap<usize>,
    pub missing_percentage: ColumnMap<f64>,
    pub duplicate_row_count: usize,
    pub numeric_summary: ColumnMap<NumericSummary>,
    pub categorical_summary: ColumnMap<CategoricalSummary>,
}

/// One chart for the renderer to draw. Carries no rendering state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    MissingHeatmap,
    CorrelationHeatmap { columns: Vec<String> },
    Histogram { column: String },
    BarChart { column: String },
    Scatter { x: String, y: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Statistic>>,
}

impl CorrelationMatrix {
    pub fn get(&self, x: &str, y: &str) -> Option<Statistic> {
        let i = self.columns.iter().position(|c| c == x)?;
        let j = self.columns.iter().position(|c| c == y)?;
        self.values.get(i).and_then(|row| row.get(j)).copied()
    }
}
