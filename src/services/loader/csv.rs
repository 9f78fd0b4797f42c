use std::io::Cursor;
use polars::prelude::*;
use crate::error::LoadError;
use crate::services::eda::{Column, ColumnData, Dataset};

const FORMAT: &str = "CSV";

/// Tokens read as missing in every column, same list as pandas `read_csv`.
const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parses the whole file before settling column types, so a column that
/// turns fractional or textual late is widened rather than rejected.
pub fn load_csv(bytes: &[u8]) -> Result<Dataset, LoadError> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(LoadError::parse(FORMAT, "file is empty"));
    }

    let df = CsvReader::new(Cursor::new(bytes.to_vec()))
        .has_header(true)
        .infer_schema(None)
        .with_null_values(Some(NullValues::AllColumns(
            NULL_TOKENS.iter().map(|t| t.to_string()).collect(),
        )))
        .finish()
        .map_err(|e| {
            tracing::error!("Failed to parse CSV: {}", e);
            LoadError::parse(FORMAT, e)
        })?;
    tracing::debug!("CSV parsed: {} rows x {} columns", df.height(), df.width());

    let columns = df
        .get_columns()
        .iter()
        .map(series_to_column)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Dataset::new(columns))
}

fn series_to_column(series: &Series) -> Result<Column, LoadError> {
    let dtype = series.dtype();
    let data = match dtype {
        DataType::Boolean => ColumnData::Bool(series.bool().map_err(polars_err)?.into_iter().collect()),
        DataType::String => ColumnData::Text(strings(series)?),
        DataType::Date => ColumnData::Date(strings(&cast(series, &DataType::String)?)?),
        DataType::Datetime(_, _) => ColumnData::Datetime(strings(&cast(series, &DataType::String)?)?),
        // integers with gaps become floats, as pandas reads them
        dt if dt.is_float() || (dt.is_numeric() && series.null_count() > 0) => {
            let floats = cast(series, &DataType::Float64)?;
            ColumnData::Float(floats.f64().map_err(polars_err)?.into_iter().collect())
        }
        dt if dt.is_numeric() => {
            let ints = cast(series, &DataType::Int64)?;
            ColumnData::Int(ints.i64().map_err(polars_err)?.into_iter().collect())
        }
        other => {
            tracing::debug!("Column {} has dtype {}, reading as text", series.name(), other);
            ColumnData::Text(strings(&cast(series, &DataType::String)?)?)
        }
    };
    Ok(Column::new(series.name(), data))
}

fn cast(series: &Series, dtype: &DataType) -> Result<Series, LoadError> {
    series.cast(dtype).map_err(polars_err)
}

fn strings(series: &Series) -> Result<Vec<Option<String>>, LoadError> {
    Ok(series
        .str()
        .map_err(polars_err)?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

fn polars_err(err: PolarsError) -> LoadError {
    LoadError::parse(FORMAT, err)
}
