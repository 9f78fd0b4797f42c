pub mod csv;
pub mod excel;
pub mod utils;

use crate::error::LoadError;
use crate::services::eda::Dataset;

pub use utils::load_file_from_url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Recognises the format from the file extension, ignoring case.
    pub fn from_file_name(file_name: &str) -> Result<Self, LoadError> {
        let lower = file_name.trim().to_ascii_lowercase();
        if lower.ends_with(".csv") {
            Ok(FileFormat::Csv)
        } else if lower.ends_with(".xlsx") {
            Ok(FileFormat::Xlsx)
        } else {
            Err(LoadError::UnsupportedFormat(file_name.to_string()))
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileFormat::Csv => "CSV",
            FileFormat::Xlsx => "XLSX",
        }
    }
}

/// Parses an uploaded file into a dataset. The result always satisfies
/// [`Dataset::validate`].
pub fn load_dataset(file_name: &str, bytes: &[u8]) -> Result<Dataset, LoadError> {
    let format = FileFormat::from_file_name(file_name)?;
    tracing::info!("Loading {} ({} file, {}KB)", file_name, format.label(), bytes.len() / 1024);

    let dataset = match format {
        FileFormat::Csv => csv::load_csv(bytes)?,
        FileFormat::Xlsx => excel::load_xlsx(bytes)?,
    };
    dataset
        .validate()
        .map_err(|e| LoadError::parse(format.label(), e))?;
    Ok(dataset)
}
