use std::collections::HashSet;
use bytes::Bytes;
use chrono::{Duration, NaiveDate};
use reqwest::Client;
use crate::error::LoadError;

/// Header for column `index`. Blank headers become `Unnamed: {index}` and
/// repeated names get `.1`, `.2`, ... suffixes so every name stays unique.
pub fn unique_header(raw: &str, index: usize, existing_names: &mut HashSet<String>) -> String {
    let trimmed = raw.trim();
    let base_name = if trimmed.is_empty() {
        format!("Unnamed: {}", index)
    } else {
        trimmed.to_string()
    };

    let mut name = base_name.clone();
    let mut counter = 1;
    while !existing_names.insert(name.clone()) {
        name = format!("{}.{}", base_name, counter);
        counter += 1;
    }
    name
}

/// Converts a spreadsheet serial date (days since 1899-12-30) to ISO-8601.
pub fn excel_serial_to_iso(serial: f64) -> Option<String> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    let timestamp = epoch.checked_add_signed(Duration::milliseconds(millis))?;
    Some(timestamp.format("%Y-%m-%dT%H:%M:%S").to_string())
}

pub async fn load_file_from_url(url: &str) -> Result<Bytes, LoadError> {
    let client = Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| LoadError::Download(e.to_string()))?;

    if !response.status().is_success() {
        return Err(LoadError::Download(format!("status {}", response.status())));
    }

    response
        .bytes()
        .await
        .map_err(|e| LoadError::Download(format!("failed to read response bytes: {}", e)))
}
