use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use bytes::Bytes;
use moka::sync::Cache;
use crate::config::Config;
use crate::error::AppError;
use crate::models::EdaReport;
use crate::services::eda::{build_summary, classify, correlation_matrix, plan_charts, ChartSpec};
use crate::services::loader::load_dataset;

/// Uploads are identified by name, size and content hash.
type ReportKey = (String, usize, u64);

/// Runs the analysis pipeline for uploads and keeps recent reports in memory.
/// Failed analyses are never cached.
#[derive(Clone)]
pub struct ReportService {
    cache: Cache<ReportKey, Arc<EdaReport>>,
    preview_rows: usize,
}

impl ReportService {
    pub fn new(config: &Config) -> Self {
        Self {
            cache: Cache::new(config.cache_capacity),
            preview_rows: config.preview_rows,
        }
    }

    pub async fn analyze(&self, file_name: String, file_data: Bytes) -> Result<Arc<EdaReport>, AppError> {
        let key = report_key(&file_name, &file_data);
        if let Some(report) = self.cache.get(&key) {
            tracing::info!("Serving cached report for {}", file_name);
            return Ok(report);
        }

        let preview_rows = self.preview_rows;
        let report = tokio::task::spawn_blocking(move || build_report(&file_name, &file_data, preview_rows))
            .await??;

        let report = Arc::new(report);
        self.cache.insert(key, report.clone());
        Ok(report)
    }
}

fn report_key(file_name: &str, file_data: &[u8]) -> ReportKey {
    let mut hasher = DefaultHasher::new();
    file_data.hash(&mut hasher);
    (file_name.to_string(), file_data.len(), hasher.finish())
}

/// Loader, classifier, summary builder and chart planner in one pass.
pub fn build_report(file_name: &str, file_data: &[u8], preview_rows: usize) -> Result<EdaReport, AppError> {
    let start = std::time::Instant::now();

    let dataset = load_dataset(file_name, file_data)?;
    let classification = classify(&dataset);
    let summary = build_summary(&dataset, &classification)?;
    let charts = plan_charts(&dataset, &classification)?;

    let correlation = charts
        .iter()
        .find_map(|chart| match chart {
            ChartSpec::CorrelationHeatmap { columns } => Some(columns),
            _ => None,
        })
        .map(|columns| correlation_matrix(&dataset, columns))
        .transpose()?;

    tracing::info!(
        "Report for {} ready: {} charts, {} numeric / {} categorical columns, took {:?}",
        file_name,
        charts.len(),
        classification.numeric.len(),
        classification.categorical.len(),
        start.elapsed()
    );

    Ok(EdaReport {
        file_name: file_name.to_string(),
        summary,
        charts,
        correlation,
        preview: dataset.preview(preview_rows),
    })
}
