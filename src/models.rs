use serde::{Deserialize, Serialize};
use crate::services::eda::{ChartSpec, CorrelationMatrix, DatasetSummary};

/// Upload referenced by a signed URL.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub file_name: String,
    pub signed_url: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub file_name: String,
}

/// Everything a renderer needs for one uploaded file. Charts are listed in
/// display order and must be drawn in that order.
#[derive(Debug, Clone, Serialize)]
pub struct EdaReport {
    pub file_name: String,
    pub summary: DatasetSummary,
    pub charts: Vec<ChartSpec>,
    /// Present only when a correlation heatmap is planned.
    pub correlation: Option<CorrelationMatrix>,
    pub preview: Vec<Vec<String>>,
}
