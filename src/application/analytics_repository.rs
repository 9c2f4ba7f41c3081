// Repository trait for analytics data access
use async_trait::async_trait;
use serde_json::Value;

/// Backend analytics endpoints the dashboard reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Traffic,
    Categories,
    Radar,
    Heatmap,
    RecentReports,
    Sources,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Traffic,
        Endpoint::Categories,
        Endpoint::Radar,
        Endpoint::Heatmap,
        Endpoint::RecentReports,
        Endpoint::Sources,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Traffic => "traffic",
            Endpoint::Categories => "categories",
            Endpoint::Radar => "radar",
            Endpoint::Heatmap => "heatmap",
            Endpoint::RecentReports => "recent_reports",
            Endpoint::Sources => "sources",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Fetch the raw JSON document served by `endpoint`.
    async fn fetch(&self, endpoint: Endpoint) -> Result<Value, FetchError>;
}
