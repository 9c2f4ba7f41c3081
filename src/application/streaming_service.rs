// Streaming dashboard service - Progressive loading over chunked JSON
use crate::application::dashboard_service::{DashboardService, SectionView};
use crate::domain::layout::Layout;
use crate::domain::section::{SectionId, SectionKind, SectionStatus};
use crate::domain::theme::ThemeName;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSkeleton {
    pub id: SectionId,
    pub title: &'static str,
    pub subtitle: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    Skeleton {
        theme: ThemeName,
        layout: Layout,
        sections: Vec<SectionSkeleton>,
    },
    SectionUpdate {
        section: SectionView,
    },
    Complete {
        sections: usize,
        failed: usize,
        duration_ms: i64,
        completed_at: String,
    },
}

#[derive(Clone)]
pub struct StreamingDashboardService {
    dashboard: Arc<DashboardService>,
}

impl StreamingDashboardService {
    pub fn new(dashboard: Arc<DashboardService>) -> Self {
        Self { dashboard }
    }

    /// Skeleton first, then one update per section as its fetch settles,
    /// then a completion event.
    pub async fn stream_dashboard(&self) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(16);
        let start_time = Instant::now();

        let layout = self.dashboard.layout_view().await.layout;
        // Skeleton sections follow the on-page order.
        let sections = layout
            .section_ids()
            .filter_map(SectionKind::from_id)
            .map(|kind| SectionSkeleton {
                id: kind.id(),
                title: kind.title(),
                subtitle: kind.subtitle(),
            })
            .collect();
        let skeleton = StreamMessage::Skeleton {
            theme: self.dashboard.theme(),
            layout,
            sections,
        };
        let _ = tx.send(skeleton).await;

        let pending = self.dashboard.board().load_all().await;
        let total = pending.len();
        let dashboard = self.dashboard.clone();

        tokio::spawn(async move {
            let mut settled: FuturesUnordered<_> = pending
                .into_iter()
                .map(|(kind, settled)| async move {
                    if !settled.wait().await {
                        tracing::debug!(section = %kind.id(), "section fetch dropped");
                    }
                    kind
                })
                .collect();

            let mut failed = 0;
            while let Some(kind) = settled.next().await {
                let section = dashboard.section(kind).await;
                if matches!(section.status, SectionStatus::Failed { .. }) {
                    failed += 1;
                }
                if tx.send(StreamMessage::SectionUpdate { section }).await.is_err() {
                    tracing::debug!("stream receiver dropped");
                    return;
                }
            }

            let complete = StreamMessage::Complete {
                sections: total,
                failed,
                duration_ms: start_time.elapsed().as_millis() as i64,
                completed_at: chrono::Utc::now().to_rfc3339(),
            };
            let _ = tx.send(complete).await;
        });

        rx
    }
}
