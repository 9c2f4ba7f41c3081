// Dashboard service - Use cases over the layout engine and section board
use crate::application::analytics_repository::AnalyticsRepository;
use crate::application::section_board::{SectionBoard, Settled};
use crate::domain::charts::Drawing;
use crate::domain::layout::{
    ColumnId, DragEvent, DragState, DropOutcome, DropTarget, Layout, LayoutEngine, Overlay,
};
use crate::domain::section::{SectionId, SectionKind, SectionStatus, Timeframe};
use crate::domain::theme::ThemeName;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub id: SectionId,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub status: SectionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutView {
    pub layout: Layout,
    pub drag: DragState,
    pub candidate: Option<DropTarget>,
    pub overlay: Option<Overlay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventsResult {
    pub outcomes: Vec<DropOutcome>,
    #[serde(flatten)]
    pub view: LayoutView,
}

/// A section as placed on the page, with its rendered charts.
#[derive(Debug, Clone)]
pub struct Panel {
    pub view: SectionView,
    pub drawings: Vec<Drawing>,
}

#[derive(Debug, Clone)]
pub struct PageModel {
    pub theme: ThemeName,
    pub columns: Vec<(ColumnId, Vec<Panel>)>,
}

pub struct DashboardService {
    engine: Mutex<LayoutEngine>,
    board: SectionBoard,
    theme: ThemeName,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn AnalyticsRepository>, theme: ThemeName) -> Self {
        Self {
            engine: Mutex::new(LayoutEngine::default()),
            board: SectionBoard::new(repository),
            theme,
        }
    }

    pub fn theme(&self) -> ThemeName {
        self.theme
    }

    pub fn board(&self) -> &SectionBoard {
        &self.board
    }

    /// Fresh page: default layout and a reload of every section. Fetches
    /// already in flight for another request are joined, not restarted.
    pub async fn page_load(&self) -> PageModel {
        self.engine.lock().await.reset();
        let pending = self.board.load_all().await;
        futures::future::join_all(pending.into_iter().map(|(_, settled)| settled.wait())).await;
        self.page().await
    }

    pub async fn page(&self) -> PageModel {
        let layout = self.engine.lock().await.layout().clone();
        let mut columns = Vec::with_capacity(ColumnId::ALL.len());
        for column in ColumnId::ALL {
            let mut panels = Vec::new();
            for kind in layout.column(column).iter().filter_map(SectionKind::from_id) {
                panels.push(Panel {
                    view: self.section(kind).await,
                    drawings: self.board.drawings(kind).await,
                });
            }
            columns.push((column, panels));
        }
        PageModel {
            theme: self.theme,
            columns,
        }
    }

    pub async fn layout_view(&self) -> LayoutView {
        let engine = self.engine.lock().await;
        Self::view_of(&engine)
    }

    fn view_of(engine: &LayoutEngine) -> LayoutView {
        LayoutView {
            layout: engine.layout().clone(),
            drag: engine.drag_state().clone(),
            candidate: engine.candidate(),
            overlay: engine.overlay(),
        }
    }

    /// Applies events strictly in order under one lock.
    pub async fn apply_events(&self, events: Vec<DragEvent>) -> EventsResult {
        let mut engine = self.engine.lock().await;
        let outcomes = events.into_iter().map(|e| engine.handle(e)).collect();
        EventsResult {
            outcomes,
            view: Self::view_of(&engine),
        }
    }

    pub async fn section(&self, kind: SectionKind) -> SectionView {
        SectionView {
            id: kind.id(),
            title: kind.title(),
            subtitle: kind.subtitle(),
            status: self.board.status(kind).await,
        }
    }

    pub async fn section_drawings(&self, kind: SectionKind) -> Vec<Drawing> {
        self.board.drawings(kind).await
    }

    pub async fn retry(&self, kind: SectionKind) -> Settled {
        self.board.retry(kind).await
    }

    pub async fn set_timeframe(&self, timeframe: Timeframe) {
        self.board.set_timeframe(timeframe).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::analytics_repository::{Endpoint, FetchError};
    use crate::domain::layout::Modality;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct EmptyRepository;

    #[async_trait]
    impl AnalyticsRepository for EmptyRepository {
        async fn fetch(&self, endpoint: Endpoint) -> Result<Value, FetchError> {
            match endpoint {
                Endpoint::Sources => Err(FetchError::Status {
                    status: 503,
                    body: String::new(),
                }),
                _ => Ok(json!({})),
            }
        }
    }

    fn service() -> DashboardService {
        DashboardService::new(Arc::new(EmptyRepository), ThemeName::Dark)
    }

    #[tokio::test]
    async fn test_page_load_resets_layout_and_loads_sections() {
        let service = service();
        service
            .apply_events(vec![
                DragEvent::Start {
                    active: "radar".into(),
                    modality: Modality::Pointer,
                },
                DragEvent::End {
                    active: None,
                    over: Some(crate::domain::layout::OverTarget::Column(ColumnId::Right)),
                },
            ])
            .await;
        assert_ne!(service.layout_view().await.layout, Layout::default_layout());

        let page = service.page_load().await;
        assert_eq!(service.layout_view().await.layout, Layout::default_layout());
        let left: Vec<SectionId> = page.columns[0].1.iter().map(|p| p.view.id.clone()).collect();
        assert_eq!(left, vec![SectionKind::Map.id(), SectionKind::Radar.id()]);

        let sources = page.columns[1]
            .1
            .iter()
            .find(|p| p.view.id == SectionKind::Sources.id())
            .unwrap();
        assert!(matches!(sources.view.status, SectionStatus::Failed { .. }));
        let radar = &page.columns[0].1[1];
        assert!(matches!(radar.view.status, SectionStatus::Ready(_)));
        assert_eq!(radar.drawings.len(), 1);
    }

    /// Answers every endpoint after a short delay.
    struct SlowRepository;

    #[async_trait]
    impl AnalyticsRepository for SlowRepository {
        async fn fetch(&self, _endpoint: Endpoint) -> Result<Value, FetchError> {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            Ok(json!({}))
        }
    }

    #[tokio::test]
    async fn test_overlapping_page_loads_both_render_ready() {
        let service = Arc::new(DashboardService::new(Arc::new(SlowRepository), ThemeName::Dark));
        let first = tokio::spawn({
            let service = service.clone();
            async move { service.page_load().await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let second = tokio::spawn({
            let service = service.clone();
            async move { service.page_load().await }
        });

        for page in [first.await.unwrap(), second.await.unwrap()] {
            let statuses: Vec<&SectionStatus> = page
                .columns
                .iter()
                .flat_map(|(_, panels)| panels.iter().map(|p| &p.view.status))
                .collect();
            assert_eq!(statuses.len(), SectionKind::ALL.len());
            assert!(statuses.iter().all(|s| matches!(s, SectionStatus::Ready(_))));
        }
    }

    #[tokio::test]
    async fn test_apply_events_reports_each_outcome() {
        let service = service();
        let result = service
            .apply_events(vec![
                DragEvent::Start {
                    active: "map".into(),
                    modality: Modality::Pointer,
                },
                DragEvent::Cancel,
                DragEvent::Cancel,
            ])
            .await;
        assert_eq!(
            result.outcomes,
            vec![
                DropOutcome::Started {
                    section: "map".into()
                },
                DropOutcome::Cancelled,
                DropOutcome::Ignored,
            ]
        );
        assert_eq!(result.view.drag, DragState::Idle);
        assert!(result.view.overlay.is_none());
    }
}
