// Two-column layout model and the drag-reorder state machine.
//
// The layout is owned by a `LayoutEngine`; every mutation goes through the
// commit transition in `LayoutEngine::handle`. Input collaborators speak to
// it only through `DragEvent` messages.
use crate::domain::geometry::{Point, Rect};
use crate::domain::section::{SectionId, SectionKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnId {
    Left,
    Right,
}

impl ColumnId {
    pub const ALL: [ColumnId; 2] = [ColumnId::Left, ColumnId::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnId::Left => "left",
            ColumnId::Right => "right",
        }
    }
}

/// Assignment of section ids to two ordered columns. Every id appears once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    left: Vec<SectionId>,
    right: Vec<SectionId>,
}

impl Layout {
    /// Returns `None` when an id appears more than once.
    #[cfg(test)]
    pub fn new(left: Vec<SectionId>, right: Vec<SectionId>) -> Option<Self> {
        let mut seen = std::collections::HashSet::new();
        if left.iter().chain(right.iter()).all(|id| seen.insert(id.clone())) {
            Some(Self { left, right })
        } else {
            None
        }
    }

    /// Map and radar on the left; traffic, categories and sources on the right.
    pub fn default_layout() -> Self {
        Self {
            left: vec![SectionKind::Map.id(), SectionKind::Radar.id()],
            right: vec![
                SectionKind::Line.id(),
                SectionKind::Pie.id(),
                SectionKind::Sources.id(),
            ],
        }
    }

    pub fn column(&self, column: ColumnId) -> &[SectionId] {
        match column {
            ColumnId::Left => &self.left,
            ColumnId::Right => &self.right,
        }
    }

    fn column_mut(&mut self, column: ColumnId) -> &mut Vec<SectionId> {
        match column {
            ColumnId::Left => &mut self.left,
            ColumnId::Right => &mut self.right,
        }
    }

    pub fn locate(&self, id: &SectionId) -> Option<(ColumnId, usize)> {
        ColumnId::ALL.into_iter().find_map(|column| {
            self.column(column)
                .iter()
                .position(|s| s == id)
                .map(|index| (column, index))
        })
    }

    pub fn section_ids(&self) -> impl Iterator<Item = &SectionId> {
        self.left.iter().chain(self.right.iter())
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::default_layout()
    }
}

/// What the pointer or keyboard focus is currently over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum OverTarget {
    Section(SectionId),
    /// An empty area of a column (drop at its end).
    Column(ColumnId),
}

/// Resolved insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DropTarget {
    pub column: ColumnId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    #[default]
    Pointer,
    Keyboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A rendered drop area reported by the input collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Droppable {
    pub target: OverTarget,
    pub rect: Rect,
}

/// Abstract input events, processed strictly in delivery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DragEvent {
    Start {
        active: SectionId,
        #[serde(default)]
        modality: Modality,
    },
    /// Collision already resolved by the collaborator.
    Over { over: Option<OverTarget> },
    /// Raw geometry; the engine resolves it with the closest-corners rule.
    Pointer {
        collision: Rect,
        droppables: Vec<Droppable>,
    },
    /// Keyboard reorder step from the current candidate.
    Nudge { direction: Direction },
    /// Release or confirm. `over: None` keeps the last tracked candidate.
    End {
        #[serde(default)]
        active: Option<SectionId>,
        #[serde(default)]
        over: Option<OverTarget>,
    },
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveDrag {
    pub section: SectionId,
    pub origin: ColumnId,
    pub modality: Modality,
    pub over: Option<OverTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum DragState {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

impl DragState {
    pub fn active_section_id(&self) -> Option<&SectionId> {
        match self {
            DragState::Idle => None,
            DragState::Dragging(drag) => Some(&drag.section),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    Started {
        section: SectionId,
    },
    Tracking {
        candidate: Option<DropTarget>,
    },
    Reordered {
        column: ColumnId,
        from: usize,
        to: usize,
    },
    Moved {
        from: ColumnId,
        to: ColumnId,
        index: usize,
    },
    Unchanged,
    /// The move would have emptied its source column.
    Refused,
    Cancelled,
    /// Malformed or out-of-order event; state untouched.
    Ignored,
}

impl DropOutcome {
    pub fn changed_layout(&self) -> bool {
        matches!(self, DropOutcome::Reordered { .. } | DropOutcome::Moved { .. })
    }
}

/// Resolves an over target into an insertion point; unknown sections yield `None`.
pub fn resolve_target(layout: &Layout, over: &OverTarget) -> Option<DropTarget> {
    match over {
        OverTarget::Section(id) => layout
            .locate(id)
            .map(|(column, index)| DropTarget { column, index }),
        OverTarget::Column(column) => Some(DropTarget {
            column: *column,
            index: layout.column(*column).len(),
        }),
    }
}

/// Computes the layout that results from dropping `active` over `over`.
///
/// Returns the next layout (a copy of the input when nothing changes) and the
/// outcome. A cross-column move out of a single-section column is refused.
pub fn resolve_drop(
    layout: &Layout,
    active: &SectionId,
    over: Option<&OverTarget>,
) -> (Layout, DropOutcome) {
    let unchanged = |outcome| (layout.clone(), outcome);

    let Some((source, from)) = layout.locate(active) else {
        return unchanged(DropOutcome::Ignored);
    };
    let Some(over) = over else {
        return unchanged(DropOutcome::Unchanged);
    };
    if matches!(over, OverTarget::Section(id) if id == active) {
        return unchanged(DropOutcome::Unchanged);
    }
    let Some(DropTarget { column: target, index }) = resolve_target(layout, over) else {
        return unchanged(DropOutcome::Ignored);
    };

    if source != target && layout.column(source).len() == 1 {
        return unchanged(DropOutcome::Refused);
    }

    let mut next = layout.clone();
    if source == target {
        let items = next.column_mut(source);
        let moved = items.remove(from);
        let to = index.min(items.len());
        items.insert(to, moved);
        if next == *layout {
            return unchanged(DropOutcome::Unchanged);
        }
        return (
            next,
            DropOutcome::Reordered {
                column: source,
                from,
                to,
            },
        );
    }

    let moved = next.column_mut(source).remove(from);
    let items = next.column_mut(target);
    let index = index.min(items.len());
    items.insert(index, moved);
    (
        next,
        DropOutcome::Moved {
            from: source,
            to: target,
            index,
        },
    )
}

/// Picks the droppable whose corners are, on average, nearest to the
/// corresponding corners of the dragged rectangle.
pub fn closest_corners<'a>(collision: &Rect, droppables: &'a [Droppable]) -> Option<&'a OverTarget> {
    let corners = collision.corners();
    droppables
        .iter()
        .map(|d| {
            let total: f64 = d
                .rect
                .corners()
                .iter()
                .zip(corners.iter())
                .map(|(a, b): (&Point, &Point)| a.distance(b))
                .sum();
            (total / 4.0, &d.target)
        })
        .filter(|(distance, _)| distance.is_finite())
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, target)| target)
}

/// Next keyboard candidate from the current one. Stepping past the last
/// section lands on the column end.
fn nudge_target(layout: &Layout, current: &OverTarget, direction: Direction) -> Option<OverTarget> {
    let DropTarget { column, index } = resolve_target(layout, current)?;
    let (column, index) = match direction {
        Direction::Up => (column, index.saturating_sub(1)),
        Direction::Down => (column, index + 1),
        Direction::Left => (ColumnId::Left, index),
        Direction::Right => (ColumnId::Right, index),
    };
    match layout.column(column).get(index) {
        Some(id) => Some(OverTarget::Section(id.clone())),
        None => Some(OverTarget::Column(column)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preview {
    /// Render the live section content.
    Live,
    /// Render a lightweight stand-in with this caption.
    Placeholder { caption: String },
}

/// Preview of the section being moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlay {
    pub section: SectionId,
    pub title: String,
    pub preview: Preview,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    layout: Layout,
    drag: DragState,
}

impl LayoutEngine {
    #[cfg(test)]
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            drag: DragState::Idle,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Page load: back to the fixed default, no gesture in flight.
    pub fn reset(&mut self) {
        self.layout = Layout::default_layout();
        self.drag = DragState::Idle;
    }

    /// Where the dragged section would land if released now.
    pub fn candidate(&self) -> Option<DropTarget> {
        match &self.drag {
            DragState::Dragging(ActiveDrag { over: Some(over), .. }) => {
                resolve_target(&self.layout, over)
            }
            _ => None,
        }
    }

    pub fn overlay(&self) -> Option<Overlay> {
        let section = self.drag.active_section_id()?;
        let kind = SectionKind::from_id(section);
        let title = kind
            .map(|k| k.title().to_string())
            .unwrap_or_else(|| section.to_string());
        let preview = match kind {
            Some(k) if k.uses_lightweight_preview() => Preview::Placeholder {
                caption: "Map Preview".to_string(),
            },
            _ => Preview::Live,
        };
        Some(Overlay {
            section: section.clone(),
            title,
            preview,
        })
    }

    /// Single entry point for input; the only place the layout is mutated.
    pub fn handle(&mut self, event: DragEvent) -> DropOutcome {
        let outcome = match event {
            DragEvent::Start { active, modality } => self.start(active, modality),
            DragEvent::Over { over } => self.track(|_, _| over),
            DragEvent::Pointer {
                collision,
                droppables,
            } => self.track(|_, _| closest_corners(&collision, &droppables).cloned()),
            DragEvent::Nudge { direction } => self.track(|layout, drag| {
                let current = drag
                    .over
                    .clone()
                    .unwrap_or_else(|| OverTarget::Section(drag.section.clone()));
                nudge_target(layout, &current, direction).or(Some(current))
            }),
            DragEvent::End { active, over } => self.commit(active, over),
            DragEvent::Cancel => self.cancel(),
        };
        tracing::debug!(?outcome, "drag event handled");
        outcome
    }

    fn start(&mut self, active: SectionId, modality: Modality) -> DropOutcome {
        if let DragState::Dragging(drag) = &self.drag {
            tracing::warn!(current = %drag.section, requested = %active, "drag already in progress");
            return DropOutcome::Ignored;
        }
        let Some((origin, _)) = self.layout.locate(&active) else {
            tracing::warn!(section = %active, "drag start for unknown section");
            return DropOutcome::Ignored;
        };
        self.drag = DragState::Dragging(ActiveDrag {
            section: active.clone(),
            origin,
            modality,
            over: Some(OverTarget::Section(active.clone())),
        });
        DropOutcome::Started { section: active }
    }

    fn track(
        &mut self,
        next_over: impl FnOnce(&Layout, &ActiveDrag) -> Option<OverTarget>,
    ) -> DropOutcome {
        let DragState::Dragging(drag) = &mut self.drag else {
            return DropOutcome::Ignored;
        };
        let over = next_over(&self.layout, drag);
        // Targets that name no known section are dropped rather than kept.
        drag.over = over.filter(|o| resolve_target(&self.layout, o).is_some());
        DropOutcome::Tracking {
            candidate: self.candidate(),
        }
    }

    fn commit(&mut self, active: Option<SectionId>, over: Option<OverTarget>) -> DropOutcome {
        let DragState::Dragging(drag) = std::mem::take(&mut self.drag) else {
            return DropOutcome::Ignored;
        };
        if active.as_ref().is_some_and(|a| *a != drag.section) {
            tracing::warn!(tracked = %drag.section, "drag end names a different section");
            return DropOutcome::Ignored;
        }
        let over = over.or(drag.over);
        let (next, outcome) = resolve_drop(&self.layout, &drag.section, over.as_ref());
        match &outcome {
            DropOutcome::Refused => {
                tracing::warn!(section = %drag.section, "move refused: source column would be empty");
            }
            o if o.changed_layout() => {
                tracing::info!(section = %drag.section, ?o, "layout updated");
                self.layout = next;
            }
            _ => {}
        }
        outcome
    }

    fn cancel(&mut self) -> DropOutcome {
        match std::mem::take(&mut self.drag) {
            DragState::Idle => DropOutcome::Ignored,
            DragState::Dragging(_) => DropOutcome::Cancelled,
        }
    }
}
