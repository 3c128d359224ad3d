//! Drag-and-drop reordering over the displayed list.
//!
//! A drag gesture is observed over the filtered, sorted list the user sees,
//! while [`TaskStore::reorder`](crate::store::TaskStore::reorder) works on the
//! full collection. This module turns the gesture into a displayed index pair
//! and translates that pair into full-collection indices by task identity.
//!
//! Gesture state stays in [`DragSession`] until the drop; nothing reaches the
//! store mid-gesture.

use crate::task::Task;

/// Which half of the hovered item the pointer is over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    After,
}

impl DropPosition {
    /// Above the vertical midpoint of the hovered item inserts before it,
    /// anything else inserts after it.
    pub fn from_midpoint(pointer_y: f64, top: f64, height: f64) -> Self {
        if pointer_y < top + height / 2.0 {
            DropPosition::Before
        } else {
            DropPosition::After
        }
    }
}

/// Displayed index the dragged item should move to when dropped on `hovered`.
///
/// Returns `None` when the drop would not move anything: dropping onto the
/// dragged item itself, or landing back on its own slot.
pub fn drop_target(dragged: usize, hovered: usize, position: DropPosition) -> Option<usize> {
    if hovered == dragged {
        return None;
    }
    let target = match position {
        DropPosition::After if hovered > dragged => hovered,
        DropPosition::After => hovered + 1,
        DropPosition::Before if hovered < dragged => hovered,
        DropPosition::Before => hovered - 1,
    };
    (target != dragged).then_some(target)
}

/// Translate a displayed index pair into indices of the full collection.
///
/// Both displayed positions are resolved to task ids first, then looked up in
/// `full`. Any position or id that cannot be resolved yields `None` so a stale
/// view never turns into a reorder of the wrong tasks.
pub fn map_displayed(
    displayed: &[Task],
    full: &[Task],
    from: usize,
    to: usize,
) -> Option<(usize, usize)> {
    let from_id = &displayed.get(from)?.id;
    let to_id = &displayed.get(to)?.id;
    let full_from = full.iter().position(|task| &task.id == from_id)?;
    let full_to = full.iter().position(|task| &task.id == to_id)?;
    Some((full_from, full_to))
}

/// Local state of one drag gesture
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    dragged: Option<usize>,
    hover: Option<(usize, DropPosition)>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin dragging the item at displayed index `dragged`
    pub fn start(&mut self, dragged: usize) {
        self.dragged = Some(dragged);
        self.hover = None;
    }

    pub fn dragged(&self) -> Option<usize> {
        self.dragged
    }

    pub fn hovered(&self) -> Option<(usize, DropPosition)> {
        self.hover
    }

    /// Pointer moved over the item at `index`. Hovering the dragged item
    /// itself is ignored.
    pub fn hover(&mut self, index: usize, position: DropPosition) {
        if self.dragged.is_none() || self.dragged == Some(index) {
            return;
        }
        self.hover = Some((index, position));
    }

    /// Pointer left the item at `index`
    pub fn leave(&mut self, index: usize) {
        if matches!(self.hover, Some((hovered, _)) if hovered == index) {
            self.hover = None;
        }
    }

    /// Finish the gesture. Returns the displayed `(from, to)` pair to hand to
    /// the mapper, or `None` when the drop moves nothing.
    pub fn drop(&mut self) -> Option<(usize, usize)> {
        let dragged = self.dragged.take()?;
        let (hovered, position) = self.hover.take()?;
        drop_target(dragged, hovered, position).map(|target| (dragged, target))
    }

    /// Abandon the gesture without dropping
    pub fn cancel(&mut self) {
        self.dragged = None;
        self.hover = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use chrono::Utc;

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            priority: Priority::Medium,
            created_at: Utc::now(),
            order: 0,
        }
    }

    #[test]
    fn midpoint_picks_before_above_and_after_below() {
        assert_eq!(DropPosition::from_midpoint(10.0, 0.0, 40.0), DropPosition::Before);
        assert_eq!(DropPosition::from_midpoint(20.0, 0.0, 40.0), DropPosition::After);
        assert_eq!(DropPosition::from_midpoint(35.0, 0.0, 40.0), DropPosition::After);
    }

    #[test]
    fn drop_target_moving_down() {
        // dragging 0 over 2
        assert_eq!(drop_target(0, 2, DropPosition::After), Some(2));
        assert_eq!(drop_target(0, 2, DropPosition::Before), Some(1));
        // Before the item right after the dragged one is its own slot
        assert_eq!(drop_target(0, 1, DropPosition::Before), None);
    }

    #[test]
    fn drop_target_moving_up() {
        // dragging 3 over 1
        assert_eq!(drop_target(3, 1, DropPosition::Before), Some(1));
        assert_eq!(drop_target(3, 1, DropPosition::After), Some(2));
        // After the item right before the dragged one is its own slot
        assert_eq!(drop_target(3, 2, DropPosition::After), None);
    }

    #[test]
    fn drop_target_on_self_is_ignored() {
        assert_eq!(drop_target(0, 0, DropPosition::Before), None);
        assert_eq!(drop_target(2, 2, DropPosition::After), None);
    }

    #[test]
    fn map_displayed_resolves_by_identity() {
        let full = vec![task("a"), task("b"), task("c"), task("d")];
        let displayed = vec![task("d"), task("b")];
        assert_eq!(map_displayed(&displayed, &full, 0, 1), Some((3, 1)));
        assert_eq!(map_displayed(&displayed, &full, 1, 0), Some((1, 3)));
    }

    #[test]
    fn map_displayed_ignores_stale_views() {
        let full = vec![task("a"), task("b")];
        let displayed = vec![task("a"), task("gone")];
        assert_eq!(map_displayed(&displayed, &full, 0, 1), None);
        assert_eq!(map_displayed(&displayed, &full, 0, 5), None);
    }

    #[test]
    fn drag_session_produces_pair_on_drop() {
        let mut session = DragSession::new();
        session.start(0);
        session.hover(2, DropPosition::Before);
        session.hover(3, DropPosition::After);
        assert_eq!(session.drop(), Some((0, 3)));
        assert_eq!(session.dragged(), None);
        assert_eq!(session.hovered(), None);
    }

    #[test]
    fn drag_session_ignores_self_hover_and_leave() {
        let mut session = DragSession::new();
        session.start(1);
        session.hover(1, DropPosition::After);
        assert_eq!(session.hovered(), None);

        session.hover(0, DropPosition::Before);
        session.leave(0);
        assert_eq!(session.drop(), None);
    }

    #[test]
    fn drag_session_without_start_drops_nothing() {
        let mut session = DragSession::new();
        session.hover(1, DropPosition::After);
        assert_eq!(session.drop(), None);

        session.start(2);
        session.hover(0, DropPosition::Before);
        session.cancel();
        assert_eq!(session.drop(), None);
    }
}
