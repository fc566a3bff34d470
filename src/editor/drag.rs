//! Drag-to-move state of snapshot windows

use std::fmt;

use crate::capture::Point;

/// What is known about where a snapshot window sits on screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Placed by us and not moved since
    Known(Point),
    /// Moved by the window manager, which does not report where to
    Moved { from: Point },
}

impl Placement {
    /// The last position that was actually observed
    pub fn last_known(&self) -> Point {
        match *self {
            Placement::Known(p) | Placement::Moved { from: p } => p,
        }
    }

    /// Apply `f` to the position, keeping whether it is still current
    pub fn map(self, f: impl FnOnce(Point) -> Point) -> Placement {
        match self {
            Placement::Known(p) => Placement::Known(f(p)),
            Placement::Moved { from } => Placement::Moved { from: f(from) },
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Placement::Known(Point::default())
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Known(p) => write!(f, "{},{}", p.x, p.y),
            Placement::Moved { from } => write!(f, "moved from {},{}", from.x, from.y),
        }
    }
}

/// A primary press records the pointer as anchor. Once the pointer leaves
/// the drag threshold the move is handed to the window manager, which moves
/// the window by the pointer delta; releasing then ends the drag with the
/// placement the registry should store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowDrag {
    anchor: Option<Point>,
    handed_off: bool,
    placement: Placement,
}

impl WindowDrag {
    pub fn new(position: Point) -> Self {
        Self {
            anchor: None,
            handed_off: false,
            placement: Placement::Known(position),
        }
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn press(&mut self, pointer: Point) {
        self.anchor = Some(pointer);
        self.handed_off = false;
    }

    /// Anchor of a drag that has not been handed off yet; the caller starts
    /// the window manager move from it
    pub fn hand_off(&mut self) -> Option<Point> {
        if self.handed_off {
            return None;
        }
        let anchor = self.anchor?;
        self.handed_off = true;
        Some(anchor)
    }

    /// End the drag; returns the new placement when the window was moved
    pub fn release(&mut self) -> Option<Placement> {
        self.anchor.take()?;
        if !std::mem::take(&mut self.handed_off) {
            return None;
        }
        self.placement = Placement::Moved {
            from: self.placement.last_known(),
        };
        Some(self.placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::registry::testing::registry_with_snapshot;

    #[test]
    fn test_click_without_move_keeps_position() {
        let mut drag = WindowDrag::new(Point::new(98, 98));
        drag.press(Point::new(10, 10));
        assert!(drag.is_dragging());
        assert_eq!(drag.release(), None);
        assert!(!drag.is_dragging());
        assert_eq!(drag.placement(), Placement::Known(Point::new(98, 98)));
    }

    #[test]
    fn test_handed_off_move_is_reported_as_moved() {
        let mut drag = WindowDrag::new(Point::new(98, 98));
        drag.press(Point::new(10, 10));
        assert_eq!(drag.hand_off(), Some(Point::new(10, 10)));
        assert_eq!(drag.hand_off(), None);
        let moved = Placement::Moved {
            from: Point::new(98, 98),
        };
        assert_eq!(drag.release(), Some(moved));
        assert_eq!(drag.placement(), moved);
        assert_eq!(moved.to_string(), "moved from 98,98");
    }

    #[test]
    fn test_hand_off_without_press_is_ignored() {
        let mut drag = WindowDrag::new(Point::new(1, 2));
        assert_eq!(drag.hand_off(), None);
        assert_eq!(drag.release(), None);
        assert_eq!(drag.placement(), Placement::Known(Point::new(1, 2)));
    }

    #[test]
    fn test_registry_follows_completed_move() {
        let (mut registry, id) = registry_with_snapshot(Point::new(98, 98));
        let mut drag = WindowDrag::new(Point::new(98, 98));
        assert_eq!(registry.report()[0].cells()[1], "98,98");

        drag.press(Point::new(10, 10));
        drag.hand_off();
        if let Some(placement) = drag.release() {
            registry.set_placement(id, placement);
        }
        assert_eq!(registry.report()[0].cells()[1], "moved from 98,98");

        // a second move keeps the last observed position
        drag.press(Point::new(3, 3));
        drag.hand_off();
        if let Some(placement) = drag.release() {
            registry.set_placement(id, placement);
        }
        assert_eq!(registry.report()[0].cells()[1], "moved from 98,98");
    }

    #[test]
    fn test_map_keeps_staleness() {
        let shift = |p: Point| p + Point::new(2, 2);
        assert_eq!(
            Placement::Known(Point::new(1, 1)).map(shift),
            Placement::Known(Point::new(3, 3))
        );
        assert_eq!(
            Placement::Moved { from: Point::new(1, 1) }.map(shift),
            Placement::Moved { from: Point::new(3, 3) }
        );
    }
}
