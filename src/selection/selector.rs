//! Rubber-band region selection
//!
//! The first primary press anchors both corners and the following drag moves
//! the free corner. Every later press picks the single edge nearest to the
//! pointer and only that coordinate follows the drag. A secondary click
//! commits.

use log::{debug, info};

use crate::capture::{Point, Rectangle};

/// Which degree of freedom the next drag moves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragTarget {
    /// The free corner: both coordinates of `end`
    #[default]
    Whole,
    StartX,
    StartY,
    EndX,
    EndY,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectorState {
    #[default]
    Idle,
    Defining,
    Committed,
}

/// The in-progress selection in device-local coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub start: Point,
    pub end: Point,
    pub target: DragTarget,
}

impl Selection {
    pub fn new(at: Point) -> Self {
        Self {
            start: at,
            end: at,
            target: DragTarget::Whole,
        }
    }

    /// The normalized rectangle spanned by `start` and `end`
    pub fn rectangle(&self) -> Rectangle {
        Rectangle::from_corners(self.start, self.end)
    }

    /// Pick the edge closest to `p`; exact ties keep the earlier candidate
    /// in the order start.x, start.y, end.x, end.y.
    pub fn nearest_target(&self, p: Point) -> DragTarget {
        let candidates = [
            (DragTarget::StartX, (p.x - self.start.x).abs()),
            (DragTarget::StartY, (p.y - self.start.y).abs()),
            (DragTarget::EndX, (p.x - self.end.x).abs()),
            (DragTarget::EndY, (p.y - self.end.y).abs()),
        ];

        let (mut target, mut min) = candidates[0];
        for &(candidate, distance) in &candidates[1..] {
            if distance < min {
                min = distance;
                target = candidate;
            }
        }
        target
    }

    /// Move the active target to `p`
    pub fn apply(&mut self, p: Point) {
        match self.target {
            DragTarget::Whole => self.end = p,
            DragTarget::StartX => self.start.x = p.x,
            DragTarget::StartY => self.start.y = p.y,
            DragTarget::EndX => self.end.x = p.x,
            DragTarget::EndY => self.end.y = p.y,
        }
    }
}

/// Selection state machine for one display device
#[derive(Clone, Debug)]
pub struct RegionSelector {
    device_bounds: Rectangle,
    selection: Option<Selection>,
    state: SelectorState,
}

impl RegionSelector {
    /// `device_bounds` are in absolute screen coordinates; pointer events
    /// are relative to its origin.
    pub fn new(device_bounds: Rectangle) -> Self {
        Self {
            device_bounds,
            selection: None,
            state: SelectorState::Idle,
        }
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// The normalized pending rectangle in device-local coordinates
    pub fn pending_rectangle(&self) -> Option<Rectangle> {
        match self.state {
            SelectorState::Defining => self.selection.map(|s| s.rectangle()),
            _ => None,
        }
    }

    /// Primary button pressed
    pub fn press(&mut self, p: Point) {
        match self.state {
            SelectorState::Idle => {
                debug!("Selection started at ({}, {})", p.x, p.y);
                self.selection = Some(Selection::new(p));
                self.state = SelectorState::Defining;
            }
            SelectorState::Defining => {
                if let Some(sel) = self.selection.as_mut() {
                    sel.target = sel.nearest_target(p);
                    debug!("Adjusting {:?}", sel.target);
                }
            }
            SelectorState::Committed => {}
        }
    }

    /// Primary button dragged
    pub fn drag(&mut self, p: Point) {
        if self.state == SelectorState::Defining {
            if let Some(sel) = self.selection.as_mut() {
                sel.apply(p);
            }
        }
    }

    /// Primary button released
    pub fn release(&mut self, p: Point) {
        self.drag(p);
    }

    /// Secondary click: finalize the selection
    ///
    /// Returns the committed rectangle in absolute screen coordinates, clipped
    /// to the device bounds, or `None` when the selection is abandoned.
    pub fn commit(&mut self) -> Option<Rectangle> {
        if self.state == SelectorState::Committed {
            return None;
        }
        self.state = SelectorState::Committed;

        let rect = self.selection.take()?.rectangle();
        if rect.is_empty() {
            info!("Selection abandoned: degenerate rectangle {}", rect);
            return None;
        }

        let absolute = rect.translate(self.device_bounds.x, self.device_bounds.y);
        let clipped = absolute.intersect(&self.device_bounds);
        match clipped {
            Some(r) => info!("Selection committed: {}", r),
            None => info!("Selection abandoned: {} is outside the display", absolute),
        }
        clipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> RegionSelector {
        RegionSelector::new(Rectangle::new(0, 0, 1920, 1080))
    }

    fn defining(start: (i32, i32), end: (i32, i32)) -> RegionSelector {
        let mut sel = selector();
        sel.press(Point::new(start.0, start.1));
        sel.release(Point::new(end.0, end.1));
        sel
    }

    #[test]
    fn test_first_press_anchors_both_corners() {
        let mut sel = selector();
        assert_eq!(sel.state(), SelectorState::Idle);
        sel.press(Point::new(40, 60));
        assert_eq!(sel.state(), SelectorState::Defining);
        let s = sel.selection().unwrap();
        assert_eq!(s.start, Point::new(40, 60));
        assert_eq!(s.end, Point::new(40, 60));
        assert_eq!(s.target, DragTarget::Whole);
    }

    #[test]
    fn test_press_drag_commit_scenario() {
        let mut sel = selector();
        sel.press(Point::new(100, 100));
        sel.drag(Point::new(150, 120));
        sel.drag(Point::new(200, 150));
        sel.release(Point::new(200, 150));
        assert_eq!(sel.commit(), Some(Rectangle::new(100, 100, 100, 50)));
        assert_eq!(sel.state(), SelectorState::Committed);
    }

    #[test]
    fn test_commit_adds_device_origin() {
        let mut sel = RegionSelector::new(Rectangle::new(1920, -200, 1280, 1024));
        sel.press(Point::new(100, 100));
        sel.release(Point::new(200, 150));
        assert_eq!(sel.commit(), Some(Rectangle::new(2020, -100, 100, 50)));
    }

    #[test]
    fn test_reverse_drag_is_normalized() {
        let mut sel = defining((200, 150), (100, 100));
        assert_eq!(sel.commit(), Some(Rectangle::new(100, 100, 100, 50)));
    }

    #[test]
    fn test_degenerate_commit_is_abandoned() {
        let mut zero_width = defining((100, 100), (100, 300));
        assert_eq!(zero_width.commit(), None);

        let mut zero_height = defining((100, 100), (300, 100));
        assert_eq!(zero_height.commit(), None);

        let mut click_only = selector();
        click_only.press(Point::new(5, 5));
        assert_eq!(click_only.commit(), None);
    }

    #[test]
    fn test_commit_from_idle_is_abandoned() {
        let mut sel = selector();
        assert_eq!(sel.commit(), None);
        assert_eq!(sel.state(), SelectorState::Committed);
    }

    #[test]
    fn test_commit_is_clipped_to_device() {
        let mut sel = RegionSelector::new(Rectangle::new(0, 0, 800, 600));
        sel.press(Point::new(-50, 500));
        sel.release(Point::new(100, 700));
        assert_eq!(sel.commit(), Some(Rectangle::new(0, 500, 100, 100)));
    }

    #[test]
    fn test_second_press_picks_nearest_edge() {
        // start (100,100), end (300,200)
        let cases = [
            (Point::new(98, 150), DragTarget::StartX),
            (Point::new(200, 104), DragTarget::StartY),
            (Point::new(305, 150), DragTarget::EndX),
            (Point::new(200, 199), DragTarget::EndY),
        ];
        for (press, expected) in cases {
            let mut sel = defining((100, 100), (300, 200));
            sel.press(press);
            assert_eq!(sel.selection().unwrap().target, expected, "press {:?}", press);
        }
    }

    #[test]
    fn test_ties_resolve_in_fixed_order() {
        // |x-start.x| == |y-start.y| == 10
        let mut sel = defining((100, 100), (300, 200));
        sel.press(Point::new(110, 110));
        assert_eq!(sel.selection().unwrap().target, DragTarget::StartX);

        // |y-start.y| == |x-end.x| == 5, both beat start.x
        let mut sel = defining((100, 100), (300, 200));
        sel.press(Point::new(295, 105));
        assert_eq!(sel.selection().unwrap().target, DragTarget::StartY);

        // |x-end.x| == |y-end.y| == 3
        let mut sel = defining((100, 100), (300, 200));
        sel.press(Point::new(297, 197));
        assert_eq!(sel.selection().unwrap().target, DragTarget::EndX);
    }

    #[test]
    fn test_adjustment_moves_single_axis() {
        let mut sel = defining((100, 100), (300, 200));
        sel.press(Point::new(102, 150));
        sel.drag(Point::new(50, 400));
        sel.release(Point::new(60, 400));
        let s = sel.selection().unwrap();
        assert_eq!(s.start, Point::new(60, 100));
        assert_eq!(s.end, Point::new(300, 200));
        assert_eq!(sel.pending_rectangle(), Some(Rectangle::new(60, 100, 240, 100)));
    }

    #[test]
    fn test_edges_may_cross() {
        let mut sel = defining((100, 100), (300, 200));
        sel.press(Point::new(299, 150));
        sel.release(Point::new(20, 150));
        assert_eq!(sel.commit(), Some(Rectangle::new(20, 100, 80, 100)));
    }

    #[test]
    fn test_events_after_commit_are_ignored() {
        let mut sel = defining((10, 10), (20, 20));
        assert!(sel.commit().is_some());
        sel.press(Point::new(0, 0));
        sel.drag(Point::new(500, 500));
        assert!(sel.selection().is_none());
        assert_eq!(sel.pending_rectangle(), None);
        assert_eq!(sel.commit(), None);
    }
}
