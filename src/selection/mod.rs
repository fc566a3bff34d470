//! Interactive region selection
//!
//! The selector itself is toolkit-agnostic; the UI layer feeds it pointer
//! events and paints the spotlight computed here.

pub mod selector;

pub use selector::RegionSelector;

use crate::capture::Rectangle;

/// Alpha of the black overlay dimming everything outside the selection
pub const DIM_ALPHA: f64 = 64.0 / 255.0;

/// The four dimmed bands (top, bottom, left, right) around `rect` inside a
/// `width` x `height` area. The selection is clamped to the area first, so
/// the bands never overlap and always cover everything outside it.
pub fn spotlight_regions(width: u32, height: u32, rect: &Rectangle) -> [Rectangle; 4] {
    let area = Rectangle::new(0, 0, width, height);
    let hole = rect
        .intersect(&area)
        .unwrap_or_else(|| Rectangle::new(0, 0, 0, 0));

    let top = Rectangle::new(0, 0, width, hole.y as u32);
    let bottom = Rectangle::new(0, hole.bottom(), width, height - hole.bottom() as u32);
    let left = Rectangle::new(0, hole.y, hole.x as u32, hole.height);
    let right = Rectangle::new(hole.right(), hole.y, width - hole.right() as u32, hole.height);

    [top, bottom, left, right]
}
