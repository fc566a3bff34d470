//! Optional colored border around a displayed snapshot

use crate::app::BorderColor;
use crate::capture::Point;

/// Border thickness on every side, in pixels
pub const BORDER_WIDTH: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub visible: bool,
    pub color: BorderColor,
}

impl Frame {
    pub fn new(color: BorderColor) -> Self {
        Self {
            visible: true,
            color,
        }
    }

    pub fn thickness(&self) -> u32 {
        if self.visible {
            BORDER_WIDTH
        } else {
            0
        }
    }

    /// Outer window size for an image of the given size
    pub fn window_size(&self, image_width: u32, image_height: u32) -> (u32, u32) {
        let t = self.thickness();
        (image_width + 2 * t, image_height + 2 * t)
    }

    /// Top-left of the image inside the window
    pub fn image_offset(&self) -> Point {
        let t = self.thickness() as i32;
        Point::new(t, t)
    }

    /// Window position that puts the image at `image_origin` on screen
    pub fn window_position(&self, image_origin: Point) -> Point {
        image_origin - self.image_offset()
    }

    /// Show or hide the border, returning the new window position so the
    /// image itself stays where it is on screen
    pub fn set_visible(&mut self, visible: bool, window_position: Point) -> Point {
        let image_origin = window_position + self.image_offset();
        self.visible = visible;
        self.window_position(image_origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_grows_window() {
        let frame = Frame::new(BorderColor::BLACK);
        assert_eq!(frame.window_size(100, 50), (104, 54));
        assert_eq!(frame.window_position(Point::new(100, 100)), Point::new(98, 98));
    }

    #[test]
    fn test_toggle_keeps_image_in_place() {
        let mut frame = Frame::new(BorderColor::RED);
        let hidden = frame.set_visible(false, Point::new(98, 98));
        assert_eq!(hidden, Point::new(100, 100));
        assert_eq!(frame.window_size(100, 50), (100, 50));

        let shown = frame.set_visible(true, hidden);
        assert_eq!(shown, Point::new(98, 98));
    }
}
