use gtk4 as gtk;

use gtk::gdk_pixbuf::{Colorspace, Pixbuf};
use gtk::glib;
use gtk4::prelude::*;

use crate::capture::Raster;
use crate::editor::Frame;
use crate::selection::{spotlight_regions, RegionSelector, DIM_ALPHA};

/// Wrap raster pixels in a pixbuf for cairo
pub fn raster_to_pixbuf(raster: &Raster) -> Pixbuf {
    let width = raster.width() as i32;
    let height = raster.height() as i32;
    let bytes = glib::Bytes::from(raster.as_raw().as_slice());

    Pixbuf::from_bytes(&bytes, Colorspace::Rgb, true, 8, width, height, width * 4)
}

/// Scale that fits an image into the drawing area
pub fn fit_scale(da_width: i32, da_height: i32, img_width: i32, img_height: i32) -> f64 {
    if img_width <= 0 || img_height <= 0 {
        return 1.0;
    }
    let scale_x = da_width as f64 / img_width as f64;
    let scale_y = da_height as f64 / img_height as f64;
    let scale = scale_x.min(scale_y);
    if scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// Paint a full-screen capture with the pending selection spotlighted
pub fn draw_selection(
    cr: &gtk::cairo::Context,
    pixbuf: &Pixbuf,
    selector: &RegionSelector,
    scale: f64,
) {
    cr.set_source_rgb(0.0, 0.0, 0.0);
    let _ = cr.paint();

    cr.save().ok();
    cr.scale(scale, scale);
    cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
    let _ = cr.paint();

    let Some(rect) = selector.pending_rectangle() else {
        cr.restore().ok();
        return;
    };

    cr.set_source_rgba(0.0, 0.0, 0.0, DIM_ALPHA);
    for band in spotlight_regions(pixbuf.width() as u32, pixbuf.height() as u32, &rect) {
        if !band.is_empty() {
            cr.rectangle(
                band.x as f64,
                band.y as f64,
                band.width as f64,
                band.height as f64,
            );
        }
    }
    let _ = cr.fill();
    cr.restore().ok();
}

/// Paint a snapshot: border color first, then the image inside the frame
pub fn draw_snapshot(cr: &gtk::cairo::Context, pixbuf: &Pixbuf, frame: &Frame) {
    let (r, g, b) = frame.color.to_rgb_f64();
    cr.set_source_rgb(r, g, b);
    let _ = cr.paint();

    let offset = frame.image_offset();
    cr.set_source_pixbuf(pixbuf, offset.x as f64, offset.y as f64);
    let _ = cr.paint();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale() {
        assert_eq!(fit_scale(1920, 1080, 3840, 2160), 0.5);
        assert_eq!(fit_scale(800, 600, 800, 600), 1.0);
        assert_eq!(fit_scale(0, 0, 800, 600), 1.0);
        assert_eq!(fit_scale(800, 600, 0, 0), 1.0);
    }
}
