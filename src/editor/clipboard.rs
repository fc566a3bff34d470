use gtk4::gdk::{self, MemoryFormat, MemoryTexture};
use gtk4::glib;
use gtk4::prelude::*;
use log::debug;

use crate::capture::Raster;

pub type ClipboardResult<T> = Result<T, ClipboardError>;

#[derive(Debug)]
pub enum ClipboardError {
    EmptyImage,
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::EmptyImage => write!(f, "Clipboard error: image is empty"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Wrap a raster in a GDK texture without re-encoding
pub fn raster_to_texture(raster: &Raster) -> ClipboardResult<gdk::Texture> {
    if raster.width() == 0 || raster.height() == 0 {
        return Err(ClipboardError::EmptyImage);
    }

    let bytes = glib::Bytes::from(raster.as_raw().as_slice());
    let texture = MemoryTexture::new(
        raster.width() as i32,
        raster.height() as i32,
        MemoryFormat::R8g8b8a8,
        &bytes,
        raster.width() as usize * 4,
    );
    Ok(texture.upcast())
}

pub fn copy_raster_to_clipboard(raster: &Raster, display: &gdk::Display) -> ClipboardResult<()> {
    let texture = raster_to_texture(raster)?;
    display.clipboard().set_texture(&texture);
    debug!(
        "Copied {}x{} image to clipboard",
        raster.width(),
        raster.height()
    );
    Ok(())
}

pub struct ClipboardManager {
    display: gdk::Display,
}

impl ClipboardManager {
    pub fn from_widget(widget: &impl IsA<gtk4::Widget>) -> Self {
        Self {
            display: widget.display(),
        }
    }

    pub fn copy_image(&self, raster: &Raster) -> ClipboardResult<()> {
        copy_raster_to_clipboard(raster, &self.display)
    }
}
