//! Screen capture module using xcap library
//!
//! Provides the display enumeration and full-screen grab used by a snip
//! session, plus the cropping helper that turns a committed rectangle into a
//! snapshot raster.

use image::RgbaImage;
use log::{debug, warn};
use xcap::Monitor;

use super::geometry::Rectangle;

/// In-memory pixel grid of a capture or a crop thereof
pub type Raster = RgbaImage;

/// Information about a display device
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayDevice {
    pub id: u32,
    pub name: String,
    /// Bounds in absolute screen coordinates
    pub bounds: Rectangle,
    pub is_primary: bool,
    pub scale_factor: f32,
}

impl DisplayDevice {
    /// Create DisplayDevice from xcap Monitor
    fn from_xcap(monitor: &Monitor) -> Result<Self, CaptureError> {
        Ok(Self {
            id: monitor.id().map_err(CaptureError::from_backend)?,
            name: monitor.name().map_err(CaptureError::from_backend)?,
            bounds: Rectangle::new(
                monitor.x().map_err(CaptureError::from_backend)?,
                monitor.y().map_err(CaptureError::from_backend)?,
                monitor.width().map_err(CaptureError::from_backend)?,
                monitor.height().map_err(CaptureError::from_backend)?,
            ),
            is_primary: monitor.is_primary().map_err(CaptureError::from_backend)?,
            scale_factor: monitor.scale_factor().map_err(CaptureError::from_backend)?,
        })
    }

    pub fn label(&self) -> String {
        if self.is_primary {
            format!("{} ({}, primary)", self.name, self.bounds)
        } else {
            format!("{} ({})", self.name, self.bounds)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// The device is no longer connected
    DeviceUnavailable(u32),
    /// The platform refused screen capture
    PermissionDenied(String),
    /// Any other failure reported by the capture backend
    Backend(String),
}

impl CaptureError {
    fn from_backend(err: impl std::fmt::Display) -> Self {
        let message = err.to_string();
        let lower = message.to_lowercase();
        if lower.contains("permission") || lower.contains("denied") {
            CaptureError::PermissionDenied(message)
        } else {
            CaptureError::Backend(message)
        }
    }
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::DeviceUnavailable(id) => {
                write!(f, "Display {} is no longer available", id)
            }
            CaptureError::PermissionDenied(msg) => {
                write!(f, "Screen capture permission denied: {}", msg)
            }
            CaptureError::Backend(msg) => write!(f, "Screen capture failed: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}

/// Result of a screen capture operation
///
/// `device.bounds` carries the raster's dimensions, so the bounds and the
/// pixels always agree even on scaled outputs.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub raster: Raster,
    pub device: DisplayDevice,
}

/// Supplies display devices and their full-screen rasters
pub trait ScreenSource {
    /// Active display devices with their current bounds
    fn devices(&self) -> Result<Vec<DisplayDevice>, CaptureError>;

    /// Grab the full bounds of the device with the given id
    fn capture(&self, device_id: u32) -> Result<CaptureResult, CaptureError>;
}

/// Live screen source backed by xcap
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapSource;

impl XcapSource {
    fn monitors() -> Result<Vec<Monitor>, CaptureError> {
        Monitor::all().map_err(CaptureError::from_backend)
    }
}

impl ScreenSource for XcapSource {
    fn devices(&self) -> Result<Vec<DisplayDevice>, CaptureError> {
        let monitors = Self::monitors()?;
        let mut devices = Vec::with_capacity(monitors.len());
        for monitor in &monitors {
            match DisplayDevice::from_xcap(monitor) {
                Ok(device) => devices.push(device),
                Err(e) => warn!("Skipping monitor: {}", e),
            }
        }

        if devices.is_empty() {
            Err(CaptureError::Backend("No monitors found".to_string()))
        } else {
            Ok(devices)
        }
    }

    fn capture(&self, device_id: u32) -> Result<CaptureResult, CaptureError> {
        let monitors = Self::monitors()?;
        let monitor = monitors
            .iter()
            .find(|m| m.id().map(|id| id == device_id).unwrap_or(false))
            .ok_or(CaptureError::DeviceUnavailable(device_id))?;

        let mut device = DisplayDevice::from_xcap(monitor)?;
        let raster = monitor
            .capture_image()
            .map_err(CaptureError::from_backend)?;

        device.bounds.width = raster.width();
        device.bounds.height = raster.height();
        debug!("Captured {}", device.label());

        Ok(CaptureResult { raster, device })
    }
}

/// Capture every device, skipping (and returning) the ones that fail
pub fn capture_all_devices(
    source: &dyn ScreenSource,
) -> Result<(Vec<CaptureResult>, Vec<CaptureError>), CaptureError> {
    let devices = source.devices()?;

    let mut results = Vec::new();
    let mut failures = Vec::new();
    for device in &devices {
        match source.capture(device.id) {
            Ok(result) => results.push(result),
            Err(e) => {
                warn!("Failed to capture {}: {}", device.label(), e);
                failures.push(e);
            }
        }
    }

    Ok((results, failures))
}

/// Crop an absolute-coordinate rectangle out of a device capture
///
/// The rectangle is clipped to the device bounds; `None` if nothing remains.
/// Returns the crop together with the rectangle actually covered.
pub fn crop(capture: &CaptureResult, rectangle: &Rectangle) -> Option<(Raster, Rectangle)> {
    let bounds = capture.device.bounds;
    let clipped = rectangle.intersect(&bounds)?;
    let local = clipped.translate(-bounds.x, -bounds.y);

    let raster_bounds = Rectangle::new(0, 0, capture.raster.width(), capture.raster.height());
    let local = local.intersect(&raster_bounds)?;

    let image = image::imageops::crop_imm(
        &capture.raster,
        local.x as u32,
        local.y as u32,
        local.width,
        local.height,
    )
    .to_image();

    Some((image, local.translate(bounds.x, bounds.y)))
}
