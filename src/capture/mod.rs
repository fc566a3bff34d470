//! Capture module for screen grabbing and the geometry it works in
//!
//! This module provides an abstraction over the xcap library so that the
//! selection and snapshot logic can run against any `ScreenSource`.

pub mod geometry;
pub mod screen;

pub use geometry::{Point, Rectangle};
pub use screen::{
    capture_all_devices, crop, CaptureError, CaptureResult, DisplayDevice,
    Raster, ScreenSource, XcapSource,
};
