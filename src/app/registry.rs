//! Open snapshots and the session-wide registry tracking them

use log::{debug, info};
use std::path::PathBuf;

use crate::capture::{crop, CaptureError, CaptureResult, DisplayDevice, Point, Raster, Rectangle, ScreenSource};
use crate::editor::{compare, CompareError, CompareMode, Placement};

/// Identifier of an open snapshot; assigned once, never reused
pub type SnapshotId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotError {
    Capture(CaptureError),
    Compare(CompareError),
    /// The rectangle no longer overlaps its display
    OutsideDisplay(Rectangle),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Capture(e) => write!(f, "{}", e),
            SnapshotError::Compare(e) => write!(f, "{}", e),
            SnapshotError::OutsideDisplay(rect) => {
                write!(f, "Region {} is outside its display", rect)
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Capture(e) => Some(e),
            SnapshotError::Compare(e) => Some(e),
            SnapshotError::OutsideDisplay(_) => None,
        }
    }
}

impl From<CaptureError> for SnapshotError {
    fn from(e: CaptureError) -> Self {
        SnapshotError::Capture(e)
    }
}

impl From<CompareError> for SnapshotError {
    fn from(e: CompareError) -> Self {
        SnapshotError::Compare(e)
    }
}

/// A committed captured region
#[derive(Debug, Clone)]
pub struct Snapshot {
    raster: Raster,
    rectangle: Rectangle,
    device: DisplayDevice,
    original: Option<SnapshotId>,
}

impl Snapshot {
    /// Cut `rectangle` (absolute coordinates) out of a device capture
    pub fn from_capture(
        capture: &CaptureResult,
        rectangle: &Rectangle,
    ) -> Result<Self, SnapshotError> {
        let (raster, covered) =
            crop(capture, rectangle).ok_or(SnapshotError::OutsideDisplay(*rectangle))?;
        Ok(Self {
            raster,
            rectangle: covered,
            device: capture.device.clone(),
            original: None,
        })
    }

    /// Grab a fresh raster of `rectangle` from the device
    pub fn capture(
        source: &dyn ScreenSource,
        device_id: u32,
        rectangle: &Rectangle,
    ) -> Result<Self, SnapshotError> {
        let capture = source.capture(device_id)?;
        Self::from_capture(&capture, rectangle)
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn rectangle(&self) -> Rectangle {
        self.rectangle
    }

    pub fn device(&self) -> &DisplayDevice {
        &self.device
    }

    pub fn original(&self) -> Option<SnapshotId> {
        self.original
    }

    pub fn size(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    /// Replace the raster with a fresh grab of the same rectangle
    ///
    /// The crop is clipped to the device's current bounds. On error the
    /// snapshot is left untouched.
    pub fn recapture(&mut self, source: &dyn ScreenSource) -> Result<(), SnapshotError> {
        let fresh = Self::capture(source, self.device.id, &self.rectangle)?;
        debug!(
            "Recaptured {} -> {}",
            self.rectangle, fresh.rectangle
        );
        self.raster = fresh.raster;
        self.rectangle = fresh.rectangle;
        self.device = fresh.device;
        Ok(())
    }

    /// A new snapshot of the same rectangle, linked to `id` as its original
    pub fn clone_from_screen(
        &self,
        source: &dyn ScreenSource,
        id: SnapshotId,
    ) -> Result<Snapshot, SnapshotError> {
        let mut copy = Self::capture(source, self.device.id, &self.rectangle)?;
        copy.original = Some(id);
        Ok(copy)
    }

    /// Clone from screen, then rewrite the clone as the comparison against
    /// this snapshot's raster
    pub fn compare_with_screen(
        &self,
        source: &dyn ScreenSource,
        id: SnapshotId,
        mode: CompareMode,
    ) -> Result<Snapshot, SnapshotError> {
        let mut copy = self.clone_from_screen(source, id)?;
        compare(&self.raster, &mut copy.raster, mode)?;
        Ok(copy)
    }
}

/// One open snapshot window
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub id: SnapshotId,
    pub snapshot: Snapshot,
    pub placement: Placement,
    pub saved_path: Option<PathBuf>,
}

/// One row of the session report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub id: SnapshotId,
    pub placement: Placement,
    pub size: (u32, u32),
    pub from: Point,
    pub to: Point,
    pub saved_path: Option<PathBuf>,
    pub original: Option<SnapshotId>,
}

impl ReportRow {
    pub const HEADERS: [&'static str; 7] = [
        "ID",
        "Current Position",
        "Image Size",
        "Snip From",
        "Snip To",
        "Saved As",
        "Original",
    ];

    pub fn cells(&self) -> [String; 7] {
        [
            self.id.to_string(),
            self.placement.to_string(),
            format!("{}x{}", self.size.0, self.size.1),
            format!("{},{}", self.from.x, self.from.y),
            format!("{},{}", self.to.x, self.to.y),
            self.saved_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            self.original.map(|id| id.to_string()).unwrap_or_default(),
        ]
    }
}

/// All open snapshots, in creation order
#[derive(Debug)]
pub struct SessionRegistry {
    next_id: SnapshotId,
    entries: Vec<SessionEntry>,
    always_on_top: bool,
    hidden: bool,
}

impl SessionRegistry {
    pub fn new(always_on_top: bool) -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
            always_on_top,
            hidden: false,
        }
    }

    pub fn register(&mut self, snapshot: Snapshot, position: Point) -> SnapshotId {
        let id = self.next_id;
        self.next_id += 1;
        info!(
            "Snapshot {} opened: {} on {}",
            id,
            snapshot.rectangle(),
            snapshot.device().name
        );
        self.entries.push(SessionEntry {
            id,
            snapshot,
            placement: Placement::Known(position),
            saved_path: None,
        });
        id
    }

    pub fn remove(&mut self, id: SnapshotId) -> Option<SessionEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        info!("Snapshot {} closed", id);
        Some(self.entries.remove(index))
    }

    pub fn get(&self, id: SnapshotId) -> Option<&SessionEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: SnapshotId) -> Option<&mut SessionEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn ids(&self) -> Vec<SnapshotId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn always_on_top(&self) -> bool {
        self.always_on_top
    }

    /// Returns the ids the new flag must be applied to
    pub fn set_always_on_top(&mut self, on_top: bool) -> Vec<SnapshotId> {
        self.always_on_top = on_top;
        self.ids()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Returns the ids whose visibility must change
    pub fn set_hidden(&mut self, hidden: bool) -> Vec<SnapshotId> {
        self.hidden = hidden;
        self.ids()
    }

    pub fn set_placement(&mut self, id: SnapshotId, placement: Placement) {
        if let Some(entry) = self.get_mut(id) {
            debug!("Snapshot {} at {}", id, placement);
            entry.placement = placement;
        }
    }

    pub fn set_saved_path(&mut self, id: SnapshotId, path: PathBuf) {
        if let Some(entry) = self.get_mut(id) {
            entry.saved_path = Some(path);
        }
    }

    /// Remove every entry, returning the ids of the windows to close
    pub fn clear(&mut self) -> Vec<SnapshotId> {
        let ids = self.ids();
        self.entries.clear();
        info!("Cleared {} snapshots", ids.len());
        ids
    }

    /// Tabular report of all open snapshots
    ///
    /// The original is only listed while it is still open.
    pub fn report(&self) -> Vec<ReportRow> {
        self.entries
            .iter()
            .map(|entry| {
                let rect = entry.snapshot.rectangle();
                ReportRow {
                    id: entry.id,
                    placement: entry.placement,
                    size: entry.snapshot.size(),
                    from: rect.origin(),
                    to: rect.end(),
                    saved_path: entry.saved_path.clone(),
                    original: entry
                        .snapshot
                        .original()
                        .filter(|id| self.get(*id).is_some()),
                }
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::capture::screen::testing::StaticSource;

    /// A registry holding one 100x50 snapshot placed at `position`
    pub fn registry_with_snapshot(position: Point) -> (SessionRegistry, SnapshotId) {
        let source = StaticSource::single(Rectangle::new(0, 0, 640, 480));
        let snapshot = Snapshot::capture(&source, 1, &Rectangle::new(100, 100, 100, 50)).unwrap();
        let mut registry = SessionRegistry::new(false);
        let id = registry.register(snapshot, position);
        (registry, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::screen::testing::StaticSource;

    fn source() -> StaticSource {
        StaticSource::single(Rectangle::new(0, 0, 640, 480))
    }

    fn snapshot(source: &StaticSource, rect: Rectangle) -> Snapshot {
        Snapshot::capture(source, 1, &rect).unwrap()
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let source = source();
        let mut registry = SessionRegistry::new(true);
        let a = registry.register(snapshot(&source, Rectangle::new(0, 0, 4, 4)), Point::default());
        let b = registry.register(snapshot(&source, Rectangle::new(0, 0, 4, 4)), Point::default());
        assert!(registry.remove(b).is_some());
        let c = registry.register(snapshot(&source, Rectangle::new(0, 0, 4, 4)), Point::default());
        assert_eq!((a, b, c), (1, 2, 3));
        assert_eq!(registry.ids(), vec![1, 3]);
        assert!(registry.remove(b).is_none());
    }

    #[test]
    fn test_report_rows() {
        let source = source();
        let mut registry = SessionRegistry::new(true);
        let rect = Rectangle::new(100, 100, 100, 50);
        let id = registry.register(snapshot(&source, rect), Point::new(98, 98));
        registry.set_saved_path(id, PathBuf::from("/tmp/a.png"));
        registry.set_placement(id, Placement::Known(Point::new(300, 20)));

        let rows = registry.report();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.size, (100, 50));
        assert_eq!(row.from, Point::new(100, 100));
        assert_eq!(row.to, Point::new(200, 150));
        assert_eq!(
            row.cells(),
            [
                "1".to_string(),
                "300,20".to_string(),
                "100x50".to_string(),
                "100,100".to_string(),
                "200,150".to_string(),
                "/tmp/a.png".to_string(),
                String::new(),
            ]
        );
    }

    #[test]
    fn test_report_lists_open_originals_only() {
        let source = source();
        let mut registry = SessionRegistry::new(true);
        let rect = Rectangle::new(10, 10, 20, 20);
        let first = registry.register(snapshot(&source, rect), Point::default());
        let copy = registry
            .get(first)
            .unwrap()
            .snapshot
            .clone_from_screen(&source, first)
            .unwrap();
        let second = registry.register(copy, Point::default());

        assert_eq!(registry.report()[1].original, Some(first));
        registry.remove(first);
        let rows = registry.report();
        assert_eq!(rows[0].id, second);
        assert_eq!(rows[0].original, None);
    }

    #[test]
    fn test_bulk_flags_and_clear() {
        let source = source();
        let mut registry = SessionRegistry::new(true);
        registry.register(snapshot(&source, Rectangle::new(0, 0, 2, 2)), Point::default());
        registry.register(snapshot(&source, Rectangle::new(0, 0, 2, 2)), Point::default());

        assert_eq!(registry.set_always_on_top(false), vec![1, 2]);
        assert!(!registry.always_on_top());
        assert_eq!(registry.set_hidden(true), vec![1, 2]);
        assert!(registry.is_hidden());

        assert_eq!(registry.clear(), vec![1, 2]);
        assert!(registry.is_empty());
        let next = registry.register(snapshot(&source, Rectangle::new(0, 0, 2, 2)), Point::default());
        assert_eq!(next, 3);
    }

    #[test]
    fn test_recapture_replaces_raster() {
        let source = source();
        let mut snap = snapshot(&source, Rectangle::new(10, 10, 8, 8));
        source.color.set([0, 0, 255, 255]);
        snap.recapture(&source).unwrap();
        assert!(snap.raster().pixels().all(|p| p.0 == [0, 0, 255, 255]));
        assert_eq!(snap.size(), (8, 8));
    }

    #[test]
    fn test_recapture_after_display_shrinks_is_clipped() {
        let source = source();
        let mut snap = snapshot(&source, Rectangle::new(600, 400, 40, 80));
        source.set_bounds(Rectangle::new(0, 0, 620, 440));
        snap.recapture(&source).unwrap();
        assert_eq!(snap.rectangle(), Rectangle::new(600, 400, 20, 40));
        assert_eq!(snap.size(), (20, 40));
    }

    #[test]
    fn test_failed_recapture_keeps_snapshot() {
        let source = source();
        let mut snap = snapshot(&source, Rectangle::new(0, 0, 8, 8));
        source.fail.set(true);
        let err = snap.recapture(&source).unwrap_err();
        assert!(matches!(err, SnapshotError::Capture(CaptureError::PermissionDenied(_))));
        assert!(snap.raster().pixels().all(|p| p.0 == [255, 0, 0, 255]));

        source.fail.set(false);
        source.set_bounds(Rectangle::new(0, 0, 4, 4));
        let mut far = snapshot(&StaticSource::single(Rectangle::new(0, 0, 640, 480)), Rectangle::new(100, 100, 8, 8));
        assert!(matches!(
            far.recapture(&source),
            Err(SnapshotError::OutsideDisplay(_))
        ));
        assert_eq!(far.size(), (8, 8));
    }

    #[test]
    fn test_compare_with_unchanged_screen() {
        let source = source();
        let snap = snapshot(&source, Rectangle::new(0, 0, 4, 4));
        let diff = snap
            .compare_with_screen(&source, 7, CompareMode::BlackWhite)
            .unwrap();
        assert_eq!(diff.original(), Some(7));
        assert!(diff.raster().pixels().all(|p| p.0[..3] == [255, 255, 255]));
        assert!(snap.raster().pixels().all(|p| p.0 == [255, 0, 0, 255]));
    }

    #[test]
    fn test_compare_after_shrink_is_dimension_mismatch() {
        let source = source();
        let snap = snapshot(&source, Rectangle::new(600, 400, 40, 80));
        source.set_bounds(Rectangle::new(0, 0, 620, 440));
        let err = snap
            .compare_with_screen(&source, 1, CompareMode::Mixed)
            .unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Compare(CompareError::DimensionMismatch { .. })
        ));
    }
}
