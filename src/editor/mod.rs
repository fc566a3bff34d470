pub mod clipboard;
pub mod compare;
pub mod drag;
pub mod frame;
pub mod save;

pub use clipboard::ClipboardManager;
pub use compare::{compare, CompareError, CompareMode};
pub use drag::{Placement, WindowDrag};
pub use frame::Frame;
pub use save::{resolve_target, save_raster, unconfirmed_overwrite, SaveError, SAVE_FORMATS};
