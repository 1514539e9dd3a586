//! Unicode UI icon constants.
//!
//! BMP-only glyphs so the default fonts cover them.

pub const ICON_UPLOAD: &str = "⇧";
pub const ICON_DOWNLOAD: &str = "⇩";
pub const ICON_RESET: &str = "⟲";
pub const ICON_CROP: &str = "⛶";
pub const ICON_BRIGHTNESS: &str = "☀";
pub const ICON_HUE: &str = "◐";
pub const ICON_SATURATION: &str = "◍";
pub const ICON_CONTRAST: &str = "◑";
