mod adjust;
mod export;
mod load;

pub use adjust::{adjust_rgba_in_place, apply_adjustments};
pub use export::{PixelRect, RenderQuality, encode_png, rasterize};
pub use load::decode_source;
