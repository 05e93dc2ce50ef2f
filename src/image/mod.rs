pub mod color;
pub mod grid;
pub mod io;
pub mod traits;

pub use self::color::{apply_mask, gray_to_rgb, rgb_to_gray};
pub use self::grid::{GrayImage, LabelGrid, Pixel, PixelGrid, RgbImage};
pub use self::traits::{ImageView, ImageViewMut, Rows};
