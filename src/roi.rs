//! Drivable-road mask bounded by the left and right lanes.
use crate::backends::FloodFill;
use crate::draw::draw_line;
use crate::image::{apply_mask, GrayImage, PixelGrid, Pixel};
use crate::types::{Lane, Point};
use log::debug;

/// Mask value marking road pixels.
pub const ROAD_VALUE: u8 = 255;

/// Draws both lanes into a blank mask and floods it from the image centre.
///
/// The centre is assumed to lie between the lanes. When it does not, the fill
/// either leaks over the whole frame or touches nothing; the mask is returned
/// as is in both cases.
pub fn build_road_mask(
    width: usize,
    height: usize,
    left: &Lane,
    right: &Lane,
    filler: &dyn FloodFill,
) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    draw_line(&mut mask, left.top, left.bottom, ROAD_VALUE);
    draw_line(&mut mask, right.top, right.bottom, ROAD_VALUE);
    let seed = Point::new((width / 2) as i32, (height / 2) as i32);
    let filled = filler.fill(&mut mask, seed, ROAD_VALUE);
    debug!(
        "roi: flood fill from ({}, {}) set {} of {} pixels",
        seed.x,
        seed.y,
        filled,
        width * height
    );
    mask
}

/// Copies `image` where `mask` is set; everything else becomes background.
pub fn extract_roi<P: Pixel>(image: &PixelGrid<P>, mask: &GrayImage) -> PixelGrid<P> {
    apply_mask(image, mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::ScanlineFloodFill;
    use crate::image::{ImageView, RgbImage};

    #[test]
    fn mask_fills_the_wedge_between_lanes() {
        let (w, h) = (100, 80);
        let left = Lane::new(Point::new(50, 0), Point::new(10, 79));
        let right = Lane::new(Point::new(50, 0), Point::new(90, 79));
        let mask = build_road_mask(w, h, &left, &right, &ScanlineFloodFill);
        assert_eq!(mask.get(50, 40), ROAD_VALUE);
        assert_eq!(mask.get(50, 78), ROAD_VALUE);
        assert_eq!(mask.get(5, 40), 0);
        assert_eq!(mask.get(95, 40), 0);
        assert_eq!(mask.get(20, 5), 0);
    }

    #[test]
    fn roi_keeps_only_masked_pixels() {
        let image = RgbImage::filled(4, 2, [10, 20, 30]);
        let mut mask = GrayImage::new(4, 2);
        mask.as_mut_slice()[1] = ROAD_VALUE;
        let roi = extract_roi(&image, &mask);
        assert_eq!(roi.get(1, 0), [10, 20, 30]);
        assert_eq!(roi.count_foreground(), 1);
    }
}
