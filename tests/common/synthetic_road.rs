use lane_roi::draw::draw_thick_line;
use lane_roi::image::RgbImage;
use lane_roi::segments::LineSegment;
use lane_roi::types::Point;

pub const ASPHALT: [u8; 3] = [70, 70, 70];
pub const MARKING: [u8; 3] = [230, 230, 230];

/// Straight road with two converging boundary markings and a solid vertical
/// centre marking.
pub struct RoadScene {
    pub width: usize,
    pub height: usize,
    pub vanishing_point: Point,
    pub left_bottom: Point,
    pub right_bottom: Point,
    /// Row where the painted markings end.
    pub horizon: i32,
    pub marking_width: u32,
}

impl Default for RoadScene {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            vanishing_point: Point::new(160, 60),
            left_bottom: Point::new(40, 239),
            right_bottom: Point::new(280, 239),
            horizon: 80,
            marking_width: 5,
        }
    }
}

impl RoadScene {
    /// Point on the line from `bottom` towards the vanishing point at `y`.
    pub fn towards_vp(&self, bottom: Point, y: i32) -> Point {
        let vp = self.vanishing_point;
        let t = (bottom.y - y) as f64 / (bottom.y - vp.y) as f64;
        let x = bottom.x as f64 + t * (vp.x - bottom.x) as f64;
        Point::new(x.round() as i32, y)
    }

    pub fn render(&self) -> RgbImage {
        let mut img = RgbImage::filled(self.width, self.height, ASPHALT);
        for bottom in [self.left_bottom, self.right_bottom] {
            let top = self.towards_vp(bottom, self.horizon);
            draw_thick_line(&mut img, bottom, top, MARKING, self.marking_width);
        }
        let mid = self.vanishing_point.x;
        draw_thick_line(
            &mut img,
            Point::new(mid, self.height as i32 - 1),
            Point::new(mid, self.horizon),
            MARKING,
            self.marking_width,
        );
        img
    }
}

/// Segment from `bottom` a fraction `frac` of the way to `vp`.
pub fn segment_towards(vp: Point, bottom: Point, frac: f64) -> LineSegment {
    let x = bottom.x as f64 + (vp.x - bottom.x) as f64 * frac;
    let y = bottom.y as f64 + (vp.y - bottom.y) as f64 * frac;
    LineSegment::new(bottom.x, bottom.y, x.round() as i32, y.round() as i32)
}

/// Uniform gray frame; contents do not matter when every backend is stubbed.
pub fn flat_frame(width: usize, height: usize) -> RgbImage {
    RgbImage::filled(width, height, [100, 100, 100])
}
