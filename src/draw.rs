//! Rasterization helpers: 1-pixel Bresenham lines for masks and thicker
//! overlays for visual output.
use crate::image::{ImageViewMut, RgbImage};
use crate::types::{Lane, Point};

/// Bresenham's line algorithm iterator.
///
/// Yields every pixel from `start` to `end` inclusive, 8-connected.
pub struct BresenhamLine {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    x_inc: i32,
    y_inc: i32,
    error: i32,
    steep: bool,
    end_x: i32,
    done: bool,
}

impl BresenhamLine {
    pub fn new(start: Point, end: Point) -> Self {
        let dx = (end.x - start.x).abs();
        let dy = (end.y - start.y).abs();
        let steep = dy > dx;

        let (x, y, end_x, end_y, dx, dy) = if steep {
            (start.y, start.x, end.y, end.x, dy, dx)
        } else {
            (start.x, start.y, end.x, end.y, dx, dy)
        };

        Self {
            x,
            y,
            dx,
            dy,
            x_inc: if end_x > x { 1 } else { -1 },
            y_inc: if end_y > y { 1 } else { -1 },
            error: dx / 2,
            steep,
            end_x,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }
        let current = if self.steep {
            Point::new(self.y, self.x)
        } else {
            Point::new(self.x, self.y)
        };
        if self.x == self.end_x {
            self.done = true;
        } else {
            self.error -= self.dy;
            if self.error < 0 {
                self.y += self.y_inc;
                self.error += self.dx;
            }
            self.x += self.x_inc;
        }
        Some(current)
    }
}

/// Draws a 1-pixel line; pixels outside the image are skipped.
pub fn draw_line<I: ImageViewMut>(image: &mut I, a: Point, b: Point, value: I::Pixel) {
    for p in BresenhamLine::new(a, b) {
        image.put(p, value);
    }
}

/// Draws a line as a square brush of side `thickness`.
pub fn draw_thick_line<I: ImageViewMut>(
    image: &mut I,
    a: Point,
    b: Point,
    value: I::Pixel,
    thickness: u32,
) {
    let lo = -((thickness.max(1) as i32 - 1) / 2);
    let hi = lo + thickness.max(1) as i32;
    for p in BresenhamLine::new(a, b) {
        for dy in lo..hi {
            for dx in lo..hi {
                image.put(Point::new(p.x + dx, p.y + dy), value);
            }
        }
    }
}

/// Small plus-shaped marker, used for the vanishing point.
pub fn draw_cross<I: ImageViewMut>(image: &mut I, center: Point, arm: i32, value: I::Pixel) {
    draw_line(
        image,
        Point::new(center.x - arm, center.y),
        Point::new(center.x + arm, center.y),
        value,
    );
    draw_line(
        image,
        Point::new(center.x, center.y - arm),
        Point::new(center.x, center.y + arm),
        value,
    );
}

pub fn draw_lane(image: &mut RgbImage, lane: &Lane, color: [u8; 3], thickness: u32) {
    draw_thick_line(image, lane.top, lane.bottom, color, thickness);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{GrayImage, ImageView};

    #[test]
    fn bresenham_covers_both_endpoints() {
        let cells: Vec<_> = BresenhamLine::new(Point::new(0, 0), Point::new(2, 5)).collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Point::new(0, 0));
        assert_eq!(cells[5], Point::new(2, 5));

        let back: Vec<_> = BresenhamLine::new(Point::new(5, 5), Point::new(0, 0)).collect();
        assert_eq!(back.len(), 6);
        assert_eq!(back[5], Point::new(0, 0));

        let single: Vec<_> = BresenhamLine::new(Point::new(3, 3), Point::new(3, 3)).collect();
        assert_eq!(single, vec![Point::new(3, 3)]);
    }

    #[test]
    fn lines_partially_outside_are_cropped() {
        let mut img = GrayImage::new(10, 10);
        draw_line(&mut img, Point::new(-5, 5), Point::new(14, 5), 255);
        assert_eq!(img.count_foreground(), 10);
        assert!((0..10).all(|x| img.get(x, 5) == 255));
    }

    #[test]
    fn thick_line_spans_brush_width() {
        let mut img = GrayImage::new(20, 20);
        draw_thick_line(&mut img, Point::new(10, 2), Point::new(10, 17), 200, 3);
        for x in 9..=11 {
            assert_eq!(img.get(x, 10), 200);
        }
        assert_eq!(img.get(8, 10), 0);
        assert_eq!(img.get(12, 10), 0);
    }
}
