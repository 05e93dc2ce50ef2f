use serde::{Deserialize, Serialize};

/// Integer pixel coordinate; origin top-left, `y` grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Integer midpoint, truncating toward zero.
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2, (self.y + other.y) / 2)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Straight-line approximation of one lane boundary in image-clipped form.
///
/// Both endpoints lie inside the image rectangle. `top` sits on the top row
/// unless the vanishing point is already inside the frame; `bottom` sits on
/// the bottom, left or right border.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub top: Point,
    pub bottom: Point,
}

impl Lane {
    pub const fn new(top: Point, bottom: Point) -> Self {
        Self { top, bottom }
    }

    pub fn midpoint(&self) -> Point {
        self.top.midpoint(self.bottom)
    }

    /// `x` of the supporting line at row `y`; `None` for horizontal lanes.
    pub fn x_at(&self, y: f64) -> Option<f64> {
        let dy = (self.bottom.y - self.top.y) as f64;
        if dy == 0.0 {
            return None;
        }
        let t = (y - self.top.y as f64) / dy;
        Some(self.top.x as f64 + t * (self.bottom.x - self.top.x) as f64)
    }
}

/// Left, middle and right lanes of a three-lane detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeLanes {
    pub left: Lane,
    pub middle: Lane,
    pub right: Lane,
}
