use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Integer 2D vector used for cell, wall and pixel coordinates.
///
/// Multiplying or dividing by an `f32` truncates each component toward zero.
/// Integer division by zero panics like any other integer division.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Vector2 {
    pub x: i32,
    pub y: i32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2::new(0, 0);
    pub const ONE: Vector2 = Vector2::new(1, 1);
    pub const UNIT_X: Vector2 = Vector2::new(1, 0);
    pub const UNIT_Y: Vector2 = Vector2::new(0, 1);

    pub const fn new(x: i32, y: i32) -> Vector2 {
        Vector2 { x, y }
    }
}

impl From<(i32, i32)> for Vector2 {
    fn from((x, y): (i32, i32)) -> Self {
        Vector2::new(x, y)
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, other: Vector2) {
        *self = *self + other;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x - other.x, self.y - other.y)
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, other: Vector2) {
        *self = *self - other;
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl Mul for Vector2 {
    type Output = Vector2;

    fn mul(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x * other.x, self.y * other.y)
    }
}

impl Div for Vector2 {
    type Output = Vector2;

    fn div(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x / other.x, self.y / other.y)
    }
}

impl Mul<i32> for Vector2 {
    type Output = Vector2;

    fn mul(self, scalar: i32) -> Vector2 {
        Vector2::new(self.x * scalar, self.y * scalar)
    }
}

impl Mul<Vector2> for i32 {
    type Output = Vector2;

    fn mul(self, v: Vector2) -> Vector2 {
        v * self
    }
}

impl Div<i32> for Vector2 {
    type Output = Vector2;

    fn div(self, scalar: i32) -> Vector2 {
        Vector2::new(self.x / scalar, self.y / scalar)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Vector2;

    fn mul(self, scalar: f32) -> Vector2 {
        Vector2::new(
            (self.x as f32 * scalar) as i32,
            (self.y as f32 * scalar) as i32,
        )
    }
}

impl Mul<Vector2> for f32 {
    type Output = Vector2;

    fn mul(self, v: Vector2) -> Vector2 {
        v * self
    }
}

impl Div<f32> for Vector2 {
    type Output = Vector2;

    fn div(self, scalar: f32) -> Vector2 {
        Vector2::new(
            (self.x as f32 / scalar) as i32,
            (self.y as f32 / scalar) as i32,
        )
    }
}
