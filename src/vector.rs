//! Integer grid coordinates and the playfield rectangle they live in.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A cell coordinate on the playfield. x grows right, y grows down (row 0 is the top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vector2I {
    pub x: i32,
    pub y: i32,
}

impl Vector2I {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// max(|dx|, |dy|): number of king moves between two cells.
    pub fn chebyshev(self, other: Self) -> i32 {
        let d = self - other;
        d.x.abs().max(d.y.abs())
    }

    /// Component-wise sign, each axis in -1..=1.
    pub fn signum(self) -> Self {
        Self::new(self.x.signum(), self.y.signum())
    }

    pub fn clamp_to(self, bounds: Bounds) -> Self {
        Self::new(
            self.x.clamp(0, bounds.width - 1),
            self.y.clamp(0, bounds.height - 1),
        )
    }
}

impl Add for Vector2I {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2I {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2I {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Vector2I {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vector2I {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Playfield size in cells. Valid cells are `[0, width-1] x [0, height-1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn contains(&self, v: Vector2I) -> bool {
        v.x >= 0 && v.x < self.width && v.y >= 0 && v.y < self.height
    }

    #[inline]
    pub fn bottom_row(&self) -> i32 {
        self.height - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Vector2I::new(3, -2);
        let b = Vector2I::new(1, 5);
        assert_eq!(a + b, Vector2I::new(4, 3));
        assert_eq!(a - b, Vector2I::new(2, -7));
        assert_eq!(a * 3, Vector2I::new(9, -6));
        assert_eq!(-a, Vector2I::new(-3, 2));
    }

    #[test]
    fn test_chebyshev() {
        let p = Vector2I::new(10, 10);
        assert_eq!(p.chebyshev(p), 0);
        assert_eq!(p.chebyshev(Vector2I::new(11, 9)), 1);
        assert_eq!(p.chebyshev(Vector2I::new(12, 11)), 2);
        assert_eq!(p.chebyshev(Vector2I::new(4, 13)), 6);
    }

    #[test]
    fn test_signum_is_sign_only() {
        assert_eq!(Vector2I::new(-40, 7).signum(), Vector2I::new(-1, 1));
        assert_eq!(Vector2I::new(0, -3).signum(), Vector2I::new(0, -1));
    }

    #[test]
    fn test_clamp_and_contains() {
        let b = Bounds::new(160, 40);
        assert_eq!(Vector2I::new(-5, 50).clamp_to(b), Vector2I::new(0, 39));
        assert!(b.contains(Vector2I::new(159, 39)));
        assert!(!b.contains(Vector2I::new(160, 0)));
        assert!(!b.contains(Vector2I::new(0, -1)));
        assert_eq!(b.bottom_row(), 39);
    }
}
