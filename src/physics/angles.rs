//! Joint angle geometry
//!
//! All angles come from 2D vectors between landmark positions using the
//! dot product: cos(θ) = (v1 · v2) / (|v1| × |v2|). Image Y grows downward.

use nalgebra::Vector2;

use crate::pose::Degrees;

/// Vectors shorter than this (pixels) carry no direction
const MIN_VECTOR_LENGTH: f64 = 1e-4;

/// Straight up in image coordinates
fn up() -> Vector2<f64> {
    Vector2::new(0.0, -1.0)
}

/// Straight down in image coordinates
fn down() -> Vector2<f64> {
    Vector2::new(0.0, 1.0)
}

fn vector(from: (f64, f64), to: (f64, f64)) -> Vector2<f64> {
    Vector2::new(to.0 - from.0, to.1 - from.1)
}

/// Unsigned angle between two vectors, None when either is degenerate
pub fn angle_between(v1: Vector2<f64>, v2: Vector2<f64>) -> Option<Degrees> {
    let mag1 = v1.norm();
    let mag2 = v2.norm();
    if mag1 < MIN_VECTOR_LENGTH || mag2 < MIN_VECTOR_LENGTH {
        return None;
    }
    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    Some(Degrees::from_radians(cos_angle.acos()))
}

/// Angle at `vertex` formed by the segments to `a` and `c`
///
/// - 180° = the three points are in a straight line
/// - 90° = right angle at the vertex
pub fn joint_angle(a: (f64, f64), vertex: (f64, f64), c: (f64, f64)) -> Option<Degrees> {
    angle_between(vector(vertex, a), vector(vertex, c))
}

/// Lean of the segment `base → tip` away from straight up
///
/// 0° = tip directly above base, 90° = horizontal.
pub fn lean_from_vertical(base: (f64, f64), tip: (f64, f64)) -> Option<Degrees> {
    angle_between(vector(base, tip), up())
}

/// Swing of the segment `pivot → end` away from hanging straight down
///
/// 0° = hanging, 90° = horizontal, 180° = overhead.
pub fn swing_from_hanging(pivot: (f64, f64), end: (f64, f64)) -> Option<Degrees> {
    angle_between(vector(pivot, end), down())
}

pub fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    vector(a, b).norm()
}
