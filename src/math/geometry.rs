//! Local geometry of three consecutive curve points.

use nalgebra::Vector2;

/// Perpendicular distance from `mid` to the line through `left` and `right`.
///
/// Equals twice the triangle area over the base `|right - left|`.
pub fn triangle_height(left: Vector2<f64>, mid: Vector2<f64>, right: Vector2<f64>) -> f64 {
    let base = right - left;
    let base_len = base.norm();
    if base_len == 0.0 {
        return (mid - left).norm();
    }
    base.perp(&(mid - left)).abs() / base_len
}

/// Angle at `mid` (degrees, `[0, 180]`) between the segments to `left` and `right`.
///
/// A straight line through the three points gives 180. A zero-length segment
/// has no direction and is reported as straight.
pub fn angle_deg(left: Vector2<f64>, mid: Vector2<f64>, right: Vector2<f64>) -> f64 {
    let v1 = left - mid;
    let v2 = right - mid;
    let norms = v1.norm() * v2.norm();
    if norms == 0.0 {
        return 180.0;
    }
    let cos = (v1.dot(&v2) / norms).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}
