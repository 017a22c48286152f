
/// Checks whether two floats are within `tol` of each other.
/// 
#[inline]
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    libm::fabs(a - b) <= tol
}

/// Clamps a value into the [-1, 1] range, useful before feeding a computed cosine/sine into
/// `acos`/`asin` since rounding can push it just outside of the valid domain.
/// 
#[inline]
pub fn clamp_unit(x: f64) -> f64 {
    if x > 1.0 {
        1.0
    } else if x < -1.0 {
        -1.0
    } else {
        x
    }
}
