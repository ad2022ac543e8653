//! Geometry primitives shared by every stage.

mod bbox;
mod moments;

pub use bbox::Aabb;
pub use moments::Moments;

/// Rounds half to even, the way pixel counts and pitch steps are rounded
/// throughout the pipeline.
#[inline]
pub fn rint(value: f64) -> f64 {
    value.round_ties_even()
}

#[inline]
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rint_ties_to_even() {
        assert_eq!(rint(2.5), 2.0);
        assert_eq!(rint(3.5), 4.0);
        assert_eq!(rint(-0.5), 0.0);
        assert_eq!(rint(1.49), 1.0);
    }

    #[test]
    fn clamp01_bounds() {
        assert_eq!(clamp01(-0.2), 0.0);
        assert_eq!(clamp01(0.4), 0.4);
        assert_eq!(clamp01(3.0), 1.0);
    }
}
