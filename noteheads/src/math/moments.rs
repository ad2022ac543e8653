//! First and second order pixel moments accumulated run by run.

use glam::DVec2;

/// Below this row variance a region is treated as a single row.
const MIN_Y_VARIANCE: f64 = 1e-9;

/// Raw moment sums over a set of pixels.
///
/// Accumulates whole horizontal runs in O(1), so a region's centroid and
/// axis line never need a per-pixel pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    n: f64,
    sx: f64,
    sy: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

impl Moments {
    /// Adds the pixels `x_start..x_end` of row `y`.
    pub fn add_run(&mut self, y: i32, x_start: i32, x_end: i32) {
        debug_assert!(x_start < x_end);
        let n = (x_end - x_start) as f64;
        let s = x_start as f64;
        let y = y as f64;
        // sum over i in 0..n of (s + i) and (s + i)^2
        let sum_i = n * (n - 1.0) / 2.0;
        let sum_i2 = (n - 1.0) * n * (2.0 * n - 1.0) / 6.0;
        let sum_x = n * s + sum_i;
        let sum_x2 = n * s * s + 2.0 * s * sum_i + sum_i2;

        self.n += n;
        self.sx += sum_x;
        self.sy += n * y;
        self.sxx += sum_x2;
        self.syy += n * y * y;
        self.sxy += y * sum_x;
    }

    #[inline]
    pub fn count(&self) -> f64 {
        self.n
    }

    /// Mean pixel position. Undefined (NaN) for an empty accumulator.
    pub fn centroid(&self) -> DVec2 {
        DVec2::new(self.sx / self.n, self.sy / self.n)
    }

    /// Slope `dx/dy` of the least-squares line `x = a*y + b` through the pixels.
    ///
    /// Near zero for vertical stacks. Infinite for a single row, where the
    /// line is horizontal and has no finite inverted slope.
    pub fn inverted_slope(&self) -> f64 {
        if self.n == 0.0 {
            return f64::INFINITY;
        }
        let c = self.centroid();
        let var_y = self.syy / self.n - c.y * c.y;
        if var_y < MIN_Y_VARIANCE {
            return f64::INFINITY;
        }
        let cov_xy = self.sxy / self.n - c.x * c.y;
        cov_xy / var_y
    }
}
