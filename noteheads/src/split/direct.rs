//! Slicing upright spots into equal horizontal bands.

use crate::config::Parameters;
use crate::math::rint;
use crate::region::Region;

use super::{Cut, SplitMethod, SplitPlan};

/// What the direct split looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitGeometry {
    pub weight: usize,
    pub height: usize,
    /// dx/dy of the spot axis.
    pub inverted_slope: f64,
}

impl SplitGeometry {
    pub fn of(region: &Region) -> Self {
        Self {
            weight: region.weight(),
            height: region.bbox().height(),
            inverted_slope: region.inverted_slope(),
        }
    }
}

/// Plans `n - 1` row cuts at `rint(i * height / n)`, where `n` averages the
/// head count suggested by the weight and the one suggested by the height.
///
/// `None` when the spot axis leans more than the direct split allows.
pub fn plan_direct_split(geometry: &SplitGeometry, params: &Parameters) -> Option<SplitPlan> {
    if geometry.inverted_slope.abs() > params.max_slope_for_direct_split {
        return None;
    }

    let weight_count = geometry.weight as f64 / params.typical_head_weight as f64;
    let height_count = geometry.height as f64 / params.interline as f64;
    let heads = (rint((weight_count + height_count) / 2.0) as usize).max(2);
    let band = geometry.height as f64 / heads as f64;

    log::debug!(
        "direct split slope:{:.2} weight:{:.2} height:{:.2} heads:{}",
        geometry.inverted_slope,
        weight_count,
        height_count,
        heads
    );

    let mut cuts: Vec<Cut> = Vec::with_capacity(heads - 1);
    for i in 1..heads {
        let y = rint(i as f64 * band) as u32;
        let cut = Cut::Row(y);
        if (y as usize) < geometry.height && cuts.last() != Some(&cut) {
            cuts.push(cut);
        }
    }

    Some(SplitPlan {
        method: SplitMethod::Direct { heads },
        cuts,
    })
}
