use crate::raster::{distance_to_background, Raster, Watershed};

use super::{Cut, SplitMethod, SplitPlan};

/// Coarsest flooding step tried. Steps go down from here to 1.
pub const MAX_WATERSHED_STEP: u16 = 10;

/// Cuts along the watershed boundaries of the first step, coarsest first,
/// that yields more than one basin.
pub fn plan_watershed_split(raster: &Raster) -> Option<SplitPlan> {
    let dist = distance_to_background(raster);
    let watershed = Watershed::new(&dist);

    for step in (1..=MAX_WATERSHED_STEP).rev() {
        let partition = watershed.process(step);
        if partition.region_count > 1 {
            log::debug!(
                "watershed step {} gives {} regions",
                step,
                partition.region_count
            );
            return Some(SplitPlan {
                method: SplitMethod::Watershed { step },
                cuts: vec![Cut::Pixels(partition.boundaries)],
            });
        }
    }

    None
}
