//! Registration of split fragments into the split section domain.
//!
//! Fragments come out of scratch extractions, one per recursion branch.
//! They are painted back into a single raster covering all of them and
//! extracted once more, so that the registered spots own real sections and
//! no two of them share one.


use hashbrown::HashSet;
use parking_lot::Mutex;

use crate::config::Connectivity;
use crate::labeling::DomainKind;
use crate::math::Aabb;
use crate::raster::Raster;
use crate::region::Region;
use crate::registry::SpotRegistry;
use crate::shape::Shape;
use crate::spot::SpotId;

/// Raster covering every fragment, with every fragment painted in.
pub fn composite(fragments: &[Region]) -> Raster {
    let bounds = fragments
        .iter()
        .fold(Aabb::empty(), |acc, f| acc.union(&f.bbox()));
    let mut canvas = Raster::covering(&bounds);
    for fragment in fragments {
        canvas.inject(&fragment.to_raster());
    }
    canvas
}

pub struct RegionMerger {
    connectivity: Connectivity,
}

impl RegionMerger {
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }

    /// Registers `fragments` as head spots and returns their ids, each once.
    ///
    /// Fragments matching an existing spot reuse it. `vip` is carried over to
    /// every resulting spot.
    pub fn merge(
        &self,
        spots: &Mutex<SpotRegistry>,
        fragments: &[Region],
        vip: bool,
    ) -> Vec<SpotId> {
        if fragments.is_empty() {
            return Vec::new();
        }

        let canvas = composite(fragments);

        let mut registry = spots.lock();
        let registrations =
            registry.register_raster(&canvas, DomainKind::Split, Shape::HeadSpot, self.connectivity);

        let mut seen = HashSet::new();
        let mut ids = Vec::with_capacity(registrations.len());
        for registration in registrations {
            let spot = registry.get_mut(registration.id);
            spot.set_shape(Shape::HeadSpot);
            if vip {
                spot.set_vip(true);
                log::info!(
                    "VIP fragment {} at {:?}{}",
                    registration.id,
                    spot.region().bbox(),
                    if registration.reused { " (reused)" } else { "" }
                );
            }
            if seen.insert(registration.id) {
                ids.push(registration.id);
            }
        }

        if ids.len() != fragments.len() {
            log::debug!(
                "{} fragments regenerated as {} spots",
                fragments.len(),
                ids.len()
            );
        }
        ids
    }
}
