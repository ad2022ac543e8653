//! Head reconstruction: closing beam spots into solid head-like spots.


use hashbrown::HashSet;
use parking_lot::Mutex;

use crate::config::Connectivity;
use crate::labeling::DomainKind;
use crate::raster::{close, Raster, StructuringElement};
use crate::registry::SpotRegistry;
use crate::shape::Shape;
use crate::spot::{Spot, SpotId};

pub struct HeadReconstructor<'a> {
    element: &'a StructuringElement,
    connectivity: Connectivity,
}

impl<'a> HeadReconstructor<'a> {
    pub fn new(element: &'a StructuringElement, connectivity: Connectivity) -> Self {
        Self {
            element,
            connectivity,
        }
    }

    /// Closed rendering of `spot`, padded by the element reach.
    pub fn close_spot(&self, spot: &Spot) -> Raster {
        close(&spot.region().to_raster(), self.element)
    }

    /// Closes every spot of `beam_spots` and registers the resulting regions
    /// as head spots. Each head spot is listed once, in first-seen order.
    pub fn reconstruct(&self, spots: &Mutex<SpotRegistry>, beam_spots: &[SpotId]) -> Vec<SpotId> {
        let mut seen = HashSet::new();
        let mut heads = Vec::new();

        for &id in beam_spots {
            let (closed, vip) = {
                let registry = spots.lock();
                let spot = registry.get(id);
                if spot.is_vip() {
                    log::info!("VIP head reconstruction of {id}");
                }
                (self.close_spot(spot), spot.is_vip())
            };

            let mut registry = spots.lock();
            let registrations = registry.register_raster(
                &closed,
                DomainKind::Head,
                Shape::HeadSpot,
                self.connectivity,
            );
            for registration in registrations {
                let head = registry.get_mut(registration.id);
                head.set_shape(Shape::HeadSpot);
                if vip {
                    head.set_vip(true);
                }
                if seen.insert(registration.id) {
                    heads.push(registration.id);
                }
            }
        }

        log::debug!(
            "{} head spots out of {} beam spots, radius {}",
            heads.len(),
            beam_spots.len(),
            self.element.radius()
        );
        heads
    }
}
