//! Per-system spot registry: an arena of spots indexed by footprint.

#[cfg(test)]
mod tests;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::config::Connectivity;
use crate::labeling::{assert_exclusive_ownership, extract_regions, DomainKind, SectionDomain};
use crate::raster::Raster;
use crate::region::Region;
use crate::shape::Shape;
use crate::spot::{Spot, SpotId};

/// Outcome of registering one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub id: SpotId,
    /// The region matched the footprint of an already registered spot.
    pub reused: bool,
}

/// All spots of one system, plus the section domains they were extracted into.
///
/// Spots are never removed; ids index the arena directly. Two spots never
/// share the same footprint: registering a region whose pixels match an
/// existing spot returns that spot instead.
#[derive(Debug)]
pub struct SpotRegistry {
    spots: Vec<Spot>,
    by_footprint: HashMap<u64, SmallVec<[SpotId; 2]>>,
    domains: [SectionDomain; 3],
}

impl Default for SpotRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SpotRegistry {
    pub fn new() -> Self {
        Self {
            spots: Vec::new(),
            by_footprint: HashMap::new(),
            domains: [
                SectionDomain::new(DomainKind::Spot),
                SectionDomain::new(DomainKind::Head),
                SectionDomain::new(DomainKind::Split),
            ],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    #[inline]
    pub fn get(&self, id: SpotId) -> &Spot {
        &self.spots[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: SpotId) -> &mut Spot {
        &mut self.spots[id.index()]
    }

    /// Spots in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Spot> {
        self.spots.iter()
    }

    pub fn domain(&self, kind: DomainKind) -> &SectionDomain {
        &self.domains[domain_slot(kind)]
    }

    pub fn domain_mut(&mut self, kind: DomainKind) -> &mut SectionDomain {
        &mut self.domains[domain_slot(kind)]
    }

    /// Spot covering exactly the pixels of `region`, if any.
    pub fn find_footprint(&self, region: &Region) -> Option<SpotId> {
        self.by_footprint
            .get(&region.footprint_key())?
            .iter()
            .copied()
            .find(|&id| self.spots[id.index()].region().same_footprint(region))
    }

    /// Registers `region` with `shape`, or returns the spot that already has
    /// its footprint. On reuse the region's own sections are invalidated.
    ///
    /// # Panics
    /// Panics on a scratch region: its sections belong to no registry domain.
    pub fn register(&mut self, region: Region, shape: Shape) -> Registration {
        assert_ne!(
            region.domain(),
            DomainKind::Scratch,
            "scratch sections are never registered"
        );
        if let Some(id) = self.find_footprint(&region) {
            self.domain_mut(region.domain()).invalidate(region.sections());
            return Registration { id, reused: true };
        }

        let id = SpotId::from_index(self.spots.len());
        self.by_footprint
            .entry(region.footprint_key())
            .or_default()
            .push(id);
        self.spots.push(Spot::new(id, region, shape));
        Registration { id, reused: false }
    }

    /// Extracts every region of `raster` into the `kind` domain and registers
    /// each with `shape`, as one batch.
    pub fn register_raster(
        &mut self,
        raster: &Raster,
        kind: DomainKind,
        shape: Shape,
        connectivity: Connectivity,
    ) -> Vec<Registration> {
        let regions = extract_regions(raster, self.domain_mut(kind), connectivity);
        assert_exclusive_ownership(&regions);
        regions
            .into_iter()
            .map(|region| self.register(region, shape))
            .collect()
    }
}

fn domain_slot(kind: DomainKind) -> usize {
    match kind {
        DomainKind::Spot => 0,
        DomainKind::Head => 1,
        DomainKind::Split => 2,
        DomainKind::Scratch => panic!("scratch sections are never registered"),
    }
}
