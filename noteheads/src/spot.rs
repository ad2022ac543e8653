//! Registered spots: regions with an identity, a shape and interpretations.

use common::index_type;

use crate::region::Region;
use crate::shape::Shape;

index_type!(SpotId);

/// Recognition result already attached to a spot by an earlier stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interpretation {
    /// Full beam candidate with its grade in [0, 1].
    FullBeam { grade: f64 },
    /// Black head candidate with its composite grade in [0, 1].
    BlackHead { grade: f64 },
}

/// A region registered in a system's spot registry.
#[derive(Debug, Clone)]
pub struct Spot {
    id: SpotId,
    region: Region,
    shape: Shape,
    vip: bool,
    interpretations: Vec<Interpretation>,
}

impl Spot {
    pub(crate) fn new(id: SpotId, region: Region, shape: Shape) -> Self {
        Self {
            id,
            region,
            shape,
            vip: false,
            interpretations: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> SpotId {
        self.id
    }

    #[inline]
    pub fn region(&self) -> &Region {
        &self.region
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    /// Spots flagged for detailed tracing.
    #[inline]
    pub fn is_vip(&self) -> bool {
        self.vip
    }

    pub fn set_vip(&mut self, vip: bool) {
        self.vip = vip;
    }

    /// Level of per-spot diagnostics, raised to info for VIP spots.
    #[inline]
    pub fn log_level(&self) -> log::Level {
        if self.vip {
            log::Level::Info
        } else {
            log::Level::Debug
        }
    }

    #[inline]
    pub fn interpretations(&self) -> &[Interpretation] {
        &self.interpretations
    }

    pub fn add_interpretation(&mut self, interpretation: Interpretation) {
        self.interpretations.push(interpretation);
    }

    /// Grade of the best full beam interpretation, if any.
    pub fn best_beam_grade(&self) -> Option<f64> {
        self.interpretations
            .iter()
            .filter_map(|inter| match inter {
                Interpretation::FullBeam { grade } => Some(*grade),
                Interpretation::BlackHead { .. } => None,
            })
            .reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeling::{DomainKind, Run};

    fn spot() -> Spot {
        let region = Region::new(
            DomainKind::Spot,
            Vec::new(),
            vec![Run {
                y: 0,
                x_start: 0,
                x_end: 4,
            }],
        );
        Spot::new(SpotId::new(3), region, Shape::BeamSpot)
    }

    #[test]
    fn best_beam_grade_ignores_heads() {
        let mut spot = spot();
        assert_eq!(spot.best_beam_grade(), None);

        spot.add_interpretation(Interpretation::BlackHead { grade: 0.9 });
        spot.add_interpretation(Interpretation::FullBeam { grade: 0.3 });
        spot.add_interpretation(Interpretation::FullBeam { grade: 0.6 });
        assert_eq!(spot.best_beam_grade(), Some(0.6));
    }

    #[test]
    fn shape_and_vip_are_mutable() {
        let mut spot = spot();
        assert!(!spot.is_vip());
        spot.set_vip(true);
        spot.set_shape(Shape::HeadSpot);
        assert!(spot.is_vip());
        assert_eq!(spot.shape(), Shape::HeadSpot);
        assert_eq!(spot.id().to_string(), "SpotId#3");
    }

    #[test]
    fn vip_diagnostics_are_logged_at_info() {
        let mut spot = spot();
        assert_eq!(spot.log_level(), log::Level::Debug);
        spot.set_vip(true);
        assert_eq!(spot.log_level(), log::Level::Info);
    }
}
