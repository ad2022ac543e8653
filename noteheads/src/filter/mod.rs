//! Selection of beam-like spots that may hide black heads.

#[cfg(test)]
mod tests;

use std::fmt;

use crate::config::Parameters;
use crate::error::{Error, Result};
use crate::geometry::StaffLocator;
use crate::registry::SpotRegistry;
use crate::shape::Shape;
use crate::spot::{Spot, SpotId};
use crate::system::SystemId;

/// Why a spot is not a head candidate. Predicates are checked in this order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterRejection {
    NotBeamLike(Shape),
    TooLight { weight: usize },
    TooWide { width: usize },
    InStaffHeader { x_min: i32, dmz_end: i32 },
    GoodBeam { grade: f64 },
    TooThin { mean_width: f64 },
}

impl fmt::Display for FilterRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterRejection::NotBeamLike(shape) => write!(f, "shape {shape}"),
            FilterRejection::TooLight { weight } => write!(f, "too light ({weight} px)"),
            FilterRejection::TooWide { width } => write!(f, "too wide ({width} px)"),
            FilterRejection::InStaffHeader { x_min, dmz_end } => {
                write!(f, "in staff header (x {x_min} < {dmz_end})")
            }
            FilterRejection::GoodBeam { grade } => write!(f, "good beam ({grade:.3})"),
            FilterRejection::TooThin { mean_width } => {
                write!(f, "too thin (mean width {mean_width:.1})")
            }
        }
    }
}

/// Keeps head-or-beam ambiguous material from a system's spot pool.
pub struct CandidateFilter<'a> {
    system: SystemId,
    params: &'a Parameters,
    staves: &'a dyn StaffLocator,
}

impl<'a> CandidateFilter<'a> {
    pub fn new(system: SystemId, params: &'a Parameters, staves: &'a dyn StaffLocator) -> Self {
        Self {
            system,
            params,
            staves,
        }
    }

    /// First failed predicate, or `None` when the spot is a candidate.
    pub fn rejection(&self, spot: &Spot) -> Result<Option<FilterRejection>> {
        let region = spot.region();
        let bbox = region.bbox();

        if !spot.shape().is_beam_like() {
            return Ok(Some(FilterRejection::NotBeamLike(spot.shape())));
        }

        let weight = region.weight();
        if weight < self.params.min_head_weight {
            return Ok(Some(FilterRejection::TooLight { weight }));
        }

        let width = bbox.width();
        if width > self.params.max_spot_width {
            return Ok(Some(FilterRejection::TooWide { width }));
        }

        let staff = self
            .staves
            .staff_at(region.centroid())
            .map_err(|source| Error::Geometry {
                system: self.system,
                spot: spot.id(),
                source,
            })?;
        let dmz_end = staff.dmz_end();
        if bbox.x_min < dmz_end {
            return Ok(Some(FilterRejection::InStaffHeader {
                x_min: bbox.x_min,
                dmz_end,
            }));
        }

        if let Some(grade) = spot.best_beam_grade() {
            if grade >= self.params.good_beam_grade {
                return Ok(Some(FilterRejection::GoodBeam { grade }));
            }
        }

        let mean_width = region.mean_width();
        if mean_width < self.params.min_mean_width {
            return Ok(Some(FilterRejection::TooThin { mean_width }));
        }

        Ok(None)
    }

    /// Candidate spots of `registry`, in registry order.
    pub fn select(&self, registry: &SpotRegistry) -> Result<Vec<SpotId>> {
        let mut selected = Vec::new();
        for spot in registry.iter() {
            match self.rejection(spot)? {
                None => {
                    if spot.is_vip() {
                        log::info!("VIP {} selected as head material", spot.id());
                    }
                    selected.push(spot.id());
                }
                Some(FilterRejection::NotBeamLike(_)) => {}
                Some(reason) => {
                    log::log!(spot.log_level(), "{} discarded: {reason}", spot.id());
                }
            }
        }

        log::debug!(
            "{}: {} beam spots selected out of {}",
            self.system,
            selected.len(),
            registry.len()
        );
        Ok(selected)
    }
}
