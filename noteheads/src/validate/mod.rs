//! Grading of single-head spots.
//!
//! A spot becomes a head when it is heavy enough, sits on a line or space of
//! its staff (or close to a ledger when outside the staff), and looks like a
//! black head to the shape classifier.


use std::fmt;

use crate::classifier::ShapeClassifier;
use crate::config::Parameters;
use crate::error::{Error, Result};
use crate::geometry::{ledger_pitch_position, StaffLocator};
use crate::math::{clamp01, rint};
use crate::shape::Shape;
use crate::sig::{HeadCandidate, Impacts};
use crate::spot::Spot;
use crate::system::SystemId;

/// Largest distance, in pitch steps, between a head outside the staff and
/// the ledger supporting it.
pub const MAX_LEDGER_PITCH_DISTANCE: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadRejection {
    TooLight { weight: usize },
    /// Outside the staff without a ledger close enough.
    NoLedger { pitch_position: f64 },
    TooWeak { impacts: Impacts, grade: f64 },
}

impl fmt::Display for HeadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadRejection::TooLight { weight } => write!(f, "too light ({weight} px)"),
            HeadRejection::NoLedger { pitch_position } => {
                write!(f, "too far from staff w/o ledger (pitch {pitch_position:.2})")
            }
            HeadRejection::TooWeak { impacts, grade } => {
                write!(f, "too weak {grade:.3} ({impacts})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted(HeadCandidate),
    Rejected(HeadRejection),
}

pub struct HeadValidator<'a> {
    system: SystemId,
    params: &'a Parameters,
    classifier: &'a dyn ShapeClassifier,
    staves: &'a dyn StaffLocator,
}

impl<'a> HeadValidator<'a> {
    pub fn new(
        system: SystemId,
        params: &'a Parameters,
        classifier: &'a dyn ShapeClassifier,
        staves: &'a dyn StaffLocator,
    ) -> Self {
        Self {
            system,
            params,
            classifier,
            staves,
        }
    }

    /// Grades `spot` as a black head. Does not touch the spot or the graph.
    pub fn check(&self, spot: &Spot) -> Result<Verdict> {
        let region = spot.region();
        let level = spot.log_level();

        let weight = region.weight();
        if weight < self.params.min_head_weight {
            return Ok(Verdict::Rejected(HeadRejection::TooLight { weight }));
        }

        let evaluation = self
            .classifier
            .evaluate(spot, Shape::NoteheadBlack)
            .map_err(|source| Error::Classifier {
                system: self.system,
                spot: spot.id(),
                source,
            })?;
        let shape_impact = clamp01(evaluation / 100.0);

        let centroid = region.centroid();
        let staff = self
            .staves
            .staff_at(centroid)
            .map_err(|source| Error::Geometry {
                system: self.system,
                spot: spot.id(),
                source,
            })?;
        let position = staff.note_position(centroid);
        let pitch_position = position.pitch_position;

        if pitch_position.abs() >= 0.5 + staff.line_count() as f64 {
            let supported = position.ledger.is_some_and(|ledger| {
                (pitch_position - ledger_pitch_position(ledger.index)).abs()
                    <= MAX_LEDGER_PITCH_DISTANCE
            });
            if !supported {
                return Ok(Verdict::Rejected(HeadRejection::NoLedger { pitch_position }));
            }
        }

        let pitch = rint(pitch_position);
        let pitch_offset = (pitch_position - pitch).abs();
        let impacts = Impacts {
            shape: shape_impact,
            pitch: clamp01(1.0 - pitch_offset / self.params.max_pitch_offset),
        };
        let grade = impacts.grade(&self.params.grade_fusion);

        log::log!(
            level,
            "{} pitch:{:5.2} offset:{:.2} {} grade:{:.3}",
            spot.id(),
            pitch_position,
            pitch_offset,
            impacts,
            grade
        );

        if grade < self.params.min_grade {
            return Ok(Verdict::Rejected(HeadRejection::TooWeak { impacts, grade }));
        }

        Ok(Verdict::Accepted(HeadCandidate {
            spot: spot.id(),
            impacts,
            grade,
            pitch: pitch as i32,
            bounds: self.params.template.bounds_at(centroid),
        }))
    }
}
