use serde::{Deserialize, Serialize};

/// Symbol families a spot can be tagged with.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
pub enum Shape {
    /// Dark spot that may be a beam, a stack of heads, or both.
    BeamSpot,
    /// Beam confirmed by an earlier stage.
    Beam,
    /// Closed spot ready for head validation.
    HeadSpot,
    /// Validated black note head.
    NoteheadBlack,
    Stem,
    Ledger,
}

impl Shape {
    /// Whether a spot of this shape may hide black heads.
    pub fn is_beam_like(&self) -> bool {
        matches!(self, Shape::BeamSpot | Shape::Beam)
    }
}
