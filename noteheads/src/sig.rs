//! Head candidates and the recognition graph they are emitted into.

use std::fmt;

use crate::config::GradeFusion;
use crate::math::Aabb;
use crate::spot::SpotId;

/// Partial grades behind a head candidate, both in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impacts {
    pub shape: f64,
    pub pitch: f64,
}

impl Impacts {
    pub fn grade(&self, fusion: &GradeFusion) -> f64 {
        fusion.fuse(self.shape, self.pitch)
    }
}

impl fmt::Display for Impacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape:{:.3} pitch:{:.3}", self.shape, self.pitch)
    }
}

/// An accepted black head.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadCandidate {
    pub spot: SpotId,
    pub impacts: Impacts,
    pub grade: f64,
    /// Rounded pitch position.
    pub pitch: i32,
    /// Head template box centred on the spot centroid.
    pub bounds: Aabb,
}

/// Receiver of accepted heads.
pub trait InterSink {
    fn add_vertex(&mut self, head: HeadCandidate);
}

/// Interpretations gathered for one system.
#[derive(Debug, Default)]
pub struct Sig {
    heads: Vec<HeadCandidate>,
}

impl Sig {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn heads(&self) -> &[HeadCandidate] {
        &self.heads
    }

    pub fn head_of(&self, spot: SpotId) -> Option<&HeadCandidate> {
        self.heads.iter().find(|h| h.spot == spot)
    }
}

impl InterSink for Sig {
    fn add_vertex(&mut self, head: HeadCandidate) {
        self.heads.push(head);
    }
}
