//! Connected pixel regions in absolute sheet coordinates.

use std::hash::Hasher;

use common::FnvHasher;
use glam::DVec2;

use crate::labeling::{DomainKind, Run, SectionId};
use crate::math::{Aabb, Moments};
use crate::raster::Raster;

/// An extracted connected component: its runs, the sections that own them,
/// and the measures derived from them.
///
/// Runs are kept sorted by row then column, so two regions with the same
/// pixels compare equal run by run.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    domain: DomainKind,
    sections: Vec<SectionId>,
    runs: Vec<Run>,
    weight: usize,
    bbox: Aabb,
    moments: Moments,
}

impl Region {
    pub(crate) fn new(domain: DomainKind, sections: Vec<SectionId>, mut runs: Vec<Run>) -> Self {
        assert!(!runs.is_empty(), "region without runs");
        runs.sort_unstable();

        let mut bbox = Aabb::empty();
        let mut moments = Moments::default();
        let mut weight = 0;
        for run in &runs {
            bbox.include_span(run.y, run.x_start, run.x_end);
            moments.add_run(run.y, run.x_start, run.x_end);
            weight += run.len();
        }

        Self {
            domain,
            sections,
            runs,
            weight,
            bbox,
            moments,
        }
    }

    #[inline]
    pub fn domain(&self) -> DomainKind {
        self.domain
    }

    #[inline]
    pub fn sections(&self) -> &[SectionId] {
        &self.sections
    }

    #[inline]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Pixel count.
    #[inline]
    pub fn weight(&self) -> usize {
        self.weight
    }

    #[inline]
    pub fn bbox(&self) -> Aabb {
        self.bbox
    }

    #[inline]
    pub fn centroid(&self) -> DVec2 {
        self.moments.centroid()
    }

    /// Inverted slope (dx/dy) of the least-squares axis through all pixels.
    #[inline]
    pub fn inverted_slope(&self) -> f64 {
        self.moments.inverted_slope()
    }

    /// Weight divided by bounding-box height.
    pub fn mean_width(&self) -> f64 {
        self.weight as f64 / self.bbox.height() as f64
    }

    /// Hash of the absolute run list. Equal pixel sets hash equal.
    pub fn footprint_key(&self) -> u64 {
        let mut hasher = FnvHasher::default();
        for run in &self.runs {
            hasher.write_i32(run.y);
            hasher.write_i32(run.x_start);
            hasher.write_i32(run.x_end);
        }
        hasher.finish()
    }

    /// Whether both regions cover exactly the same pixels.
    pub fn same_footprint(&self, other: &Region) -> bool {
        self.weight == other.weight && self.runs == other.runs
    }

    /// Renders the region into a fresh raster covering its bounding box.
    pub fn to_raster(&self) -> Raster {
        let mut raster = Raster::covering(&self.bbox);
        let origin = self.bbox.origin();
        for run in &self.runs {
            raster.fill_span(
                (run.y - origin.y) as usize,
                (run.x_start - origin.x) as usize,
                (run.x_end - origin.x) as usize,
                true,
            );
        }
        raster
    }
}
