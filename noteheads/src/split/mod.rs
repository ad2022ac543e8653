//! Recursive splitting of spots heavier than one head.
//!
//! A split is planned as a list of [`Cut`]s and applied to a copy of the
//! spot raster; the connected parts of the cut raster are the pieces. Parts
//! still heavier than about two heads are split again. Every piece is a
//! scratch [`Region`] until [`crate::merge::RegionMerger`] registers it.

mod direct;
mod watershed;


pub use direct::{plan_direct_split, SplitGeometry};
pub use watershed::{plan_watershed_split, MAX_WATERSHED_STEP};

use std::fmt;

use glam::UVec2;

use crate::config::Parameters;
use crate::labeling::{extract_regions, SectionDomain};
use crate::raster::Raster;
use crate::region::Region;

/// Pixels to turn into background, in raster-local coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cut {
    /// A whole row.
    Row(u32),
    /// Individual pixels, e.g. a watershed boundary.
    Pixels(Vec<UVec2>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMethod {
    /// Horizontal slicing into `heads` bands.
    Direct { heads: usize },
    /// Watershed boundaries found at flooding `step`.
    Watershed { step: u16 },
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitMethod::Direct { heads } => write!(f, "direct split ({heads} heads)"),
            SplitMethod::Watershed { step } => write!(f, "watershed split (step {step})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub method: SplitMethod,
    pub cuts: Vec<Cut>,
}

/// Applies `cuts` to a copy of `raster`.
pub fn apply_cuts(raster: &Raster, cuts: &[Cut]) -> Raster {
    let mut out = raster.clone();
    for cut in cuts {
        match cut {
            Cut::Row(y) => {
                let y = *y as usize;
                if y < out.height() {
                    out.clear_row(y);
                }
            }
            Cut::Pixels(pixels) => {
                for p in pixels {
                    out.set(p.x as usize, p.y as usize, false);
                }
            }
        }
    }
    out
}

/// One level of splitting: the plan and the parts it produced.
#[derive(Debug, Clone)]
pub struct SplitLevel {
    pub plan: SplitPlan,
    pub parts: Vec<Region>,
    /// Foreground pixels cleared by the cuts.
    pub carved: usize,
}

#[derive(Debug, Clone)]
pub enum SplitOutcome {
    /// No plan separated the spot. It stays whole.
    Irreducible,
    /// Terminal pieces of the recursion, plus the pixels lost to cuts.
    Split { fragments: Vec<Region>, carved: usize },
}

pub struct SpotSplitter<'a> {
    params: &'a Parameters,
}

impl<'a> SpotSplitter<'a> {
    pub fn new(params: &'a Parameters) -> Self {
        Self { params }
    }

    /// Whether `region` weighs about two heads or more.
    pub fn needs_split(&self, region: &Region) -> bool {
        self.params.estimated_head_count(region.weight()) >= 2
    }

    /// Direct split for upright spots, watershed otherwise.
    pub fn plan(&self, region: &Region, raster: &Raster) -> Option<SplitPlan> {
        let geometry = SplitGeometry::of(region);
        plan_direct_split(&geometry, self.params).or_else(|| plan_watershed_split(raster))
    }

    /// Splits `region` once, without recursion.
    ///
    /// `None` when no plan exists or when the cuts leave fewer than two parts.
    pub fn split_once(&self, region: &Region) -> Option<SplitLevel> {
        let raster = region.to_raster();
        let plan = self.plan(region, &raster)?;
        let cut = apply_cuts(&raster, &plan.cuts);

        let mut scratch = SectionDomain::scratch();
        let parts = extract_regions(&cut, &mut scratch, self.params.connectivity);
        if parts.len() < 2 {
            log::trace!(
                "{} split of {:?} left {} part(s)",
                plan.method,
                region.bbox(),
                parts.len()
            );
            return None;
        }

        let carved = raster.weight() - cut.weight();
        Some(SplitLevel {
            plan,
            parts,
            carved,
        })
    }

    /// Splits `region` recursively until every piece weighs less than about
    /// two heads or cannot be separated further.
    pub fn split(&self, region: &Region, vip: bool) -> SplitOutcome {
        let Some(level) = self.split_once(region) else {
            if vip {
                log::info!("VIP spot at {:?} could not be split", region.bbox());
            }
            return SplitOutcome::Irreducible;
        };
        if vip {
            log::info!(
                "VIP spot at {:?} {} into {} parts",
                region.bbox(),
                level.plan.method,
                level.parts.len()
            );
        }

        let mut fragments = Vec::new();
        let mut carved = level.carved;
        for part in level.parts {
            self.split_part(part, vip, &mut fragments, &mut carved);
        }

        SplitOutcome::Split { fragments, carved }
    }

    fn split_part(&self, part: Region, vip: bool, fragments: &mut Vec<Region>, carved: &mut usize) {
        if !self.needs_split(&part) {
            fragments.push(part);
            return;
        }
        match self.split_once(&part) {
            Some(level) => {
                if vip {
                    log::info!(
                        "VIP part at {:?} {} into {} parts",
                        part.bbox(),
                        level.plan.method,
                        level.parts.len()
                    );
                }
                *carved += level.carved;
                for sub in level.parts {
                    self.split_part(sub, vip, fragments, carved);
                }
            }
            None => fragments.push(part),
        }
    }
}
