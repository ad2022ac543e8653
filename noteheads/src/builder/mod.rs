//! Per-system driver of the black head pipeline.
//!
//! Stages run in order, each one committing its spots before the next:
//! candidate selection, head reconstruction, splitting of large spots, and
//! head validation.


use std::time::Duration;

use common::StopWatch;
use hashbrown::HashSet;
use rayon::prelude::*;

use crate::classifier::ShapeClassifier;
use crate::config::{Config, Parameters, Scale};
use crate::error::Result;
use crate::filter::CandidateFilter;
use crate::geometry::StaffLocator;
use crate::merge::RegionMerger;
use crate::raster::StructuringElement;
use crate::reconstruct::HeadReconstructor;
use crate::shape::Shape;
use crate::sig::InterSink;
use crate::split::{SplitOutcome, SpotSplitter};
use crate::spot::{Interpretation, SpotId};
use crate::system::{SystemId, SystemInfo};
use crate::validate::{HeadRejection, HeadValidator, Verdict};

/// External services a system run relies on.
#[derive(Clone, Copy)]
pub struct HeadsContext<'a> {
    pub classifier: &'a dyn ShapeClassifier,
    pub staves: &'a dyn StaffLocator,
}

/// What happened to one system.
#[derive(Debug, Clone, Default)]
pub struct HeadsReport {
    pub system: SystemId,
    /// Spots kept by the candidate filter.
    pub beam_spots: usize,
    /// Spots after closing.
    pub head_spots: usize,
    /// Head spots replaced by their fragments.
    pub split_spots: usize,
    /// Head spots too heavy for one head that no plan could separate.
    pub irreducible_spots: usize,
    /// Single-head candidates handed to validation.
    pub candidates: usize,
    /// Accepted heads, in validation order.
    pub heads: Vec<SpotId>,
    pub rejections: Vec<(SpotId, HeadRejection)>,
    /// Mean weight of accepted heads, in interline² fractions.
    pub mean_head_weight: Option<f64>,
    pub timings: Vec<(String, Duration)>,
}

pub struct BlackHeadsBuilder {
    config: Config,
    scale: Scale,
    params: Parameters,
    element: StructuringElement,
}

impl BlackHeadsBuilder {
    /// # Panics
    /// Panics if `config` does not validate.
    pub fn new(config: Config, scale: Scale) -> Self {
        let params = Parameters::new(&config, &scale);
        let element = StructuringElement::for_diameter(params.head_diameter);
        if config.print_parameters {
            log::info!("black heads parameters: {params:#?}");
        }
        Self {
            config,
            scale,
            params,
            element,
        }
    }

    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    #[inline]
    pub fn element(&self) -> &StructuringElement {
        &self.element
    }

    /// Finds black heads among the spots of `system` and adds them to its sig.
    pub fn build_black_heads(
        &self,
        system: &SystemInfo,
        ctx: &HeadsContext<'_>,
    ) -> Result<HeadsReport> {
        let id = system.id();
        let mut report = HeadsReport {
            system: id,
            ..HeadsReport::default()
        };
        let mut watch = StopWatch::new(format!("BlackHeadsBuilder {id}"));

        watch.start("select beam spots");
        let beam_spots = {
            let registry = system.spots().lock();
            CandidateFilter::new(id, &self.params, ctx.staves).select(&registry)?
        };
        report.beam_spots = beam_spots.len();
        log::debug!("{id} beam spots: {}", beam_spots.len());

        watch.start("reconstruct heads");
        let head_spots = HeadReconstructor::new(&self.element, self.params.connectivity)
            .reconstruct(system.spots(), &beam_spots);
        report.head_spots = head_spots.len();
        log::debug!("{id} head spots: {}", head_spots.len());

        watch.start("split large spots");
        let candidates = self.split_large_spots(system, &head_spots, &mut report);
        report.candidates = candidates.len();

        watch.start("check heads");
        self.check_heads(system, ctx, &candidates, &mut report)?;
        log::debug!("{id} heads: {}", report.heads.len());

        watch.stop();
        if self.config.print_watch {
            watch.print();
        }
        report.timings = watch.tasks().to_vec();
        Ok(report)
    }

    /// Runs every system of a sheet in parallel, one result per system.
    ///
    /// `contexts[i]` serves `systems[i]`.
    pub fn build_sheet(
        &self,
        systems: &[SystemInfo],
        contexts: &[HeadsContext<'_>],
    ) -> Vec<Result<HeadsReport>> {
        assert_eq!(
            systems.len(),
            contexts.len(),
            "one heads context per system"
        );
        systems
            .par_iter()
            .zip(contexts.par_iter())
            .map(|(system, ctx)| {
                let result = self.build_black_heads(system, ctx);
                if let Err(err) = &result {
                    log::warn!("{err}");
                }
                result
            })
            .collect()
    }

    /// Replaces head spots heavier than one head by their fragments.
    fn split_large_spots(
        &self,
        system: &SystemInfo,
        head_spots: &[SpotId],
        report: &mut HeadsReport,
    ) -> Vec<SpotId> {
        let splitter = SpotSplitter::new(&self.params);
        let merger = RegionMerger::new(self.params.connectivity);
        let mut seen = HashSet::new();
        let mut candidates = Vec::with_capacity(head_spots.len());

        for &id in head_spots {
            let (region, vip) = {
                let registry = system.spots().lock();
                let spot = registry.get(id);
                (spot.region().clone(), spot.is_vip())
            };

            if !splitter.needs_split(&region) {
                if seen.insert(id) {
                    candidates.push(id);
                }
                continue;
            }

            match splitter.split(&region, vip) {
                SplitOutcome::Irreducible => {
                    log::debug!("could not split {id}");
                    report.irreducible_spots += 1;
                    if seen.insert(id) {
                        candidates.push(id);
                    }
                }
                SplitOutcome::Split { fragments, carved } => {
                    log::debug!(
                        "{id} split into {} fragments, {carved} px carved",
                        fragments.len()
                    );
                    report.split_spots += 1;
                    for part in merger.merge(system.spots(), &fragments, vip) {
                        if seen.insert(part) {
                            candidates.push(part);
                        }
                    }
                }
            }
        }

        candidates
    }

    /// Validates single-head candidates; accepted ones go to the sig.
    fn check_heads(
        &self,
        system: &SystemInfo,
        ctx: &HeadsContext<'_>,
        candidates: &[SpotId],
        report: &mut HeadsReport,
    ) -> Result<()> {
        let validator = HeadValidator::new(system.id(), &self.params, ctx.classifier, ctx.staves);
        let mut total_weight = 0usize;

        for &id in candidates {
            let mut registry = system.spots().lock();
            let verdict = validator.check(registry.get(id))?;
            let spot = registry.get_mut(id);

            match verdict {
                Verdict::Accepted(head) => {
                    if spot.is_vip() {
                        log::info!("VIP {id} accepted as head, grade {:.3}", head.grade);
                    }
                    spot.set_shape(Shape::NoteheadBlack);
                    spot.add_interpretation(Interpretation::BlackHead { grade: head.grade });
                    total_weight += spot.region().weight();
                    drop(registry);

                    system.sig().lock().add_vertex(head);
                    report.heads.push(id);
                }
                Verdict::Rejected(reason) => {
                    if spot.is_vip() {
                        log::info!("VIP {id} rejected: {reason}");
                    } else {
                        log::trace!("{id} rejected: {reason}");
                    }
                    report.rejections.push((id, reason));
                }
            }
        }

        if !report.heads.is_empty() {
            let mean = self
                .scale
                .pixels_to_area_frac(total_weight as f64 / report.heads.len() as f64);
            log::debug!("{} mean head weight: {mean:.2}", system.id());
            report.mean_head_weight = Some(mean);
        }
        Ok(())
    }
}
