//! Region extraction: raster rows → runs → sections → connected regions.
//!
//! Runs are scanned row by row with word-level bit scanning. A run continues
//! the section of the run above it only when the junction between the two
//! rows is one-to-one; every branch, merge or isolated run starts a new
//! section. Sections touching each other are linked with union-find, and each
//! resulting set becomes one [`Region`] in absolute coordinates.


use common::index_type;
use hashbrown::HashSet;

use crate::config::Connectivity;
use crate::math::Aabb;
use crate::raster::{Raster, Span};
use crate::region::Region;

index_type!(SectionId);

// ============================================================================
// Runs and sections
// ============================================================================

/// Horizontal run of foreground pixels in absolute coordinates, `[x_start, x_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Run {
    pub y: i32,
    pub x_start: i32,
    pub x_end: i32,
}

impl Run {
    #[inline]
    pub fn len(&self) -> usize {
        (self.x_end - self.x_start) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x_end <= self.x_start
    }
}

/// Vertical stack of runs with one-to-one junctions.
#[derive(Debug, Clone)]
pub struct Section {
    runs: Vec<Run>,
    alive: bool,
}

impl Section {
    #[inline]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn weight(&self) -> usize {
        self.runs.iter().map(Run::len).sum()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

/// The section domains of one system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum DomainKind {
    /// Sections of the initial spot pool.
    Spot,
    /// Sections of reconstructed head spots.
    Head,
    /// Sections of merged split fragments.
    Split,
    /// Throw-away sections of split attempts.
    Scratch,
}

/// Store of sections produced by extractions into one domain.
///
/// Sections are never removed, only invalidated, so ids stay stable.
#[derive(Debug, Clone)]
pub struct SectionDomain {
    kind: DomainKind,
    sections: Vec<Section>,
}

impl SectionDomain {
    pub fn new(kind: DomainKind) -> Self {
        Self {
            kind,
            sections: Vec::new(),
        }
    }

    /// Domain for ephemeral extractions whose sections are dropped afterwards.
    pub fn scratch() -> Self {
        Self::new(DomainKind::Scratch)
    }

    #[inline]
    pub fn kind(&self) -> DomainKind {
        self.kind
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[inline]
    pub fn section(&self, id: SectionId) -> &Section {
        &self.sections[id.index()]
    }

    fn add(&mut self, runs: Vec<Run>) -> SectionId {
        let id = SectionId::from_index(self.sections.len());
        self.sections.push(Section { runs, alive: true });
        id
    }

    /// Marks sections as dead. They keep their id but own nothing anymore.
    pub fn invalidate(&mut self, ids: &[SectionId]) {
        for id in ids {
            self.sections[id.index()].alive = false;
        }
    }

    pub fn alive_count(&self) -> usize {
        self.sections.iter().filter(|s| s.alive).count()
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// A run of the previous row together with the section it ended in.
#[derive(Debug, Clone, Copy)]
struct OpenRun {
    start: u32,
    end: u32,
    section: usize,
}

/// Window of columns in the previous row that can touch `span`.
#[inline]
fn search_window(span: &Span, connectivity: Connectivity) -> (u32, u32) {
    match connectivity {
        Connectivity::Four => (span.start, span.end),
        Connectivity::Eight => (span.start.saturating_sub(1), span.end + 1),
    }
}

/// Extracts the connected regions of `raster` into `domain`.
///
/// Regions come out in order of their top-left-most run. Their runs, boxes
/// and centroids are absolute: local coordinates shifted by the raster origin.
pub fn extract_regions(
    raster: &Raster,
    domain: &mut SectionDomain,
    connectivity: Connectivity,
) -> Vec<Region> {
    let origin = raster.origin();
    let mut uf = UnionFind::new();
    let mut section_runs: Vec<Vec<Run>> = Vec::new();
    let mut local_boxes: Vec<Aabb> = Vec::new();

    let mut spans: Vec<Span> = Vec::with_capacity(raster.width() / 4);
    let mut prev: Vec<OpenRun> = Vec::new();
    let mut curr: Vec<OpenRun> = Vec::new();
    let mut preds: Vec<(usize, usize)> = Vec::new();
    let mut successors: Vec<u32> = Vec::new();

    for y in 0..raster.height() {
        spans.clear();
        raster.row_spans(y, &mut spans);
        curr.clear();

        if spans.is_empty() {
            prev.clear();
            continue;
        }

        // Connected runs of the previous row form a contiguous range.
        preds.clear();
        successors.clear();
        successors.resize(prev.len(), 0);
        let mut first = 0;
        for span in &spans {
            let (lo, hi) = search_window(span, connectivity);
            while first < prev.len() && prev[first].end <= lo {
                first += 1;
            }
            let mut last = first;
            while last < prev.len() && prev[last].start < hi {
                successors[last] += 1;
                last += 1;
            }
            preds.push((first, last));
        }

        for (span, &(first, last)) in spans.iter().zip(&preds) {
            let continues = last == first + 1 && successors[first] == 1;
            let section = if continues {
                prev[first].section
            } else {
                section_runs.push(Vec::new());
                local_boxes.push(Aabb::empty());
                uf.make_set()
            };
            for open in &prev[first..last] {
                uf.union(section, open.section);
            }

            section_runs[section].push(Run {
                y: origin.y + y as i32,
                x_start: origin.x + span.start as i32,
                x_end: origin.x + span.end as i32,
            });
            local_boxes[section].include_span(y as i32, span.start as i32, span.end as i32);
            curr.push(OpenRun {
                start: span.start,
                end: span.end,
                section,
            });
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    // Group sections by root, in order of section creation.
    let mut slot_of_root: Vec<Option<usize>> = vec![None; section_runs.len()];
    let mut groups: Vec<(Vec<SectionId>, Vec<Run>, Aabb)> = Vec::new();
    for (local, runs) in section_runs.into_iter().enumerate() {
        let root = uf.find(local);
        let slot = *slot_of_root[root].get_or_insert_with(|| {
            groups.push((Vec::new(), Vec::new(), Aabb::empty()));
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.2 = group.2.union(&local_boxes[local]);
        group.1.extend_from_slice(&runs);
        group.0.push(domain.add(runs));
    }

    let window = raster.bounds();
    groups
        .into_iter()
        .map(|(sections, runs, local_box)| {
            let region = Region::new(domain.kind(), sections, runs);
            assert_eq!(
                local_box.translate(origin),
                region.bbox(),
                "absolute box does not match local box shifted by {origin}"
            );
            assert!(window.contains_box(&region.bbox()));
            region
        })
        .collect()
}

/// Panics when a section is claimed by two regions.
pub fn assert_exclusive_ownership(regions: &[Region]) {
    let mut owned: HashSet<(DomainKind, SectionId)> = HashSet::new();
    for region in regions {
        for &section in region.sections() {
            assert!(
                owned.insert((region.domain(), section)),
                "{section} of domain {} owned by two regions",
                region.domain()
            );
        }
    }
}

// ============================================================================
// Union-find
// ============================================================================

/// Union-find over section indices with path halving.
#[derive(Debug, Default)]
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new() -> Self {
        Self::default()
    }

    fn make_set(&mut self) -> usize {
        let id = self.parent.len();
        self.parent.push(id);
        id
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // Smaller index wins, keeping roots at the earliest section.
            let (keep, drop) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[drop] = keep;
        }
    }
}
