//! Flooding watershed over a distance map.
//!
//! Basins are seeded at the distance peaks and grown level by level toward
//! the background. A pixel reached by two different basins becomes a
//! boundary pixel and stays unlabeled, so once the boundary pixels are
//! removed the basins are no longer connected, even diagonally.

use std::collections::VecDeque;

use common::Buffer2;
use glam::UVec2;

const UNLABELED: u32 = 0;
const BOUNDARY: u32 = u32::MAX;

/// Result of one watershed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Number of basins found.
    pub region_count: usize,
    /// Pixels separating two or more basins, in raster-local coordinates.
    pub boundaries: Vec<UVec2>,
}

/// Watershed segmentation of the foreground (non-zero) pixels of a distance map.
#[derive(Debug)]
pub struct Watershed<'a> {
    dist: &'a Buffer2<u16>,
}

impl<'a> Watershed<'a> {
    pub fn new(dist: &'a Buffer2<u16>) -> Self {
        Self { dist }
    }

    /// Floods from the highest distance down to 1, lowering the water by
    /// `step` each time. Larger steps merge nearby peaks into one basin.
    pub fn process(&self, step: u16) -> Partition {
        assert!(step > 0, "watershed step must be positive");

        let dist = self.dist;
        let mut labels = Buffer2::new_filled(dist.width(), dist.height(), UNLABELED);
        let mut next_label = 1u32;

        let top = dist.max_value().unwrap_or(0);
        if top == 0 {
            return Partition::empty();
        }

        let mut level = top;
        loop {
            self.grow_basins(&mut labels, level);
            next_label = self.seed_basins(&mut labels, level, next_label);
            if level == 1 {
                break;
            }
            level = level.saturating_sub(step).max(1);
        }

        let width = dist.width();
        let boundaries = labels
            .pixels()
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == BOUNDARY)
            .map(|(i, _)| UVec2::new((i % width) as u32, (i / width) as u32))
            .collect();

        Partition {
            region_count: (next_label - 1) as usize,
            boundaries,
        }
    }

    /// Extends existing basins over unlabeled pixels at or above `level`.
    fn grow_basins(&self, labels: &mut Buffer2<u32>, level: u16) {
        let dist = self.dist;
        let mut queue = VecDeque::new();

        for y in 0..dist.height() {
            for x in 0..dist.width() {
                if labels[(x, y)] == UNLABELED
                    && dist[(x, y)] >= level
                    && labels
                        .neighbors8(x, y)
                        .any(|n| is_basin(labels[n]))
                {
                    queue.push_back((x, y));
                }
            }
        }

        while let Some((x, y)) = queue.pop_front() {
            if labels[(x, y)] != UNLABELED {
                continue;
            }

            let mut seen = UNLABELED;
            let mut conflict = false;
            for n in labels.neighbors8(x, y) {
                let label = labels[n];
                if !is_basin(label) {
                    continue;
                }
                if seen == UNLABELED {
                    seen = label;
                } else if seen != label {
                    conflict = true;
                    break;
                }
            }

            if conflict {
                labels[(x, y)] = BOUNDARY;
                continue;
            }
            if seen == UNLABELED {
                continue;
            }

            labels[(x, y)] = seen;
            for n in dist.neighbors8(x, y) {
                if labels[n] == UNLABELED && dist[n] >= level {
                    queue.push_back(n);
                }
            }
        }
    }

    /// Starts a new basin for every unlabeled component at or above `level`.
    fn seed_basins(&self, labels: &mut Buffer2<u32>, level: u16, mut next_label: u32) -> u32 {
        let dist = self.dist;
        let mut stack = Vec::new();

        for y in 0..dist.height() {
            for x in 0..dist.width() {
                if labels[(x, y)] != UNLABELED || dist[(x, y)] < level {
                    continue;
                }

                let label = next_label;
                next_label += 1;
                labels[(x, y)] = label;
                stack.push((x, y));

                while let Some(p) = stack.pop() {
                    for n in dist.neighbors8(p.0, p.1) {
                        if labels[n] == UNLABELED && dist[n] >= level {
                            labels[n] = label;
                            stack.push(n);
                        }
                    }
                }
            }
        }

        next_label
    }
}

impl Partition {
    fn empty() -> Self {
        Self {
            region_count: 0,
            boundaries: Vec::new(),
        }
    }
}

#[inline]
fn is_basin(label: u32) -> bool {
    label != UNLABELED && label != BOUNDARY
}
