//! Binary morphology with disk structuring elements.
//!
//! Both operations work on horizontal runs: a disk is a stack of centred
//! horizontal segments, so dilating a run paints one widened run per disk
//! row, and eroding a row intersects shrunk runs of the rows around it.

use super::{fill_words, row_spans, Raster, Span};

/// Flat disk described by the half width of each of its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuringElement {
    radius: f64,
    half_widths: Vec<usize>,
}

impl StructuringElement {
    /// Disk of the given pixel radius. Non-positive radii give a single pixel.
    pub fn disk(radius: f64) -> Self {
        let radius = radius.max(0.0);
        let reach = radius.floor() as i64;
        let half_widths = (-reach..=reach)
            .map(|dy| {
                let dy = dy as f64;
                (radius * radius - dy * dy).max(0.0).sqrt().floor() as usize
            })
            .collect();
        Self {
            radius,
            half_widths,
        }
    }

    /// Disk fitting inside a shape of the given pixel diameter.
    pub fn for_diameter(diameter: f64) -> Self {
        Self::disk((diameter - 1.0) / 2.0)
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of rows above (and below) the centre row.
    #[inline]
    pub fn reach(&self) -> usize {
        self.half_widths.len() / 2
    }

    /// Half width of the disk row at vertical offset `dy`.
    #[inline]
    pub fn half_width(&self, dy: isize) -> usize {
        self.half_widths[(dy + self.reach() as isize) as usize]
    }

    /// Number of pixels in the disk.
    pub fn area(&self) -> usize {
        self.half_widths.iter().map(|hw| 2 * hw + 1).sum()
    }
}

/// Dilation. Output has the same window as `src`; growth past it is clipped.
pub fn dilate(src: &Raster, se: &StructuringElement) -> Raster {
    let mut out = Raster::new(src.origin(), src.width(), src.height());
    let reach = se.reach() as isize;
    let height = src.height() as isize;
    let mut spans: Vec<Span> = Vec::new();

    for y in 0..src.height() {
        spans.clear();
        src.row_spans(y, &mut spans);
        if spans.is_empty() {
            continue;
        }
        for dy in -reach..=reach {
            let ty = y as isize + dy;
            if ty < 0 || ty >= height {
                continue;
            }
            let hw = se.half_width(dy);
            for span in &spans {
                let start = (span.start as usize).saturating_sub(hw);
                let end = (span.end as usize + hw).min(src.width());
                out.fill_span(ty as usize, start, end, true);
            }
        }
    }

    out
}

/// Erosion. Pixels outside the window count as background.
pub fn erode(src: &Raster, se: &StructuringElement) -> Raster {
    let mut out = Raster::new(src.origin(), src.width(), src.height());
    let reach = se.reach() as isize;
    let height = src.height() as isize;
    let width = src.width();
    let words_per_row = width.div_ceil(64);

    let mut spans: Vec<Span> = Vec::new();
    let mut acc = vec![0u64; words_per_row];
    let mut shrunk = vec![0u64; words_per_row];

    'rows: for y in 0..src.height() {
        acc.fill(0);
        fill_words(&mut acc, 0, width, true);

        for dy in -reach..=reach {
            let sy = y as isize + dy;
            if sy < 0 || sy >= height {
                continue 'rows;
            }
            let hw = se.half_width(dy);

            shrunk.fill(0);
            spans.clear();
            row_spans(src.row(sy as usize), width as u32, &mut spans);
            for span in &spans {
                let start = span.start as usize + hw;
                let end = (span.end as usize).saturating_sub(hw);
                if start < end {
                    fill_words(&mut shrunk, start, end, true);
                }
            }

            let mut any = false;
            for (a, s) in acc.iter_mut().zip(&shrunk) {
                *a &= s;
                any |= *a != 0;
            }
            if !any {
                continue 'rows;
            }
        }

        out.row_mut(y).copy_from_slice(&acc);
    }

    out
}

/// Closing (dilation then erosion) of `src`, on a copy padded by the disk
/// reach so that growth near the border is not clipped.
///
/// The result window is larger than `src`; its origin is shifted by the padding.
pub fn close(src: &Raster, se: &StructuringElement) -> Raster {
    let padded = src.padded(se.reach());
    erode(&dilate(&padded, se), se)
}
