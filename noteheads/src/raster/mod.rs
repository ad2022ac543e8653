//! Bit-packed binary raster windows anchored at an absolute sheet origin.

mod distance;
mod morphology;
mod watershed;


pub use distance::{distance_to_background, CHAMFER_DIAGONAL, CHAMFER_ORTHOGONAL};
pub use morphology::{close, dilate, erode, StructuringElement};
pub use watershed::{Partition, Watershed};

use glam::IVec2;

use crate::math::Aabb;

/// Horizontal run of foreground pixels in raster-local columns, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Binary pixel grid, one bit per pixel, each row padded to whole words.
///
/// Pixel `(x, y)` in local coordinates sits at `origin + (x, y)` on the sheet.
/// Bits past `width` in the last word of a row are always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    origin: IVec2,
    width: usize,
    height: usize,
    words_per_row: usize,
    words: Vec<u64>,
}

impl Raster {
    /// All-background raster.
    pub fn new(origin: IVec2, width: usize, height: usize) -> Self {
        let words_per_row = width.div_ceil(64);
        Self {
            origin,
            width,
            height,
            words_per_row,
            words: vec![0; words_per_row * height],
        }
    }

    /// All-background raster covering `bounds`.
    pub fn covering(bounds: &Aabb) -> Self {
        Self::new(bounds.origin(), bounds.width(), bounds.height())
    }

    #[inline]
    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Absolute box covered by the window.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_origin_size(self.origin, self.width, self.height)
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u64] {
        let start = y * self.words_per_row;
        &self.words[start..start + self.words_per_row]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u64] {
        let start = y * self.words_per_row;
        &mut self.words[start..start + self.words_per_row]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.width && y < self.height);
        (self.row(y)[x / 64] >> (x % 64)) & 1 != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        debug_assert!(x < self.width && y < self.height);
        let word = &mut self.row_mut(y)[x / 64];
        let mask = 1u64 << (x % 64);
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// Foreground test at absolute coordinates, background outside the window.
    pub fn get_absolute(&self, x: i32, y: i32) -> bool {
        let local = IVec2::new(x, y) - self.origin;
        local.x >= 0
            && local.y >= 0
            && (local.x as usize) < self.width
            && (local.y as usize) < self.height
            && self.get(local.x as usize, local.y as usize)
    }

    /// Sets or clears local columns `[x_start, x_end)` of row `y`.
    pub fn fill_span(&mut self, y: usize, x_start: usize, x_end: usize, value: bool) {
        debug_assert!(x_end <= self.width);
        fill_words(self.row_mut(y), x_start, x_end, value);
    }

    pub fn clear_row(&mut self, y: usize) {
        self.row_mut(y).fill(0);
    }

    /// Foreground pixel count.
    pub fn weight(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_blank(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Appends the foreground runs of row `y` to `spans`, left to right.
    pub fn row_spans(&self, y: usize, spans: &mut Vec<Span>) {
        row_spans(self.row(y), self.width as u32, spans);
    }

    /// ORs `other` into this raster at its absolute position.
    ///
    /// Panics when `other` does not fit inside this window: a fragment that
    /// lands outside the shared canvas has a corrupted offset.
    pub fn inject(&mut self, other: &Raster) {
        assert!(
            self.bounds().contains_box(&other.bounds()),
            "raster {:?} does not fit into window {:?}",
            other.bounds(),
            self.bounds()
        );
        let offset = other.origin - self.origin;
        let (dx, dy) = (offset.x as usize, offset.y as usize);
        let mut spans = Vec::new();
        for y in 0..other.height {
            spans.clear();
            other.row_spans(y, &mut spans);
            for span in &spans {
                self.fill_span(
                    y + dy,
                    span.start as usize + dx,
                    span.end as usize + dx,
                    true,
                );
            }
        }
    }

    /// Copy grown by `pad` background pixels on every side, origin moved accordingly.
    pub fn padded(&self, pad: usize) -> Raster {
        let shift = IVec2::splat(pad as i32);
        let mut out = Raster::new(
            self.origin - shift,
            self.width + 2 * pad,
            self.height + 2 * pad,
        );
        out.inject(self);
        out
    }
}

/// Sets or clears bit columns `[x_start, x_end)` in a row of words.
pub(crate) fn fill_words(row: &mut [u64], x_start: usize, x_end: usize, value: bool) {
    let mut x = x_start;
    while x < x_end {
        let bit = x % 64;
        let n = (64 - bit).min(x_end - x);
        let mask = if n == 64 {
            !0u64
        } else {
            ((1u64 << n) - 1) << bit
        };
        let word = &mut row[x / 64];
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
        x += n;
    }
}

/// Run extraction over one packed row using trailing-zero scans.
///
/// Full and empty words are skipped whole; mixed words jump from transition
/// to transition.
pub(crate) fn row_spans(row: &[u64], width: u32, spans: &mut Vec<Span>) {
    let mut open: Option<u32> = None;

    for (word_idx, &word) in row.iter().enumerate() {
        let base = (word_idx * 64) as u32;

        match (word, open) {
            (0, None) | (u64::MAX, Some(_)) => continue,
            (0, Some(start)) => {
                spans.push(Span { start, end: base });
                open = None;
                continue;
            }
            (u64::MAX, None) => {
                open = Some(base);
                continue;
            }
            _ => {}
        }

        let mut pos = 0u32;
        while pos < 64 {
            match open {
                None => {
                    let rest = word >> pos;
                    if rest == 0 {
                        break;
                    }
                    pos += rest.trailing_zeros();
                    open = Some(base + pos);
                }
                Some(start) => {
                    let rest = !word >> pos;
                    if rest == 0 {
                        break;
                    }
                    pos += rest.trailing_zeros();
                    spans.push(Span {
                        start,
                        end: base + pos,
                    });
                    open = None;
                }
            }
        }
    }

    if let Some(start) = open {
        spans.push(Span { start, end: width });
    }
}
