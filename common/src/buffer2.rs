use std::ops::{Index, IndexMut};

/// Row-major 2D grid of per-pixel values (distance maps, basin labels).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer2<T> {
    pixels: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Buffer2<T> {
    pub fn new(width: usize, height: usize, pixels: Vec<T>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixels length must equal width * height"
        );
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    /// Value at signed coordinates, `None` outside the grid.
    #[inline]
    pub fn get_checked(&self, x: i64, y: i64) -> Option<&T> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(&self.pixels[y as usize * self.width + x as usize])
    }

    /// In-grid 8-neighbours of `(x, y)`, row by row.
    pub fn neighbors8(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (w, h) = (self.width as i64, self.height as i64);
        let (cx, cy) = (x as i64, y as i64);
        (-1i64..=1)
            .flat_map(move |dy| (-1i64..=1).map(move |dx| (cx + dx, cy + dy)))
            .filter(move |&(nx, ny)| {
                (nx, ny) != (cx, cy) && nx >= 0 && ny >= 0 && nx < w && ny < h
            })
            .map(|(nx, ny)| (nx as usize, ny as usize))
    }
}

impl<T: Clone> Buffer2<T> {
    pub fn new_filled(width: usize, height: usize, value: T) -> Self {
        Self {
            pixels: vec![value; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn fill(&mut self, value: T) {
        self.pixels.fill(value);
    }
}

impl<T: Default + Clone> Buffer2<T> {
    pub fn new_default(width: usize, height: usize) -> Self {
        Self::new_filled(width, height, T::default())
    }
}

impl<T: Copy + Ord> Buffer2<T> {
    /// Largest value in the grid, `None` when empty.
    pub fn max_value(&self) -> Option<T> {
        self.pixels.iter().copied().max()
    }
}

impl<T> Index<(usize, usize)> for Buffer2<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        debug_assert!(x < self.width && y < self.height);
        &self.pixels[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Buffer2<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        debug_assert!(x < self.width && y < self.height);
        &mut self.pixels[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_row_major() {
        let mut buf = Buffer2::new_filled(3, 2, 0u16);
        buf[(2, 1)] = 7;
        assert_eq!(buf.pixels()[5], 7);
        assert_eq!(buf[(2, 1)], 7);
    }

    #[test]
    fn get_checked_outside_is_none() {
        let buf = Buffer2::new_filled(2, 2, 1u8);
        assert_eq!(buf.get_checked(-1, 0), None);
        assert_eq!(buf.get_checked(0, 2), None);
        assert_eq!(buf.get_checked(1, 1), Some(&1));
    }

    #[test]
    fn corner_has_three_neighbors() {
        let buf = Buffer2::new_filled(4, 4, 0u8);
        let n: Vec<_> = buf.neighbors8(0, 0).collect();
        assert_eq!(n, vec![(1, 0), (0, 1), (1, 1)]);
        assert_eq!(buf.neighbors8(1, 1).count(), 8);
    }

    #[test]
    fn max_value() {
        let buf = Buffer2::new(2, 2, vec![3u16, 9, 0, 4]);
        assert_eq!(buf.max_value(), Some(9));
        assert_eq!(Buffer2::<u16>::new(0, 0, vec![]).max_value(), None);
    }

    #[test]
    #[should_panic(expected = "pixels length")]
    fn new_rejects_bad_length() {
        let _ = Buffer2::new(2, 2, vec![0u8; 3]);
    }
}
