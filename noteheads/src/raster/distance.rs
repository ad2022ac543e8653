//! Chamfer distance from foreground pixels to the nearest background pixel.

use common::Buffer2;

use super::Raster;

/// Cost of a horizontal or vertical step.
pub const CHAMFER_ORTHOGONAL: u16 = 3;
/// Cost of a diagonal step.
pub const CHAMFER_DIAGONAL: u16 = 4;

const FAR: u16 = u16::MAX / 2;

/// Two-pass 3-4 chamfer distance map of `raster`.
///
/// Background pixels hold 0. Pixels outside the window are background, so a
/// foreground pixel on the border is at distance [`CHAMFER_ORTHOGONAL`].
pub fn distance_to_background(raster: &Raster) -> Buffer2<u16> {
    let width = raster.width();
    let height = raster.height();
    let mut dist = Buffer2::new_filled(width, height, 0u16);

    for y in 0..height {
        for x in 0..width {
            if raster.get(x, y) {
                dist[(x, y)] = FAR;
            }
        }
    }

    let at = |dist: &Buffer2<u16>, x: isize, y: isize| -> u16 {
        dist.get_checked(x as i64, y as i64).copied().unwrap_or(0)
    };

    // Forward pass: left, upper-left, up, upper-right.
    for y in 0..height as isize {
        for x in 0..width as isize {
            let current = dist[(x as usize, y as usize)];
            if current == 0 {
                continue;
            }
            let best = current
                .min(at(&dist, x - 1, y) + CHAMFER_ORTHOGONAL)
                .min(at(&dist, x - 1, y - 1) + CHAMFER_DIAGONAL)
                .min(at(&dist, x, y - 1) + CHAMFER_ORTHOGONAL)
                .min(at(&dist, x + 1, y - 1) + CHAMFER_DIAGONAL);
            dist[(x as usize, y as usize)] = best;
        }
    }

    // Backward pass: right, lower-right, down, lower-left.
    for y in (0..height as isize).rev() {
        for x in (0..width as isize).rev() {
            let current = dist[(x as usize, y as usize)];
            if current == 0 {
                continue;
            }
            let best = current
                .min(at(&dist, x + 1, y) + CHAMFER_ORTHOGONAL)
                .min(at(&dist, x + 1, y + 1) + CHAMFER_DIAGONAL)
                .min(at(&dist, x, y + 1) + CHAMFER_ORTHOGONAL)
                .min(at(&dist, x - 1, y + 1) + CHAMFER_DIAGONAL);
            dist[(x as usize, y as usize)] = best;
        }
    }

    dist
}
