//! Raster drawing helpers and fake collaborators for tests.

use anyhow::bail;
use glam::{DVec2, IVec2};

use crate::classifier::ShapeClassifier;
use crate::geometry::{IndexedLedger, NotePosition, Staff, StaffLocator};
use crate::raster::Raster;
use crate::shape::Shape;
use crate::spot::Spot;

// ============================================================================
// Rasters
// ============================================================================

/// Raster from rows of `#` (foreground) and `.` (background).
pub fn raster_from_ascii(origin: IVec2, art: &str) -> Raster {
    let rows: Vec<&str> = art.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut raster = Raster::new(origin, width, rows.len());
    for (y, row) in rows.iter().enumerate() {
        for (x, c) in row.chars().enumerate() {
            if c == '#' {
                raster.set(x, y, true);
            }
        }
    }
    raster
}

pub fn raster_to_ascii(raster: &Raster) -> String {
    (0..raster.height())
        .map(|y| {
            (0..raster.width())
                .map(|x| if raster.get(x, y) { '#' } else { '.' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fills a `w x h` rectangle at local `(x, y)`.
pub fn draw_rect(raster: &mut Raster, x: usize, y: usize, w: usize, h: usize) {
    for row in y..y + h {
        raster.fill_span(row, x, x + w, true);
    }
}

/// Fills the pixels within `radius` of local centre `(cx, cy)`.
pub fn draw_disk(raster: &mut Raster, cx: f64, cy: f64, radius: f64) {
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let d = DVec2::new(x as f64 - cx, y as f64 - cy);
            if d.length_squared() <= radius * radius {
                raster.set(x, y, true);
            }
        }
    }
}

// ============================================================================
// Classifiers
// ============================================================================

/// Classifier answering through a closure.
pub struct FnClassifier<F>(pub F);

impl<F> ShapeClassifier for FnClassifier<F>
where
    F: Fn(&Spot, Shape) -> anyhow::Result<f64> + Sync,
{
    fn evaluate(&self, spot: &Spot, shape: Shape) -> anyhow::Result<f64> {
        (self.0)(spot, shape)
    }
}

/// Classifier giving the same grade to everything.
pub struct FixedClassifier(pub f64);

impl ShapeClassifier for FixedClassifier {
    fn evaluate(&self, _spot: &Spot, _shape: Shape) -> anyhow::Result<f64> {
        Ok(self.0)
    }
}

pub struct FailingClassifier;

impl ShapeClassifier for FailingClassifier {
    fn evaluate(&self, spot: &Spot, _shape: Shape) -> anyhow::Result<f64> {
        bail!("no model loaded for {}", spot.id())
    }
}

// ============================================================================
// Staves
// ============================================================================

/// Horizontal staff with evenly spaced lines.
#[derive(Debug, Clone)]
pub struct FlatStaff {
    pub top_line_y: f64,
    pub interline: f64,
    pub line_count: usize,
    pub dmz_end: i32,
    /// Signed indices of the ledgers present.
    pub ledgers: Vec<i32>,
}

impl FlatStaff {
    pub fn new(top_line_y: f64, interline: f64) -> Self {
        Self {
            top_line_y,
            interline,
            line_count: 5,
            dmz_end: 0,
            ledgers: Vec::new(),
        }
    }

    /// Ordinate of a pitch position.
    pub fn y_at_pitch(&self, pitch: f64) -> f64 {
        self.middle_y() + pitch * self.interline / 2.0
    }

    fn middle_y(&self) -> f64 {
        self.top_line_y + self.interline * (self.line_count - 1) as f64 / 2.0
    }
}

impl Staff for FlatStaff {
    fn note_position(&self, point: DVec2) -> NotePosition {
        let pitch_position = (point.y - self.middle_y()) / (self.interline / 2.0);
        let ledger = self
            .ledgers
            .iter()
            .copied()
            .filter(|&index| (index < 0) == (pitch_position < 0.0))
            .min_by(|&a, &b| {
                let da = (crate::geometry::ledger_pitch_position(a) - pitch_position).abs();
                let db = (crate::geometry::ledger_pitch_position(b) - pitch_position).abs();
                da.total_cmp(&db)
            })
            .map(|index| IndexedLedger { index });
        NotePosition {
            pitch_position,
            ledger,
        }
    }

    fn dmz_end(&self) -> i32 {
        self.dmz_end
    }

    fn line_count(&self) -> usize {
        self.line_count
    }
}

/// Locator for a system with a single staff.
pub struct SingleStaff(pub FlatStaff);

impl StaffLocator for SingleStaff {
    fn staff_at(&self, _point: DVec2) -> anyhow::Result<&dyn Staff> {
        Ok(&self.0)
    }
}

/// Locator that knows no staff.
pub struct NoStaff;

impl StaffLocator for NoStaff {
    fn staff_at(&self, point: DVec2) -> anyhow::Result<&dyn Staff> {
        bail!("no staff at {point}")
    }
}

// ============================================================================
// Spot pools
// ============================================================================

/// Registers a filled `w x h` rectangle at absolute `(x, y)` as a spot.
pub fn add_rect_spot(
    registry: &mut crate::registry::SpotRegistry,
    x: i32,
    y: i32,
    w: usize,
    h: usize,
    shape: Shape,
) -> crate::spot::SpotId {
    let mut raster = Raster::new(IVec2::new(x, y), w, h);
    draw_rect(&mut raster, 0, 0, w, h);
    add_raster_spot(registry, &raster, shape)
}

/// Registers the single connected region of `raster` as a spot.
pub fn add_raster_spot(
    registry: &mut crate::registry::SpotRegistry,
    raster: &Raster,
    shape: Shape,
) -> crate::spot::SpotId {
    let regs = registry.register_raster(
        raster,
        crate::labeling::DomainKind::Spot,
        shape,
        crate::config::Connectivity::Four,
    );
    assert_eq!(regs.len(), 1, "test raster must hold one region");
    regs[0].id
}

/// Parameters at interline 10: typical head 133 px, min head 75 px,
/// max spot width 40 px, min mean width 10 px, head diameter 7.5 px.
pub fn params_10() -> crate::config::Parameters {
    crate::config::Parameters::new(
        &crate::config::Config::default(),
        &crate::config::Scale::new(10),
    )
}
