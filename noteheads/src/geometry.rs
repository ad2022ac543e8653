//! Staff geometry seen from the head builder.

use glam::DVec2;

/// Ledger line identified by its signed index: negative above the staff,
/// positive below, 1 being the closest to the staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedLedger {
    pub index: i32,
}

/// Position of a point relative to a staff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotePosition {
    /// Pitch position: 0 on the middle line, one unit per line or space,
    /// increasing downward.
    pub pitch_position: f64,
    /// Closest ledger on the side of the point, if any.
    pub ledger: Option<IndexedLedger>,
}

pub trait Staff: Sync {
    fn note_position(&self, point: DVec2) -> NotePosition;

    /// Abscissa where the staff header (clef, key, time) ends.
    fn dmz_end(&self) -> i32;

    fn line_count(&self) -> usize;
}

/// Finds the staff relevant for a point of a system.
pub trait StaffLocator: Sync {
    fn staff_at(&self, point: DVec2) -> anyhow::Result<&dyn Staff>;
}

/// Pitch position of ledger `index` on a five-line staff: ±(4 + 2·|index|).
pub fn ledger_pitch_position(index: i32) -> f64 {
    assert!(index != 0, "ledger index 0 is a staff line");
    let magnitude = 4 + 2 * index.abs();
    (index.signum() * magnitude) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_positions() {
        assert_eq!(ledger_pitch_position(-1), -6.0);
        assert_eq!(ledger_pitch_position(1), 6.0);
        assert_eq!(ledger_pitch_position(2), 8.0);
        assert_eq!(ledger_pitch_position(-3), -10.0);
    }

    #[test]
    #[should_panic(expected = "ledger index 0")]
    fn ledger_zero_is_rejected() {
        ledger_pitch_position(0);
    }
}
