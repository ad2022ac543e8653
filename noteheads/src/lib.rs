//! Black note-head extraction from the spot pool of a music sheet system.
//!
//! The pipeline takes ambiguous dark spots (beams, stacks of heads, or both),
//! closes them into head-like shapes, splits those heavier than one head,
//! and grades every remaining piece against the shape classifier and the
//! staff geometry. See [`BlackHeadsBuilder`] for the entry point.

pub mod builder;
pub mod classifier;
pub mod config;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod labeling;
pub mod math;
pub mod merge;
pub mod raster;
pub mod reconstruct;
pub mod region;
pub mod registry;
pub mod shape;
pub mod sig;
pub mod split;
pub mod spot;
pub mod system;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_utils;

pub use builder::{BlackHeadsBuilder, HeadsContext, HeadsReport};
pub use classifier::ShapeClassifier;
pub use config::{Config, Connectivity, GradeFusion, Parameters, Scale};
pub use error::{Error, Result};
pub use geometry::{IndexedLedger, NotePosition, Staff, StaffLocator};
pub use region::Region;
pub use registry::SpotRegistry;
pub use shape::Shape;
pub use sig::{HeadCandidate, Impacts, InterSink, Sig};
pub use spot::{Interpretation, Spot, SpotId};
pub use system::{SystemId, SystemInfo};
