use thiserror::Error;

use crate::spot::SpotId;
use crate::system::SystemId;

/// Failure of an external collaborator. The system being processed is abandoned.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{system}: no staff geometry for {spot}")]
    Geometry {
        system: SystemId,
        spot: SpotId,
        #[source]
        source: anyhow::Error,
    },

    #[error("{system}: shape classifier failed on {spot}")]
    Classifier {
        system: SystemId,
        spot: SpotId,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    pub fn system(&self) -> SystemId {
        match self {
            Error::Geometry { system, .. } | Error::Classifier { system, .. } => *system,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
