use common::index_type;
use parking_lot::Mutex;

use crate::registry::SpotRegistry;
use crate::sig::Sig;

index_type!(SystemId);

/// One system of a sheet: its spot pool and its interpretation graph.
///
/// Each lives behind its own lock, so systems can be processed in parallel
/// while a stage holds the registry for one batch of registrations.
#[derive(Debug)]
pub struct SystemInfo {
    id: SystemId,
    spots: Mutex<SpotRegistry>,
    sig: Mutex<Sig>,
}

impl SystemInfo {
    pub fn new(id: SystemId, spots: SpotRegistry) -> Self {
        Self {
            id,
            spots: Mutex::new(spots),
            sig: Mutex::new(Sig::new()),
        }
    }

    #[inline]
    pub fn id(&self) -> SystemId {
        self.id
    }

    #[inline]
    pub fn spots(&self) -> &Mutex<SpotRegistry> {
        &self.spots
    }

    #[inline]
    pub fn sig(&self) -> &Mutex<Sig> {
        &self.sig
    }

    pub fn into_parts(self) -> (SpotRegistry, Sig) {
        (self.spots.into_inner(), self.sig.into_inner())
    }
}
