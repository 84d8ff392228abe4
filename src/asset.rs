//! Readiness gate for the externally loaded flower mesh.
//!
//! The loader runs elsewhere (a file watcher, a fetch, another thread) and hands the
//! mesh over through a [`FlowerLoader`]. Generation only ever receives a resolved
//! [`FlowerMesh`], so it cannot run ahead of the asset.

use crate::error::{PlantError, PlantResult};
use crate::mesh::FlowerMesh;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Sending half, given to the asset loader.
#[derive(Debug)]
pub struct FlowerLoader {
    tx: Sender<FlowerMesh>,
}

impl FlowerLoader {
    /// Delivers the mesh. Returns it back if the gate has already been dropped.
    pub fn deliver(self, mesh: FlowerMesh) -> Result<(), FlowerMesh> {
        self.tx.send(mesh).map_err(|e| e.0)
    }
}

/// A flower mesh that may still be loading.
#[derive(Debug)]
pub enum FlowerAsset {
    Ready(FlowerMesh),
    Pending(Receiver<FlowerMesh>),
}

impl FlowerAsset {
    /// A gate that is already open.
    pub fn ready(mesh: FlowerMesh) -> Self {
        FlowerAsset::Ready(mesh)
    }

    /// A closed gate plus the loader that opens it.
    pub fn pending() -> (FlowerLoader, Self) {
        let (tx, rx) = mpsc::channel();
        (FlowerLoader { tx }, FlowerAsset::Pending(rx))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, FlowerAsset::Ready(_))
    }

    /// Non-blocking poll. Moves a delivered mesh into the `Ready` state.
    ///
    /// Returns `Ok(None)` while still loading and [`PlantError::MissingAsset`] once the
    /// loader has gone away without delivering.
    pub fn try_get(&mut self) -> PlantResult<Option<&FlowerMesh>> {
        if let FlowerAsset::Pending(rx) = self {
            match rx.try_recv() {
                Ok(mesh) => *self = FlowerAsset::Ready(mesh),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => return Err(PlantError::MissingAsset),
            }
        }
        match self {
            FlowerAsset::Ready(mesh) => Ok(Some(mesh)),
            FlowerAsset::Pending(_) => Ok(None),
        }
    }

    /// Blocks until the mesh arrives.
    pub fn wait(self) -> PlantResult<FlowerMesh> {
        match self {
            FlowerAsset::Ready(mesh) => Ok(mesh),
            FlowerAsset::Pending(rx) => {
                log::debug!("waiting for flower mesh");
                rx.recv().map_err(|_| PlantError::MissingAsset)
            }
        }
    }
}
