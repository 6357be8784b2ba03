pub mod preview;
pub mod snapshot;
pub mod store;

use std::io;
use std::path::PathBuf;

pub use preview::{PREVIEW_PREFIX, render_preview};
pub use snapshot::{
    LayerEntry, LayerPayload, LegacyTile, LegacyTileState, PayloadFormat, RestoreReport, Snapshot,
    SnapshotDraft, SparseLayers, capture, capture_layers, restore_grid,
};
pub use store::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};

/// Errors that can occur during snapshot storage.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid snapshot JSON in {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Snapshot not found: {0}. List stored snapshots with: worldpaint snapshots list")]
    NotFound(String),
    #[error("Preview encoding failed: {0}")]
    Preview(String),
}
