// Application layer modules
pub mod snapshot_exporter;

// Re-exports
pub use snapshot_exporter::{
    ArtifactWriteError, ExportError, ExportOptions, ExportReport, FailedArtifact,
    SnapshotExporter, WrittenArtifact,
};
