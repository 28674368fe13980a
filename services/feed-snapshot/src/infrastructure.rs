// Infrastructure layer modules
pub mod config;
pub mod logging;
pub mod post_repository;
pub mod snapshot_writer;
pub mod sqlite_post_repository;

// Re-exports
pub use config::{parse_comma_separated, ExportConfig, ExportConfigError};
pub use logging::{init_logging, LogFormat};
pub use post_repository::{ConnectOutcome, PostRepository, PostRepositoryError};
pub use snapshot_writer::{SnapshotWriteError, SnapshotWriter, WrittenFile};
pub use sqlite_post_repository::SqlitePostRepository;
