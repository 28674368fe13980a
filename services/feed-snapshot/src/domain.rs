// Domain layer modules
pub mod backup_readme;
pub mod did_document;
pub mod feed_description;
pub mod feed_skeleton;
pub mod post_record;
pub mod snapshot_layout;

// Re-exports
pub use backup_readme::{render_backup_readme, ReadmeContext};
pub use did_document::{DidDocument, DidService};
pub use feed_description::{
    DescribeFeedGeneratorBody, DescribeFeedGeneratorResponse, FeedDescriptor,
};
pub use feed_skeleton::{FeedSkeleton, SkeletonFeedPost};
pub use post_record::{feed_order, sort_for_feed, PostRecord};
pub use snapshot_layout::Artifact;
