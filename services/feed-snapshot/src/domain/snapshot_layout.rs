// 静的スナップショットのファイル配置
//
// 出力ルートからの相対パスは固定。静的ホスティングがそのまま配信できるよう、
// XRPCエンドポイントはディレクトリ + index.json で表現する。

use std::fmt;

/// スナップショットで生成する成果物
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// /.well-known/did.json
    DidDocument,
    /// /xrpc/app.bsky.feed.describeFeedGenerator/
    FeedDescription,
    /// /xrpc/app.bsky.feed.getFeedSkeleton/
    FeedSkeleton,
    /// README.md
    Readme,
}

impl Artifact {
    /// 生成順
    pub const ALL: [Artifact; 4] = [
        Artifact::DidDocument,
        Artifact::FeedDescription,
        Artifact::FeedSkeleton,
        Artifact::Readme,
    ];

    /// 出力ルートからの相対パス
    pub fn relative_path(&self) -> &'static str {
        match self {
            Artifact::DidDocument => ".well-known/did.json",
            Artifact::FeedDescription => "xrpc/app.bsky.feed.describeFeedGenerator/index.json",
            Artifact::FeedSkeleton => "xrpc/app.bsky.feed.getFeedSkeleton/index.json",
            Artifact::Readme => "README.md",
        }
    }

    /// 成果物を置くディレクトリ（ルート直下ならNone）
    pub fn relative_dir(&self) -> Option<&'static str> {
        match self {
            Artifact::DidDocument => Some(".well-known"),
            Artifact::FeedDescription => Some("xrpc/app.bsky.feed.describeFeedGenerator"),
            Artifact::FeedSkeleton => Some("xrpc/app.bsky.feed.getFeedSkeleton"),
            Artifact::Readme => None,
        }
    }

    /// 配信するエンドポイントのURLパス（エンドポイントでない成果物はNone）
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Artifact::DidDocument => Some("/.well-known/did.json"),
            Artifact::FeedDescription => Some("/xrpc/app.bsky.feed.describeFeedGenerator/"),
            Artifact::FeedSkeleton => Some("/xrpc/app.bsky.feed.getFeedSkeleton/"),
            Artifact::Readme => None,
        }
    }

    /// READMEに載せるエンドポイントの説明
    pub fn endpoint_label(&self) -> Option<&'static str> {
        match self {
            Artifact::DidDocument => Some("Service identity document"),
            Artifact::FeedDescription => Some("Feed metadata"),
            Artifact::FeedSkeleton => Some("Feed data"),
            Artifact::Readme => None,
        }
    }

    /// ログ用の名前
    pub fn name(&self) -> &'static str {
        match self {
            Artifact::DidDocument => "did_document",
            Artifact::FeedDescription => "feed_description",
            Artifact::FeedSkeleton => "feed_skeleton",
            Artifact::Readme => "readme",
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
