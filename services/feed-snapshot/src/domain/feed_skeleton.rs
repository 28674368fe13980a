// getFeedSkeletonレスポンス
//
// app.bsky.feed.getFeedSkeletonのレスポンス構造を定義する。
// 静的スナップショットは全件を1ページで返すため、cursorフィールドは持たない。

use serde::Serialize;

use super::post_record::PostRecord;

/// フィードスケルトンの1項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkeletonFeedPost {
    /// 投稿URI
    pub post: String,
}

impl SkeletonFeedPost {
    pub fn new(post: impl Into<String>) -> Self {
        Self { post: post.into() }
    }
}

/// getFeedSkeletonレスポンス（静的スナップショット版）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedSkeleton {
    /// フィード項目（スティッキー投稿 → 取得した投稿の順）
    pub feed: Vec<SkeletonFeedPost>,
}

impl FeedSkeleton {
    /// スティッキー投稿と取得済み投稿からフィードを構築
    ///
    /// スティッキー投稿は指定順のまま先頭に置き、その後に`posts`を与えられた順で続ける。
    /// `posts`はストアがindexed_at降順・cid降順で返したものを想定する。
    ///
    /// # Arguments
    /// * `sticky` - 先頭に固定する投稿URI
    /// * `posts` - ストアから取得した投稿
    pub fn build(sticky: &[String], posts: &[PostRecord]) -> Self {
        let feed = sticky
            .iter()
            .map(|uri| SkeletonFeedPost::new(uri.as_str()))
            .chain(posts.iter().map(|post| SkeletonFeedPost::new(post.uri.as_str())))
            .collect();

        Self { feed }
    }

    /// フィード項目数
    pub fn len(&self) -> usize {
        self.feed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feed.is_empty()
    }

    /// フィード項目のURI一覧
    pub fn uris(&self) -> Vec<&str> {
        self.feed.iter().map(|item| item.post.as_str()).collect()
    }
}
