// フィード投稿レコード
//
// フィードジェネレーターのpostテーブルから読み取った1行を表す。
// レコードはストアが所有し、エクスポーターは読み取り専用で扱う。

use std::cmp::Ordering;

use chrono::NaiveDateTime;

/// 投稿レコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    /// 投稿URI（at://did/app.bsky.feed.post/rkey）
    pub uri: String,
    /// コンテンツハッシュ（同一時刻の並び順の決定にのみ使用）
    pub cid: String,
    /// インデックス化された日時
    pub indexed_at: NaiveDateTime,
}

impl PostRecord {
    /// 新しい投稿レコードを作成
    pub fn new(uri: impl Into<String>, cid: impl Into<String>, indexed_at: NaiveDateTime) -> Self {
        Self {
            uri: uri.into(),
            cid: cid.into(),
            indexed_at,
        }
    }
}

/// フィード表示順の比較関数
///
/// indexed_at降順、同一時刻はcid降順。
/// 同一時刻の投稿が存在し得るため、cidで全順序にする。
pub fn feed_order(a: &PostRecord, b: &PostRecord) -> Ordering {
    match b.indexed_at.cmp(&a.indexed_at) {
        Ordering::Equal => b.cid.cmp(&a.cid),
        other => other,
    }
}

/// 投稿をフィード表示順に並べ替える
pub fn sort_for_feed(posts: &mut [PostRecord]) {
    posts.sort_by(feed_order);
}
