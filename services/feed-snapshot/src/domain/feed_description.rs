// describeFeedGeneratorレスポンス
//
// 静的ホスティングではレスポンスボディをそのまま返せないため、
// encodingとbodyを包んだ形で保存する。

use serde::Serialize;

/// レスポンスのエンコーディング
pub const JSON_ENCODING: &str = "application/json";

/// app.bsky.feed.describeFeedGeneratorレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescribeFeedGeneratorResponse {
    pub encoding: String,
    pub body: DescribeFeedGeneratorBody,
}

/// describeFeedGeneratorのボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescribeFeedGeneratorBody {
    /// サービスDID
    pub did: String,
    /// 公開しているフィード
    pub feeds: Vec<FeedDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedDescriptor {
    pub uri: String,
}

impl DescribeFeedGeneratorResponse {
    /// 単一フィードを公開するレスポンスを作成
    pub fn new(service_did: &str, feed_uri: &str) -> Self {
        Self {
            encoding: JSON_ENCODING.to_string(),
            body: DescribeFeedGeneratorBody {
                did: service_did.to_string(),
                feeds: vec![FeedDescriptor {
                    uri: feed_uri.to_string(),
                }],
            },
        }
    }
}
