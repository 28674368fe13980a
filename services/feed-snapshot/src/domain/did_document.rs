// サービスDIDドキュメント
//
// /.well-known/did.json として配信されるdid:webドキュメントの構造を定義する。

use serde::Serialize;

/// DIDドキュメントのJSON-LDコンテキスト
pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// フィードジェネレーターサービスのフラグメントID
pub const FEED_GENERATOR_SERVICE_ID: &str = "#bsky_fg";

/// フィードジェネレーターサービスの種別
pub const FEED_GENERATOR_SERVICE_TYPE: &str = "BskyFeedGenerator";

/// サービスDIDドキュメント
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DidDocument {
    /// JSON-LDコンテキスト
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// サービスDID
    pub id: String,

    /// サービスエントリ（フィードジェネレーター1件のみ）
    pub service: Vec<DidService>,
}

/// DIDドキュメントのサービスエントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DidService {
    pub id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub service_endpoint: String,
}

impl DidDocument {
    /// フィードジェネレーターサービス用のDIDドキュメントを作成
    ///
    /// # Arguments
    /// * `service_did` - サービスDID（documentのidになる）
    /// * `hostname` - サービスエンドポイントのホスト名（https://を付与する）
    pub fn for_service(service_did: &str, hostname: &str) -> Self {
        Self {
            context: vec![DID_CONTEXT.to_string()],
            id: service_did.to_string(),
            service: vec![DidService {
                id: FEED_GENERATOR_SERVICE_ID.to_string(),
                service_type: FEED_GENERATOR_SERVICE_TYPE.to_string(),
                service_endpoint: format!("https://{}", hostname),
            }],
        }
    }
}
