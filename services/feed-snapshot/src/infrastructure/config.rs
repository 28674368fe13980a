// エクスポート設定
//
// 環境変数からスナップショット生成に必要な設定値を読み込み、
// 明示的な構造体としてエクスポーターに渡す。

use std::path::PathBuf;

use thiserror::Error;

/// デフォルトの出力ディレクトリ
pub const DEFAULT_OUTPUT_DIR: &str = "_site";

/// デフォルトのデータベースパス
pub const DEFAULT_DB_PATH: &str = "feed_database.db";

/// デフォルトのREADME見出し
pub const DEFAULT_FEED_TITLE: &str = "Feed Backup";

/// 設定読み込みエラー
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExportConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// スティッキー投稿がat:// URIではない
    #[error("Invalid sticky post URI: {0}")]
    InvalidStickyPost(String),
}

/// エクスポート設定
///
/// 環境変数:
/// - HOSTNAME: フィードジェネレーターの公開ホスト名（必須）
/// - SERVICE_DID: サービスDID（デフォルト: did:web:{HOSTNAME}）
/// - FEED_URI: 公開フィードのat:// URI（必須）
/// - STICKY_POSTS: 先頭固定する投稿URI（カンマ区切り、デフォルト: なし）
/// - SNAPSHOT_OUTPUT_DIR: 出力ルート（デフォルト: _site）
/// - DB_PATH: SQLiteデータベースファイル（デフォルト: feed_database.db）
/// - FEED_TITLE: READMEの見出し（デフォルト: Feed Backup）
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    pub service_did: String,
    pub hostname: String,
    pub feed_uri: String,
    pub sticky_posts: Vec<String>,
    pub output_dir: PathBuf,
    pub db_path: PathBuf,
    pub feed_title: String,
}

impl ExportConfig {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Result<Self, ExportConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のルックアップ関数から設定を読み込み
    ///
    /// 空白のみの値は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExportConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| -> Option<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| -> Result<String, ExportConfigError> {
            get(key).ok_or_else(|| ExportConfigError::MissingEnvVar(key.to_string()))
        };

        let hostname = require("HOSTNAME")?;
        let service_did = get("SERVICE_DID").unwrap_or_else(|| format!("did:web:{}", hostname));
        let feed_uri = require("FEED_URI")?;

        let sticky_posts = get("STICKY_POSTS")
            .map(|v| parse_comma_separated(&v))
            .unwrap_or_default();
        validate_sticky_posts(&sticky_posts)?;

        let output_dir =
            get("SNAPSHOT_OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());
        let db_path = get("DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let feed_title = get("FEED_TITLE").unwrap_or_else(|| DEFAULT_FEED_TITLE.to_string());

        Ok(Self {
            service_did,
            hostname,
            feed_uri,
            sticky_posts,
            output_dir: PathBuf::from(output_dir),
            db_path: PathBuf::from(db_path),
            feed_title,
        })
    }

    /// テスト用に明示的な値で作成（パス・見出しはデフォルト）
    pub fn new(
        service_did: impl Into<String>,
        hostname: impl Into<String>,
        feed_uri: impl Into<String>,
        sticky_posts: Vec<String>,
    ) -> Self {
        Self {
            service_did: service_did.into(),
            hostname: hostname.into(),
            feed_uri: feed_uri.into(),
            sticky_posts,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            feed_title: DEFAULT_FEED_TITLE.to_string(),
        }
    }

    /// スティッキー投稿を差し替える（CLI引数による上書き用）
    pub fn replace_sticky_posts(
        &mut self,
        sticky_posts: Vec<String>,
    ) -> Result<(), ExportConfigError> {
        validate_sticky_posts(&sticky_posts)?;
        self.sticky_posts = sticky_posts;
        Ok(())
    }
}

/// スティッキー投稿がすべてat:// URIであることを確認
fn validate_sticky_posts(sticky_posts: &[String]) -> Result<(), ExportConfigError> {
    match sticky_posts.iter().find(|uri| !uri.starts_with("at://")) {
        Some(invalid) => Err(ExportConfigError::InvalidStickyPost(invalid.clone())),
        None => Ok(()),
    }
}

/// カンマ区切り文字列をパースしてVecに変換
///
/// 空白をトリムし、空文字列は除外する。
pub fn parse_comma_separated(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
