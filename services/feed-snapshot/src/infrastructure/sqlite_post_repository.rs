//! SQLite投稿リポジトリ
//!
//! フィードジェネレーターが書き込むSQLiteデータベースのpostテーブルを
//! 読み取り専用で開き、全投稿をフィード表示順で取得する。

use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use super::post_repository::{ConnectOutcome, PostRepository, PostRepositoryError};
use crate::domain::{sort_for_feed, PostRecord};

/// 全投稿を取得するSQL
///
/// ORDER BYはテキスト比較のため、indexed_atの形式が混在すると時刻順にならない。
/// 最終的な並び順は取得後に`sort_for_feed`で決める。
const SELECT_ALL_POSTS_SQL: &str =
    "SELECT uri, cid, indexed_at FROM post ORDER BY indexed_at DESC, cid DESC";

/// SQLite投稿リポジトリ
pub struct SqlitePostRepository {
    /// データベースファイルのパス
    db_path: PathBuf,
    /// connect後に保持する読み取り専用接続
    conn: Option<Connection>,
}

impl SqlitePostRepository {
    /// 新しいSqlitePostRepositoryを作成
    ///
    /// この時点ではファイルを開かない。`connect`で接続する。
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            conn: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// 1行をPostRecordに変換（内部用）
    fn row_to_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<PostRecord> {
        let uri: String = row.get(0)?;
        let cid: String = row.get(1)?;
        let raw = row.get_ref(2)?;
        let indexed_at = parse_indexed_at(raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                raw.data_type(),
                format!("unsupported indexed_at value: {}", describe_value(raw)).into(),
            )
        })?;
        Ok(PostRecord {
            uri,
            cid,
            indexed_at,
        })
    }
}

impl PostRepository for SqlitePostRepository {
    fn connect(&mut self) -> Result<ConnectOutcome, PostRepositoryError> {
        if self.conn.is_some() {
            return Ok(ConnectOutcome::AlreadyConnected);
        }

        // 読み取り専用で開く（ファイルが存在しない場合は作成せずにエラー）
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.db_path, flags).map_err(|e| {
            PostRepositoryError::ConnectionError(format!("{}: {}", self.db_path.display(), e))
        })?;

        self.conn = Some(conn);
        Ok(ConnectOutcome::Connected)
    }

    fn fetch_all_posts(&self) -> Result<Vec<PostRecord>, PostRepositoryError> {
        let conn = self.conn.as_ref().ok_or_else(|| {
            PostRepositoryError::ConnectionError("database is not connected".to_string())
        })?;

        let mut stmt = conn
            .prepare(SELECT_ALL_POSTS_SQL)
            .map_err(|e| PostRepositoryError::QueryError(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_post)
            .map_err(|e| PostRepositoryError::QueryError(e.to_string()))?;

        // 1行でも変換できなければ全体を失敗にする（欠けたスナップショットを出さない）
        let mut posts = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PostRepositoryError::DeserializationError(e.to_string()))?;

        sort_for_feed(&mut posts);
        Ok(posts)
    }
}

/// indexed_atカラムの値を日時に変換
///
/// 受け付ける形式:
/// - テキスト: `YYYY-MM-DD HH:MM:SS[.ffffff]`、区切りが`T`のもの、
///   末尾にオフセット（`+09:00`や`Z`）が付くもの（UTCに換算）
/// - 整数: UNIXタイムスタンプ（秒）
/// - 実数: UNIXタイムスタンプ（秒、小数部はナノ秒まで）
pub fn parse_indexed_at(value: ValueRef<'_>) -> Option<NaiveDateTime> {
    match value {
        ValueRef::Integer(secs) => DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc()),
        ValueRef::Real(secs) if secs.is_finite() => {
            let whole = secs.floor();
            let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
            DateTime::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
        }
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| parse_indexed_at_text(text.trim())),
        _ => None,
    }
}

fn parse_indexed_at_text(text: &str) -> Option<NaiveDateTime> {
    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
    const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt);
    }

    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(text).ok())
        .map(|dt| dt.naive_utc())
}

/// エラーメッセージ用に値を文字列化
fn describe_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) => format!("{:?}", String::from_utf8_lossy(bytes)),
        ValueRef::Blob(bytes) => format!("<{} byte blob>", bytes.len()),
    }
}
