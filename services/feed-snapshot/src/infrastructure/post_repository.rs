/// 投稿ストアへの読み取り専用アクセス
///
/// エクスポーターはこのトレイト越しにストアを扱う。
/// 実装はSQLite（本番）とテスト用モックの2種類。
use thiserror::Error;

use crate::domain::PostRecord;

/// 投稿リポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PostRepositoryError {
    /// 接続に失敗（未接続での操作を含む）
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// クエリ実行に失敗
    #[error("Query execution error: {0}")]
    QueryError(String),

    /// 行の変換に失敗
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

/// 接続結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// 新たに接続した
    Connected,
    /// 既に接続済みだった（エラーではない）
    AlreadyConnected,
}

/// 投稿リポジトリトレイト
pub trait PostRepository {
    /// ストアに接続する
    ///
    /// 冪等。接続済みの場合は`ConnectOutcome::AlreadyConnected`を返す。
    fn connect(&mut self) -> Result<ConnectOutcome, PostRepositoryError>;

    /// 全投稿を取得する
    ///
    /// # 戻り値
    /// * `Ok(Vec<PostRecord>)` - indexed_at降順、cid降順でソートされた全投稿
    /// * `Err(PostRepositoryError)` - 未接続またはクエリ実行エラー
    fn fetch_all_posts(&self) -> Result<Vec<PostRecord>, PostRepositoryError>;
}

impl<R: PostRepository + ?Sized> PostRepository for Box<R> {
    fn connect(&mut self) -> Result<ConnectOutcome, PostRepositoryError> {
        (**self).connect()
    }

    fn fetch_all_posts(&self) -> Result<Vec<PostRecord>, PostRepositoryError> {
        (**self).fetch_all_posts()
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use crate::domain::sort_for_feed;
    use std::cell::RefCell;

    /// ユニットテスト用のモックPostRepository
    ///
    /// SQLiteと同じ並び順で返す。
    #[derive(Debug, Default)]
    pub struct MockPostRepository {
        posts: Vec<PostRecord>,
        connected: bool,
        /// connect時に返すエラー
        connect_error: Option<PostRepositoryError>,
        /// 次のfetch_all_postsで返すエラー
        next_fetch_error: RefCell<Option<PostRepositoryError>>,
        fetch_calls: RefCell<usize>,
        /// trueなら並べ替えずに登録順で返す
        keep_stored_order: bool,
    }

    impl MockPostRepository {
        pub fn new(posts: Vec<PostRecord>) -> Self {
            Self {
                posts,
                ..Self::default()
            }
        }

        /// 接続済み状態で作成
        pub fn already_connected(posts: Vec<PostRecord>) -> Self {
            Self {
                posts,
                connected: true,
                ..Self::default()
            }
        }

        /// 並べ替えずに登録順のまま返すモックを作成
        pub fn in_stored_order(posts: Vec<PostRecord>) -> Self {
            Self {
                posts,
                keep_stored_order: true,
                ..Self::default()
            }
        }

        pub fn with_connect_error(error: PostRepositoryError) -> Self {
            Self {
                connect_error: Some(error),
                ..Self::default()
            }
        }

        pub fn set_next_fetch_error(&self, error: PostRepositoryError) {
            *self.next_fetch_error.borrow_mut() = Some(error);
        }

        pub fn fetch_calls(&self) -> usize {
            *self.fetch_calls.borrow()
        }
    }

    impl PostRepository for MockPostRepository {
        fn connect(&mut self) -> Result<ConnectOutcome, PostRepositoryError> {
            if let Some(error) = self.connect_error.clone() {
                return Err(error);
            }
            if self.connected {
                return Ok(ConnectOutcome::AlreadyConnected);
            }
            self.connected = true;
            Ok(ConnectOutcome::Connected)
        }

        fn fetch_all_posts(&self) -> Result<Vec<PostRecord>, PostRepositoryError> {
            *self.fetch_calls.borrow_mut() += 1;

            if !self.connected {
                return Err(PostRepositoryError::ConnectionError(
                    "not connected".to_string(),
                ));
            }
            if let Some(error) = self.next_fetch_error.borrow_mut().take() {
                return Err(error);
            }

            let mut posts = self.posts.clone();
            if !self.keep_stored_order {
                sort_for_feed(&mut posts);
            }
            Ok(posts)
        }
    }
}
