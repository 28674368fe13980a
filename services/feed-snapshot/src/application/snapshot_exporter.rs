/// 静的フィードスナップショットのエクスポーター
///
/// 投稿ストアの全投稿を読み取り、フィードジェネレーターのHTTPレスポンスと
/// 同じ形のファイル群を出力ルートに書き出す。
///
/// 処理の流れ:
/// 1. ストアに接続（接続済みなら続行、それ以外の接続失敗は中断）
/// 2. 出力ディレクトリを作成
/// 3. did.json / describeFeedGenerator / getFeedSkeleton / README.md を個別に生成
///
/// 3の各成果物は独立しており、1つが失敗しても残りは生成する。
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::{
    render_backup_readme, sort_for_feed, Artifact, DescribeFeedGeneratorResponse, DidDocument,
    FeedSkeleton, ReadmeContext,
};
use crate::infrastructure::{
    ConnectOutcome, ExportConfig, PostRepository, PostRepositoryError, SnapshotWriteError,
    SnapshotWriter, WrittenFile,
};

/// 実行全体を中断するエラー
#[derive(Debug, Error)]
pub enum ExportError {
    /// ストアに接続できない（ファイルは一切書き込まない）
    #[error("ストア接続エラー: {0}")]
    StoreConnection(#[source] PostRepositoryError),

    /// 出力ディレクトリを作成できない
    #[error("出力ディレクトリエラー: {0}")]
    OutputDirectory(#[source] SnapshotWriteError),
}

/// 成果物単位のエラー（記録して次の成果物へ進む）
#[derive(Debug, Error)]
pub enum ArtifactWriteError {
    /// 投稿の取得に失敗
    #[error("投稿取得エラー: {0}")]
    Query(#[from] PostRepositoryError),

    /// ファイル出力に失敗
    #[error("{0}")]
    Write(#[from] SnapshotWriteError),
}

/// エクスポートオプション
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// 成果物ごとのログをinfoレベルで出す
    pub verbose: bool,
}

/// 書き込みに成功した成果物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    pub artifact: Artifact,
    pub path: PathBuf,
    pub bytes: usize,
}

/// 書き込みに失敗した成果物
#[derive(Debug)]
pub struct FailedArtifact {
    pub artifact: Artifact,
    pub error: ArtifactWriteError,
}

/// エクスポート結果
#[derive(Debug, Default)]
pub struct ExportReport {
    /// ストアが既に接続済みだったか
    pub already_connected: bool,
    pub written: Vec<WrittenArtifact>,
    pub failed: Vec<FailedArtifact>,
    /// フィードスケルトンの項目数（生成できた場合）
    pub feed_item_count: Option<usize>,
}

impl ExportReport {
    /// 全成果物の生成に成功したか
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// スナップショットエクスポーター
pub struct SnapshotExporter<R> {
    repository: R,
    config: ExportConfig,
    writer: SnapshotWriter,
    options: ExportOptions,
}

impl<R: PostRepository> SnapshotExporter<R> {
    /// 新しいエクスポーターを作成
    ///
    /// 出力ルートは`config.output_dir`。
    pub fn new(repository: R, config: ExportConfig, options: ExportOptions) -> Self {
        let writer = SnapshotWriter::new(config.output_dir.clone());
        Self {
            repository,
            config,
            writer,
            options,
        }
    }

    /// 出力ルート
    pub fn output_dir(&self) -> &std::path::Path {
        self.writer.root()
    }

    /// スナップショットを生成
    ///
    /// # Arguments
    /// * `generated_at` - READMEに記録する生成日時
    ///
    /// # Returns
    /// * `Ok(ExportReport)` - 接続とディレクトリ作成に成功した（個々の成果物の失敗はレポートに含む）
    /// * `Err(ExportError)` - 接続またはディレクトリ作成に失敗した
    pub fn run(&mut self, generated_at: DateTime<Utc>) -> Result<ExportReport, ExportError> {
        info!(
            output_dir = %self.writer.root().display(),
            sticky_count = self.config.sticky_posts.len(),
            "フィードエクスポートを開始"
        );

        let mut report = ExportReport::default();

        match self.repository.connect() {
            Ok(ConnectOutcome::Connected) => {
                debug!("ストアに接続");
            }
            Ok(ConnectOutcome::AlreadyConnected) => {
                info!("ストアは既に接続済み、処理を続行");
                report.already_connected = true;
            }
            Err(e) => {
                error!(error = %e, "ストア接続に失敗");
                return Err(ExportError::StoreConnection(e));
            }
        }

        self.writer.ensure_directories().map_err(|e| {
            error!(error = %e, "出力ディレクトリの作成に失敗");
            ExportError::OutputDirectory(e)
        })?;

        for artifact in Artifact::ALL {
            let result = match artifact {
                Artifact::DidDocument => self.emit_did_document(),
                Artifact::FeedDescription => self.emit_feed_description(),
                Artifact::FeedSkeleton => self.emit_feed_skeleton().map(|(written, count)| {
                    report.feed_item_count = Some(count);
                    written
                }),
                Artifact::Readme => self.emit_readme(generated_at),
            };

            match result {
                Ok(written) => {
                    let path = written.path.display();
                    let bytes = written.bytes;
                    if self.options.verbose {
                        info!(artifact = %artifact, path = %path, bytes, "成果物を書き込み");
                    } else {
                        debug!(artifact = %artifact, path = %path, bytes, "成果物を書き込み");
                    }
                    report.written.push(WrittenArtifact {
                        artifact,
                        path: written.path,
                        bytes: written.bytes,
                    });
                }
                Err(error) => {
                    warn!(artifact = %artifact, error = %error, "成果物の生成に失敗、次へ進む");
                    report.failed.push(FailedArtifact { artifact, error });
                }
            }
        }

        info!(
            written_count = report.written.len(),
            failed_count = report.failed.len(),
            feed_item_count = ?report.feed_item_count,
            "フィードエクスポート完了"
        );

        Ok(report)
    }

    fn emit_did_document(&self) -> Result<WrittenFile, ArtifactWriteError> {
        let doc = DidDocument::for_service(&self.config.service_did, &self.config.hostname);
        Ok(self.writer.write_json(Artifact::DidDocument, &doc)?)
    }

    fn emit_feed_description(&self) -> Result<WrittenFile, ArtifactWriteError> {
        let response =
            DescribeFeedGeneratorResponse::new(&self.config.service_did, &self.config.feed_uri);
        Ok(self.writer.write_json(Artifact::FeedDescription, &response)?)
    }

    /// フィードスケルトンを書き込み、項目数も返す
    fn emit_feed_skeleton(&self) -> Result<(WrittenFile, usize), ArtifactWriteError> {
        info!("ストアから投稿を取得");
        let mut posts = self.repository.fetch_all_posts()?;
        // リポジトリ実装に依らずフィード順を確定させる
        sort_for_feed(&mut posts);

        if posts.is_empty() {
            info!("投稿が見つからない、スティッキー投稿のみで生成");
        } else {
            info!(post_count = posts.len(), "投稿を取得");
        }

        let skeleton = FeedSkeleton::build(&self.config.sticky_posts, &posts);
        let written = self.writer.write_json(Artifact::FeedSkeleton, &skeleton)?;

        info!(item_count = skeleton.len(), "静的フィードを生成");
        Ok((written, skeleton.len()))
    }

    fn emit_readme(&self, generated_at: DateTime<Utc>) -> Result<WrittenFile, ArtifactWriteError> {
        let readme = render_backup_readme(&ReadmeContext {
            title: &self.config.feed_title,
            generated_at,
            service_did: &self.config.service_did,
            feed_uri: &self.config.feed_uri,
        });
        Ok(self.writer.write_text(Artifact::Readme, &readme)?)
    }
}
