/// フィード静的バックアップ生成スクリプト
///
/// フィードジェネレーターのSQLiteデータベースから全投稿を読み取り、
/// 静的ホスティング（GitHub Pages等）でそのまま配信できるファイル群を生成する。
///
/// # 環境変数
/// - HOSTNAME: フィードジェネレーターの公開ホスト名（必須）
/// - FEED_URI: 公開フィードのat:// URI（必須）
/// - SERVICE_DID: サービスDID（デフォルト: did:web:{HOSTNAME}）
/// - STICKY_POSTS: 先頭固定する投稿URI（カンマ区切り）
/// - SNAPSHOT_OUTPUT_DIR: 出力ルート（デフォルト: _site）
/// - DB_PATH: SQLiteデータベースファイル（デフォルト: feed_database.db）
/// - FEED_TITLE: READMEの見出し
/// - SOURCE_DATE_EPOCH: READMEに記録する生成日時（UNIX秒、--generated-atが優先）
/// - RUST_LOG: ログレベル（デフォルト: info、--verbose時はdebug）
///
/// # ローカル実行
/// ```bash
/// export HOSTNAME=feed.example.com
/// export FEED_URI=at://did:plc:xxx/app.bsky.feed.generator/mlsb
///
/// cargo run --bin export_feed
///
/// # 出力先とスティッキー投稿を指定
/// cargo run --bin export_feed -- --output-dir docs \
///     --sticky-post at://did:plc:xxx/app.bsky.feed.post/3leve7zx2zk2r
///
/// # 生成日時を固定（同じストアなら毎回同じバイト列になる）
/// cargo run --bin export_feed -- --generated-at 2025-07-01T00:00:00Z
/// ```
///
/// # 終了コード
/// 接続・ディレクトリ作成・4つの成果物すべてに成功した場合のみ0。
/// いずれかの成果物が失敗した場合も残りは生成した上で1を返す。
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::Parser;
use feed_snapshot::application::{ExportError, ExportOptions, ExportReport, SnapshotExporter};
use feed_snapshot::infrastructure::{
    init_logging, ExportConfig, ExportConfigError, LogFormat, SqlitePostRepository,
};
use thiserror::Error;
use tracing::{error, info, warn};

/// コマンドライン引数
#[derive(Parser, Debug)]
#[command(name = "export_feed")]
#[command(about = "フィードデータを静的JSONファイルとしてエクスポート")]
struct CliArgs {
    /// 出力ルート（SNAPSHOT_OUTPUT_DIRより優先）
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// SQLiteデータベースファイル（DB_PATHより優先）
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// 先頭固定する投稿URI（複数指定可、STICKY_POSTSを置き換える）
    #[arg(long = "sticky-post", short = 's')]
    sticky_posts: Vec<String>,

    /// READMEに記録する生成日時（RFC 3339、SOURCE_DATE_EPOCHより優先）
    #[arg(long)]
    generated_at: Option<DateTime<Utc>>,

    /// 成果物ごとの詳細ログを出力
    #[arg(long, short = 'v')]
    verbose: bool,

    /// ログ出力形式
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

/// 生成日時の決定エラー
#[derive(Debug, Error, PartialEq, Eq)]
enum GeneratedAtError {
    #[error("SOURCE_DATE_EPOCHが不正: {0:?}")]
    InvalidSourceDateEpoch(String),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    init_logging(args.log_format, args.verbose);
    info!("フィードエクスポートを起動");

    if run(&args) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// エクスポートを実行し、成功したかを返す
fn run(args: &CliArgs) -> bool {
    let config = match load_config(args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "設定読み込み失敗");
            return false;
        }
    };

    let source_date_epoch = std::env::var("SOURCE_DATE_EPOCH").ok();
    let generated_at =
        match resolve_generated_at(args.generated_at, source_date_epoch.as_deref(), Utc::now()) {
            Ok(generated_at) => generated_at,
            Err(e) => {
                error!(error = %e, "生成日時の決定に失敗");
                return false;
            }
        };

    info!(
        service_did = %config.service_did,
        hostname = %config.hostname,
        feed_uri = %config.feed_uri,
        db_path = %config.db_path.display(),
        output_dir = %config.output_dir.display(),
        sticky_count = config.sticky_posts.len(),
        generated_at = %generated_at,
        "設定読み込み完了"
    );

    let repository = SqlitePostRepository::new(config.db_path.clone());
    let mut exporter = SnapshotExporter::new(
        repository,
        config,
        ExportOptions {
            verbose: args.verbose,
        },
    );

    let result = exporter.run(generated_at);
    log_outcome(&result, exporter.output_dir());
    export_succeeded(&result)
}

/// 終了コードの判定
///
/// 接続・ディレクトリ作成・全成果物の生成に成功した場合のみtrue。
fn export_succeeded(result: &Result<ExportReport, ExportError>) -> bool {
    matches!(result, Ok(report) if report.is_complete())
}

fn log_outcome(result: &Result<ExportReport, ExportError>, output_dir: &Path) {
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "フィードエクスポートに失敗");
            return;
        }
    };

    if !report.is_complete() {
        for failed in &report.failed {
            warn!(artifact = %failed.artifact, error = %failed.error, "生成できなかった成果物");
        }
        error!(
            failed_count = report.failed.len(),
            output_dir = %output_dir.display(),
            "一部の成果物を生成できなかった"
        );
        return;
    }

    info!(output_dir = %output_dir.display(), "エクスポート完了");
    info!("次の手順: 1. 生成したファイルをコミットしてpushする");
    info!("次の手順: 2. 出力ディレクトリを公開元としてGitHub Pagesを有効にする");
    info!("次の手順: 3. ダウンタイム中はDNSをGitHub Pagesに向ける");
}

/// READMEに記録する生成日時を決める
///
/// 優先順位: `--generated-at` > `SOURCE_DATE_EPOCH` > 現在時刻
fn resolve_generated_at(
    flag: Option<DateTime<Utc>>,
    source_date_epoch: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, GeneratedAtError> {
    if let Some(generated_at) = flag {
        return Ok(generated_at);
    }

    match source_date_epoch.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| GeneratedAtError::InvalidSourceDateEpoch(raw.to_string())),
        None => Ok(now),
    }
}

/// 環境変数から設定を読み込み、コマンドライン引数で上書きする
fn load_config(args: &CliArgs) -> Result<ExportConfig, ExportConfigError> {
    let mut config = ExportConfig::from_env()?;

    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(db_path) = &args.db_path {
        config.db_path = db_path.clone();
    }
    if !args.sticky_posts.is_empty() {
        config.replace_sticky_posts(args.sticky_posts.clone())?;
    }

    Ok(config)
}
