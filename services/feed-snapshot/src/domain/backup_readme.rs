// バックアップREADME
//
// 出力ルートに置く人間向けの説明。他のコンポーネントからは読まれない。

use chrono::{DateTime, SecondsFormat, Utc};

use super::snapshot_layout::Artifact;

/// README生成に必要な値
#[derive(Debug, Clone)]
pub struct ReadmeContext<'a> {
    /// 見出し（FEED_TITLE）
    pub title: &'a str,
    /// 生成日時
    pub generated_at: DateTime<Utc>,
    pub service_did: &'a str,
    pub feed_uri: &'a str,
}

/// README.mdの本文を生成
///
/// 生成日時以外は設定のみに依存するため、同じ日時を渡せば同じ出力になる。
pub fn render_backup_readme(context: &ReadmeContext<'_>) -> String {
    let generated_at = context
        .generated_at
        .to_rfc3339_opts(SecondsFormat::Secs, true);

    let endpoints = Artifact::ALL
        .into_iter()
        .filter_map(|artifact| {
            let endpoint = artifact.endpoint()?;
            let label = artifact.endpoint_label()?;
            Some(format!("- `{endpoint}` - {label}"))
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# {title}

Static backup of the `{feed_uri}` Bluesky feed.

**Generated**: {generated_at}
**Service DID**: `{service_did}`
**Purpose**: Provides historical feed data during server downtime

## Endpoints

{endpoints}

## Usage

This backup serves the same AT Protocol endpoints as the live server.
During server downtime, update your DNS to point to the static host serving this directory.

## Update Process

This is a one-time static snapshot of historical posts.
Regenerate it with `export_feed` before planned server downtime.
",
        title = context.title,
        feed_uri = context.feed_uri,
        generated_at = generated_at,
        service_did = context.service_did,
        endpoints = endpoints,
    )
}
