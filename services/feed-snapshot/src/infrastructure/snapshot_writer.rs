// スナップショット書き込み
//
// 出力ルート配下の固定パスに成果物を書き込む。
// JSONは差分を取りやすいよう2スペースインデント + 末尾改行で出力する。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::Artifact;

/// 書き込みエラー
#[derive(Debug, Error)]
pub enum SnapshotWriteError {
    /// ディレクトリ作成に失敗
    #[error("ディレクトリ作成エラー: {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSONシリアライズに失敗
    #[error("JSONシリアライズエラー: {0}")]
    Serialize(#[from] serde_json::Error),

    /// ファイル書き込みに失敗
    #[error("ファイル書き込みエラー: {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 書き込んだファイルの情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub bytes: usize,
}

/// スナップショット書き込み
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    /// 出力ルート
    root: PathBuf,
}

impl SnapshotWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 出力ルート
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 成果物の出力先パス
    pub fn path_for(&self, artifact: Artifact) -> PathBuf {
        self.root.join(artifact.relative_path())
    }

    /// 必要なディレクトリをすべて作成する
    ///
    /// 冪等。既に存在していてもエラーにしない。
    pub fn ensure_directories(&self) -> Result<(), SnapshotWriteError> {
        let dirs = std::iter::once(self.root.clone()).chain(
            Artifact::ALL
                .into_iter()
                .filter_map(|artifact| artifact.relative_dir())
                .map(|dir| self.root.join(dir)),
        );

        for dir in dirs {
            fs::create_dir_all(&dir).map_err(|source| SnapshotWriteError::CreateDirectory {
                path: dir.clone(),
                source,
            })?;
            debug!(path = %dir.display(), "ディレクトリを確認");
        }

        Ok(())
    }

    /// 値をJSONとして書き込む（既存ファイルは上書き）
    pub fn write_json<T: Serialize>(
        &self,
        artifact: Artifact,
        value: &T,
    ) -> Result<WrittenFile, SnapshotWriteError> {
        let mut content = serde_json::to_string_pretty(value)?;
        content.push('\n');
        self.write_text(artifact, &content)
    }

    /// テキストを書き込む（既存ファイルは上書き）
    pub fn write_text(
        &self,
        artifact: Artifact,
        content: &str,
    ) -> Result<WrittenFile, SnapshotWriteError> {
        let path = self.path_for(artifact);

        fs::write(&path, content).map_err(|source| SnapshotWriteError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(WrittenFile {
            path,
            bytes: content.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_directories_creates_layout() {
        let dir = tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path().join("_site"));

        writer.ensure_directories().unwrap();

        assert!(dir.path().join("_site/.well-known").is_dir());
        assert!(dir
            .path()
            .join("_site/xrpc/app.bsky.feed.describeFeedGenerator")
            .is_dir());
        assert!(dir
            .path()
            .join("_site/xrpc/app.bsky.feed.getFeedSkeleton")
            .is_dir());
    }

    #[test]
    fn test_ensure_directories_is_idempotent() {
        let dir = tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path());

        writer.ensure_directories().unwrap();
        writer.ensure_directories().unwrap();
    }

    #[test]
    fn test_ensure_directories_fails_when_root_is_file() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("occupied");
        fs::write(&root, "not a directory").unwrap();
        let writer = SnapshotWriter::new(&root);

        let result = writer.ensure_directories();

        assert!(matches!(
            result,
            Err(SnapshotWriteError::CreateDirectory { .. })
        ));
    }

    #[test]
    fn test_write_json_is_pretty_printed_with_two_spaces() {
        let dir = tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path());
        writer.ensure_directories().unwrap();

        let written = writer
            .write_json(
                Artifact::FeedSkeleton,
                &serde_json::json!({"feed": [{"post": "at://a"}]}),
            )
            .unwrap();

        let content = fs::read_to_string(&written.path).unwrap();
        assert_eq!(
            content,
            "{\n  \"feed\": [\n    {\n      \"post\": \"at://a\"\n    }\n  ]\n}\n"
        );
        assert_eq!(written.bytes, content.len());
        assert_eq!(
            written.path,
            dir.path()
                .join("xrpc/app.bsky.feed.getFeedSkeleton/index.json")
        );
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path());
        writer.ensure_directories().unwrap();

        writer.write_text(Artifact::Readme, "first version, longer").unwrap();
        writer.write_text(Artifact::Readme, "second").unwrap();

        let content = fs::read_to_string(dir.path().join("README.md")).unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn test_write_without_directories_fails() {
        let dir = tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path());

        let result = writer.write_text(Artifact::DidDocument, "{}");

        assert!(matches!(result, Err(SnapshotWriteError::Write { .. })));
    }
}
