//! 商品画像の解決
//!
//! 画像リソース名（ファイル名）を画像フォルダ配下から探して読み込む。

use crate::error::{CosmoError, Result};
use cosmo_cuisine_common::ImageResolver;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// 画像フォルダ内のファイル名 → パスの索引
#[derive(Debug, Clone, Default)]
pub struct AssetImageResolver {
    root: PathBuf,
    index: HashMap<String, PathBuf>,
}

impl AssetImageResolver {
    /// 画像フォルダを再帰的にスキャン
    ///
    /// 同名ファイルが複数ある場合はパス順で最初のものを使う。
    pub fn scan(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(CosmoError::FolderNotFound(root.display().to_string()));
        }

        let mut index = HashMap::new();

        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name() {
                index
                    .entry(name.to_string_lossy().to_string())
                    .or_insert_with(|| path.to_path_buf());
            }
        }

        tracing::debug!(root = %root.display(), files = index.len(), "画像フォルダをスキャン");

        Ok(Self {
            root: root.to_path_buf(),
            index,
        })
    }

    /// 索引済みのファイル数
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        if let Some(path) = self.index.get(name) {
            return Some(path.clone());
        }
        // "images/foo.png" のような相対パス指定（画像フォルダの外は参照しない）
        let relative = Path::new(name);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            tracing::warn!(name, "画像フォルダ外のパスは無視します");
            return None;
        }

        let joined = self.root.join(relative);
        if !joined.is_file() {
            return None;
        }

        // シンボリックリンク経由でフォルダ外に出ていないか
        let root = std::fs::canonicalize(&self.root).ok()?;
        let resolved = std::fs::canonicalize(&joined).ok()?;
        if !resolved.starts_with(&root) {
            tracing::warn!(name, "画像フォルダ外のパスは無視します");
            return None;
        }
        Some(resolved)
    }
}

impl ImageResolver for AssetImageResolver {
    fn resolve(&self, name: &str) -> Option<Vec<u8>> {
        let path = self.locate(name)?;
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(path = %path.display(), "画像を読み込めません: {}", e);
                None
            }
        }
    }
}
