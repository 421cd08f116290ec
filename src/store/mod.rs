//! 永続カタログモジュール
//!
//! 商品レコードをJSONファイルに保存する `CatalogStore` 実装。
//! 読み込めないレコードは警告を出して読み飛ばし、残りのカタログは使えるようにする。

use crate::error::Result;
use cosmo_cuisine_common::{CatalogStore, Error, InMemoryCatalog, ProductRecord};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// カタログファイル（読み込み用）
#[derive(Debug, Deserialize)]
struct CatalogFile {
    version: u32,
    #[serde(default)]
    imported_at: Option<String>,
    #[serde(default)]
    source_digest: Option<String>,
    #[serde(default)]
    records: Vec<serde_json::Value>,
}

/// カタログファイル（書き込み用）
#[derive(Debug, Serialize)]
struct CatalogFileRef<'a> {
    version: u32,
    imported_at: Option<&'a str>,
    source_digest: Option<&'a str>,
    records: &'a [ProductRecord],
}

/// JSONファイルに保存されるカタログ
#[derive(Debug)]
pub struct JsonCatalogStore {
    path: PathBuf,
    catalog: InMemoryCatalog,
    imported_at: Option<String>,
    source_digest: Option<String>,
    /// 未保存の変更があるか
    dirty: bool,
    /// 読み込み時に読み飛ばしたレコード数
    skipped: usize,
}

impl JsonCatalogStore {
    const CURRENT_VERSION: u32 = 1;

    /// カタログファイルを開く
    ///
    /// ファイルが無ければ空のカタログ。ファイル全体が読めない場合は `StoreUnavailable`。
    pub fn open(path: &Path) -> Result<Self> {
        let mut store = Self {
            path: path.to_path_buf(),
            catalog: InMemoryCatalog::new(),
            imported_at: None,
            source_digest: None,
            dirty: false,
            skipped: 0,
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "カタログファイルが無いため空で開始");
            return Ok(store);
        }

        let file = File::open(path).map_err(|e| unavailable(path, e))?;
        let reader = BufReader::new(file);
        let content: CatalogFile = serde_json::from_reader(reader).map_err(|e| unavailable(path, e))?;

        if content.version != Self::CURRENT_VERSION {
            return Err(Error::StoreUnavailable(format!(
                "カタログのバージョン不一致: {} (期待値 {})",
                content.version,
                Self::CURRENT_VERSION
            ))
            .into());
        }

        for (index, value) in content.records.into_iter().enumerate() {
            let result = serde_json::from_value::<ProductRecord>(value)
                .map_err(|e| Error::MalformedRecord {
                    index,
                    reason: e.to_string(),
                })
                .and_then(|record| store.catalog.insert(record));

            if let Err(e) = result {
                tracing::warn!("レコードを読み飛ばします: {}", e);
                store.skipped += 1;
            }
        }

        store.imported_at = content.imported_at;
        store.source_digest = content.source_digest;

        tracing::debug!(
            path = %path.display(),
            records = store.catalog.records().len(),
            skipped = store.skipped,
            "カタログを読み込み"
        );

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 最後にインポートした日時（RFC 3339）
    pub fn imported_at(&self) -> Option<&str> {
        self.imported_at.as_deref()
    }

    /// 最後にインポートした元データのダイジェスト
    pub fn source_digest(&self) -> Option<&str> {
        self.source_digest.as_deref()
    }

    /// インポート元を記録（次の `save` で保存される）
    pub fn set_source(&mut self, digest: String) {
        self.source_digest = Some(digest);
        self.imported_at = Some(chrono::Utc::now().to_rfc3339());
        self.dirty = true;
    }

    /// 読み込み時に読み飛ばしたレコード数
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn has_changes(&self) -> bool {
        self.dirty
    }
}

impl CatalogStore for JsonCatalogStore {
    fn all_records(&self) -> cosmo_cuisine_common::Result<Vec<ProductRecord>> {
        self.catalog.all_records()
    }

    fn count_records(&self) -> cosmo_cuisine_common::Result<usize> {
        self.catalog.count_records()
    }

    fn insert(&mut self, record: ProductRecord) -> cosmo_cuisine_common::Result<()> {
        self.catalog.insert(record)?;
        self.dirty = true;
        Ok(())
    }

    fn delete_all(&mut self) -> cosmo_cuisine_common::Result<()> {
        self.catalog.delete_all()?;
        self.source_digest = None;
        self.imported_at = None;
        self.dirty = true;
        Ok(())
    }

    /// 変更がある場合のみ書き込む（一時ファイルに書いてから置き換える）
    fn save(&mut self) -> cosmo_cuisine_common::Result<()> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(
                writer,
                &CatalogFileRef {
                    version: Self::CURRENT_VERSION,
                    imported_at: self.imported_at.as_deref(),
                    source_digest: self.source_digest.as_deref(),
                    records: self.catalog.records(),
                },
            )?;
        }
        std::fs::rename(&tmp_path, &self.path)?;

        self.dirty = false;
        tracing::debug!(path = %self.path.display(), "カタログを保存");
        Ok(())
    }
}

fn unavailable(path: &Path, e: impl std::fmt::Display) -> Error {
    Error::StoreUnavailable(format!("{}: {}", path.display(), e))
}
