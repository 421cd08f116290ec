//! カタログインポートモジュール
//!
//! products.json（`{"products": [...]}`）を読み込み、カタログを全件入れ替える。
//!
//! ## 処理フロー
//! 1. 元データのダイジェストを比較（変更が無ければスキップ）
//! 2. JSONを解析（ここで失敗した場合は既存カタログに触れない）
//! 3. 既存レコードを全削除
//! 4. 1件ずつ追加（不正な商品は警告して読み飛ばす）
//! 5. インポート元を記録して1回だけ保存

pub mod assets;

pub use assets::AssetImageResolver;

use crate::error::{CosmoError, Result};
use crate::store::JsonCatalogStore;
use cosmo_cuisine_common::{CatalogStore, Error as CatalogError, ImageResolver, ProductData, ProductRecord};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::Path;

/// インポート結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// 元データの商品数
    pub total: usize,
    /// 追加できた商品数
    pub inserted: usize,
    /// 読み飛ばした商品数
    pub skipped: usize,
    /// インポート後のカタログ件数
    pub count: usize,
    /// 元データが前回と同じためインポートしなかった
    pub unchanged: bool,
}

/// 元データのSHA-256（16進）
pub fn source_digest(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

/// ファイルからカタログをインポート
///
/// `force` が偽で、前回と同じ内容ならストアを変更しない。
pub fn import_file(
    store: &mut JsonCatalogStore,
    source: &Path,
    images: &dyn ImageResolver,
    force: bool,
    on_progress: impl FnMut(usize, usize),
) -> Result<ImportSummary> {
    if !source.exists() {
        return Err(CosmoError::FileNotFound(source.display().to_string()));
    }

    let content = std::fs::read_to_string(source)?;
    let digest = source_digest(content.as_bytes());

    if !force && store.source_digest() == Some(digest.as_str()) {
        let count = store.count_records()?;
        tracing::info!(source = %source.display(), count, "カタログは最新のためインポートをスキップ");
        return Ok(ImportSummary {
            count,
            unchanged: true,
            ..Default::default()
        });
    }

    let summary = import_products(store, &content, images, on_progress)?;

    store.set_source(digest);
    store.save()?;

    Ok(summary)
}

/// JSON文字列からカタログを全件入れ替え
///
/// 保存はしない。呼び出し側が `save` で確定する。
pub fn import_products<S>(
    store: &mut S,
    content: &str,
    images: &dyn ImageResolver,
    mut on_progress: impl FnMut(usize, usize),
) -> Result<ImportSummary>
where
    S: CatalogStore + ?Sized,
{
    let root: serde_json::Value = serde_json::from_str(content)?;
    let products = root
        .get("products")
        .and_then(|v| v.as_array())
        .ok_or_else(|| CosmoError::InvalidCatalog("'products' 配列がありません".into()))?;

    store.delete_all()?;

    let total = products.len();
    let mut summary = ImportSummary {
        total,
        ..Default::default()
    };

    for (index, value) in products.iter().enumerate() {
        match decode_product(index, value, images) {
            Ok(record) => match store.insert(record) {
                Ok(()) => summary.inserted += 1,
                Err(e) => {
                    tracing::warn!(index, "商品を追加できません: {}", e);
                    summary.skipped += 1;
                }
            },
            Err(e) => {
                tracing::warn!(index, "商品を読み飛ばします: {}", e);
                summary.skipped += 1;
            }
        }

        on_progress(index + 1, total);
    }

    summary.count = store.count_records()?;

    tracing::info!(
        total = summary.total,
        inserted = summary.inserted,
        skipped = summary.skipped,
        count = summary.count,
        "カタログをインポート"
    );

    Ok(summary)
}

fn decode_product(
    index: usize,
    value: &serde_json::Value,
    images: &dyn ImageResolver,
) -> cosmo_cuisine_common::Result<ProductRecord> {
    let data = ProductData::deserialize(value).map_err(|e| CatalogError::MalformedRecord {
        index,
        reason: e.to_string(),
    })?;

    if data.id.trim().is_empty() {
        return Err(CatalogError::MalformedRecord {
            index,
            reason: "id が空です".into(),
        });
    }

    Ok(data.into_record(images))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmo_cuisine_common::NoImages;
    use tempfile::tempdir;

    const PRODUCTS: &str = r#"{"products": [{"id": "p-001", "brand_jp": "ポッキー"}]}"#;

    #[test]
    fn test_import_products_leaves_saving_to_caller() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let mut store = JsonCatalogStore::open(&path).unwrap();

        let summary = import_products(&mut store, PRODUCTS, &NoImages, |_, _| {}).unwrap();
        assert_eq!(summary.count, 1);
        assert!(store.has_changes());
        assert!(!path.exists());
    }

    #[test]
    fn test_import_file_writes_catalog_with_digest() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("products.json");
        std::fs::write(&source, PRODUCTS).unwrap();
        let path = dir.path().join("catalog.json");

        let mut store = JsonCatalogStore::open(&path).unwrap();
        import_file(&mut store, &source, &NoImages, false, |_, _| {}).unwrap();
        assert!(!store.has_changes());

        let reopened = JsonCatalogStore::open(&path).unwrap();
        assert_eq!(reopened.count_records().unwrap(), 1);
        assert_eq!(reopened.source_digest(), Some(source_digest(PRODUCTS.as_bytes()).as_str()));
    }
}
