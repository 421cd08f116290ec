//! カタログストアの境界
//!
//! 照合エンジンは全件スナップショットを1回取得してメモリ上で絞り込むだけで、
//! ストアへの部分検索やインデックスは要求しない。

use crate::error::{Error, Result};
use crate::types::ProductRecord;
use std::collections::HashSet;

/// 商品カタログの永続化層
///
/// `all_records` は複数スレッドから同時に呼ばれてもよいこと。
/// 1回の呼び出しの中では一貫したスナップショットを返すこと。
pub trait CatalogStore: Send + Sync {
    /// 全レコードをインポート順で取得
    fn all_records(&self) -> Result<Vec<ProductRecord>>;

    /// レコード件数
    fn count_records(&self) -> Result<usize>;

    /// レコードを追加（IDが重複する場合はエラー）
    fn insert(&mut self, record: ProductRecord) -> Result<()>;

    /// 全レコードを削除
    fn delete_all(&mut self) -> Result<()>;

    /// 変更を確定
    fn save(&mut self) -> Result<()>;
}

/// メモリ上だけのカタログ
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    records: Vec<ProductRecord>,
    ids: HashSet<String>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// レコード列から構築（IDが重複する場合はエラー）
    pub fn from_records(records: impl IntoIterator<Item = ProductRecord>) -> Result<Self> {
        let mut catalog = Self::new();
        for record in records {
            catalog.insert(record)?;
        }
        Ok(catalog)
    }

    /// インポート順のレコード列
    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }
}

impl CatalogStore for InMemoryCatalog {
    fn all_records(&self) -> Result<Vec<ProductRecord>> {
        Ok(self.records.clone())
    }

    fn count_records(&self) -> Result<usize> {
        Ok(self.records.len())
    }

    fn insert(&mut self, record: ProductRecord) -> Result<()> {
        if !self.ids.insert(record.id.clone()) {
            return Err(Error::DuplicateId(record.id));
        }
        self.records.push(record);
        Ok(())
    }

    fn delete_all(&mut self) -> Result<()> {
        self.records.clear();
        self.ids.clear();
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ProductRecord {
        ProductRecord {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_preserves_order() {
        let catalog = InMemoryCatalog::from_records(vec![record("b"), record("a"), record("c")]).unwrap();
        let ids: Vec<String> = catalog.all_records().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(catalog.count_records().unwrap(), 3);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(record("p-001")).unwrap();
        let err = catalog.insert(record("p-001")).unwrap_err();
        assert!(matches!(err, Error::DuplicateId(id) if id == "p-001"));
        assert_eq!(catalog.count_records().unwrap(), 1);
    }

    #[test]
    fn test_delete_all_allows_reimport() {
        let mut catalog = InMemoryCatalog::from_records(vec![record("p-001")]).unwrap();
        catalog.delete_all().unwrap();
        assert_eq!(catalog.count_records().unwrap(), 0);
        catalog.insert(record("p-001")).unwrap();
        assert_eq!(catalog.count_records().unwrap(), 1);
    }
}
