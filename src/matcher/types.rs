use cosmo_cuisine_common::{Field, MatchTier, ProductRecord};
use serde::{Deserialize, Serialize};

/// 照合結果の表示用サマリ（画像・栄養成分を除く）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_us: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_jp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_us: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_jp: Option<String>,
}

impl From<&ProductRecord> for ProductSummary {
    fn from(record: &ProductRecord) -> Self {
        Self {
            id: record.id.clone(),
            brand_us: record.brand_us.clone(),
            brand_jp: record.brand_jp.clone(),
            category_us: record.category_us.clone(),
            category_jp: record.category_jp.clone(),
        }
    }
}

impl std::fmt::Display for ProductSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{}  {} / {}  [{} / {}]",
            self.id,
            or_dash(&self.brand_jp),
            or_dash(&self.brand_us),
            or_dash(&self.category_jp),
            or_dash(&self.category_us),
        )
    }
}

/// 一括照合の1リクエスト
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchRequest {
    /// 問い合わせ文字列（OCR結果など）
    pub queries: Vec<String>,
    /// 音声認識の書き起こし（断片に分けて問い合わせに追加）
    pub transcript: Option<String>,
    /// 対象フィールド（省略時は既定値）
    pub field: Option<Field>,
    /// 照合方式（省略時はカスケード）
    pub tier: Option<MatchTier>,
}

/// 一括照合の1結果
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub index: usize,
    pub field: Field,
    /// 結果を出した照合方式
    pub tier: Option<MatchTier>,
    pub matches: Vec<ProductSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
