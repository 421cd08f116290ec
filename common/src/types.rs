//! 商品カタログの型定義
//!
//! - ProductRecord: 照合対象の1商品（照合結果としてそのまま返される）
//! - NutritionFacts: 言語別の栄養成分（正確な10進数で保持）
//! - ProductData: カタログ元JSON（products.json）の1要素
//! - Field: 照合対象フィールドの選択子

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 栄養成分表（1言語分）
///
/// 値が無い・解釈できない成分は `None`。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionFacts {
    pub energy: Option<Decimal>,
    pub fat: Option<Decimal>,
    pub sat_fat: Option<Decimal>,
    pub trans_fat: Option<Decimal>,
    pub cholesterol: Option<Decimal>,
    pub carbs: Option<Decimal>,
    pub sugars: Option<Decimal>,
    pub fiber: Option<Decimal>,
    pub proteins: Option<Decimal>,
    pub salt: Option<Decimal>,
    pub vit_a: Option<Decimal>,
    pub vit_c: Option<Decimal>,
    pub calcium: Option<Decimal>,
    pub iron: Option<Decimal>,
}

/// 商品レコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// インポート時に割り当てられる一意なID
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_us: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_jp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_us: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_jp: Option<String>,

    #[serde(default)]
    pub nutrition_us: NutritionFacts,

    #[serde(default)]
    pub nutrition_jp: NutritionFacts,

    /// 画像（base64でシリアライズ）
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Option::is_none")]
    pub image_us: Option<Vec<u8>>,

    #[serde(default, with = "base64_bytes", skip_serializing_if = "Option::is_none")]
    pub image_jp: Option<Vec<u8>>,
}

impl ProductRecord {
    /// 指定フィールドの値を取得（未設定なら `None`）
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::BrandUs => self.brand_us.as_deref(),
            Field::BrandJp => self.brand_jp.as_deref(),
            Field::CategoryUs => self.category_us.as_deref(),
            Field::CategoryJp => self.category_jp.as_deref(),
        }
    }
}

/// 照合対象フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Field {
    BrandUs,
    #[default]
    BrandJp,
    CategoryUs,
    CategoryJp,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::BrandUs, Field::BrandJp, Field::CategoryUs, Field::CategoryJp];

    /// 編集距離の比較前に小文字化するか
    ///
    /// 英語（ラテン文字）フィールドのみ。日本語フィールドは大文字小文字の区別が無い。
    pub fn case_fold(self) -> bool {
        matches!(self, Field::BrandUs | Field::CategoryUs)
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "brand-us" | "brand" => Ok(Field::BrandUs),
            "brand-jp" | "ブランド" => Ok(Field::BrandJp),
            "category-us" | "category" => Ok(Field::CategoryUs),
            "category-jp" | "カテゴリ" => Ok(Field::CategoryJp),
            _ => Err(format!(
                "Unknown field: {}. Use brand-us, brand-jp, category-us, or category-jp",
                s
            )),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::BrandUs => write!(f, "brand-us"),
            Field::BrandJp => write!(f, "brand-jp"),
            Field::CategoryUs => write!(f, "category-us"),
            Field::CategoryJp => write!(f, "category-jp"),
        }
    }
}

/// 画像リソース名からバイト列を取得する
pub trait ImageResolver {
    fn resolve(&self, name: &str) -> Option<Vec<u8>>;
}

/// 画像を読み込まないリゾルバ
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageResolver for NoImages {
    fn resolve(&self, _name: &str) -> Option<Vec<u8>> {
        None
    }
}

/// カタログ元JSONの1商品（値はすべて文字列）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductData {
    pub id: String,
    #[serde(default)]
    pub brand_us: Option<String>,
    #[serde(default)]
    pub brand_jp: Option<String>,
    #[serde(default)]
    pub category_us: Option<String>,
    #[serde(default)]
    pub category_jp: Option<String>,
    #[serde(default)]
    pub image_us: Option<String>,
    #[serde(default)]
    pub image_jp: Option<String>,
    #[serde(default)]
    pub energy_us: Option<String>,
    #[serde(default)]
    pub energy_jp: Option<String>,
    #[serde(default)]
    pub fat_us: Option<String>,
    #[serde(default)]
    pub fat_jp: Option<String>,
    #[serde(default)]
    pub sat_fat_us: Option<String>,
    #[serde(default)]
    pub sat_fat_jp: Option<String>,
    #[serde(default)]
    pub trans_fat_us: Option<String>,
    #[serde(default)]
    pub trans_fat_jp: Option<String>,
    #[serde(default)]
    pub cholesterol_us: Option<String>,
    #[serde(default)]
    pub cholesterol_jp: Option<String>,
    #[serde(default)]
    pub carbs_us: Option<String>,
    #[serde(default)]
    pub carbs_jp: Option<String>,
    #[serde(default)]
    pub sugars_us: Option<String>,
    #[serde(default)]
    pub sugars_jp: Option<String>,
    #[serde(default)]
    pub fiber_us: Option<String>,
    #[serde(default)]
    pub fiber_jp: Option<String>,
    #[serde(default)]
    pub proteins_us: Option<String>,
    #[serde(default)]
    pub proteins_jp: Option<String>,
    #[serde(default)]
    pub salt_us: Option<String>,
    #[serde(default)]
    pub salt_jp: Option<String>,
    #[serde(default)]
    pub vit_a_us: Option<String>,
    #[serde(default)]
    pub vit_a_jp: Option<String>,
    #[serde(default)]
    pub vit_c_us: Option<String>,
    #[serde(default)]
    pub vit_c_jp: Option<String>,
    #[serde(default)]
    pub calcium_us: Option<String>,
    #[serde(default)]
    pub calcium_jp: Option<String>,
    #[serde(default)]
    pub iron_us: Option<String>,
    #[serde(default)]
    pub iron_jp: Option<String>,
}

impl ProductData {
    /// ProductRecordに変換
    ///
    /// - 空文字のテキストは未設定として扱う
    /// - 数値として解釈できない栄養成分は未設定（警告ログ）
    /// - 画像はリゾルバで解決できたものだけ保持
    pub fn into_record(self, images: &dyn ImageResolver) -> ProductRecord {
        let id = self.id.trim().to_string();
        let dec = |name: &str, raw: &Option<String>| parse_decimal(&id, name, raw.as_deref());

        let nutrition_us = NutritionFacts {
            energy: dec("energy_us", &self.energy_us),
            fat: dec("fat_us", &self.fat_us),
            sat_fat: dec("sat_fat_us", &self.sat_fat_us),
            trans_fat: dec("trans_fat_us", &self.trans_fat_us),
            cholesterol: dec("cholesterol_us", &self.cholesterol_us),
            carbs: dec("carbs_us", &self.carbs_us),
            sugars: dec("sugars_us", &self.sugars_us),
            fiber: dec("fiber_us", &self.fiber_us),
            proteins: dec("proteins_us", &self.proteins_us),
            salt: dec("salt_us", &self.salt_us),
            vit_a: dec("vit_a_us", &self.vit_a_us),
            vit_c: dec("vit_c_us", &self.vit_c_us),
            calcium: dec("calcium_us", &self.calcium_us),
            iron: dec("iron_us", &self.iron_us),
        };

        let nutrition_jp = NutritionFacts {
            energy: dec("energy_jp", &self.energy_jp),
            fat: dec("fat_jp", &self.fat_jp),
            sat_fat: dec("sat_fat_jp", &self.sat_fat_jp),
            trans_fat: dec("trans_fat_jp", &self.trans_fat_jp),
            cholesterol: dec("cholesterol_jp", &self.cholesterol_jp),
            carbs: dec("carbs_jp", &self.carbs_jp),
            sugars: dec("sugars_jp", &self.sugars_jp),
            fiber: dec("fiber_jp", &self.fiber_jp),
            proteins: dec("proteins_jp", &self.proteins_jp),
            salt: dec("salt_jp", &self.salt_jp),
            vit_a: dec("vit_a_jp", &self.vit_a_jp),
            vit_c: dec("vit_c_jp", &self.vit_c_jp),
            calcium: dec("calcium_jp", &self.calcium_jp),
            iron: dec("iron_jp", &self.iron_jp),
        };

        let image_us = non_empty(self.image_us).and_then(|name| images.resolve(&name));
        let image_jp = non_empty(self.image_jp).and_then(|name| images.resolve(&name));

        ProductRecord {
            brand_us: non_empty(self.brand_us),
            brand_jp: non_empty(self.brand_jp),
            category_us: non_empty(self.category_us),
            category_jp: non_empty(self.category_jp),
            nutrition_us,
            nutrition_jp,
            image_us,
            image_jp,
            id,
        }
    }
}

/// 前後の空白を除去し、空なら `None`
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_decimal(id: &str, name: &str, raw: Option<&str>) -> Option<Decimal> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty())?;
    match Decimal::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(id, field = name, value = raw, "栄養成分を数値として解釈できません: {}", e);
            None
        }
    }
}

/// `Option<Vec<u8>>` をbase64文字列として読み書きする
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => serializer.serialize_some(&STANDARD.encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|e| STANDARD.decode(e.as_bytes()).map_err(serde::de::Error::custom))
            .transpose()
    }
}
