//! Cosmo Cuisine Common Library
//!
//! OCR・音声認識で得たノイズを含む文字列を、日英2言語の商品カタログと照合するエンジン。
//! ストアの実装・テキスト取得はこのクレートの外側に置く。

pub mod types;
pub mod error;
pub mod distance;
pub mod substring;
pub mod fold;
pub mod predicate;
pub mod catalog;
pub mod pipeline;

pub use types::{Field, ImageResolver, NoImages, NutritionFacts, ProductData, ProductRecord};
pub use error::{Error, Result};
pub use distance::{distance, MAX_EDIT_DISTANCE};
pub use substring::all_substrings;
pub use predicate::{MatchTier, PreparedQuery};
pub use catalog::{CatalogStore, InMemoryCatalog};
pub use rust_decimal::Decimal;
pub use pipeline::{match_cascade, match_records, CascadeOutcome, MatchRequest, QuerySet};
