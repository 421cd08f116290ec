//! マスタ照合モジュール
//!
//! CLIの照合モード（カスケード / 方式指定）を照合エンジンに振り分け、
//! 表示用のページングと一括照合を提供する。

pub mod types;

pub use types::{BatchRequest, BatchResult, ProductSummary};

use crate::error::{CosmoError, Result};
use cosmo_cuisine_common::{
    match_cascade, match_records, CatalogStore, Field, MatchRequest, MatchTier, ProductRecord, QuerySet,
};
use rayon::prelude::*;
use std::path::Path;
use std::str::FromStr;

/// 照合モード
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// 安い方式から順に試す
    #[default]
    Auto,
    /// 指定した方式のみ
    Tier(MatchTier),
}

impl From<Option<MatchTier>> for MatchMode {
    fn from(tier: Option<MatchTier>) -> Self {
        tier.map_or(MatchMode::Auto, MatchMode::Tier)
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" | "cascade" => Ok(MatchMode::Auto),
            other => other.parse::<MatchTier>().map(MatchMode::Tier),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Auto => write!(f, "auto"),
            MatchMode::Tier(tier) => write!(f, "{}", tier),
        }
    }
}

/// 照合結果
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// 結果を出した照合方式（一致なしなら `None`）
    pub tier: Option<MatchTier>,
    pub records: Vec<ProductRecord>,
}

/// 1リクエストを照合
pub fn run_match<S>(store: &S, queries: &QuerySet, field: Field, mode: MatchMode) -> Result<MatchOutcome>
where
    S: CatalogStore + ?Sized,
{
    match mode {
        MatchMode::Auto => {
            let outcome = match_cascade(store, queries, field)?;
            Ok(MatchOutcome {
                tier: outcome.tier,
                records: outcome.records,
            })
        }
        MatchMode::Tier(tier) => {
            let records = match_records(store, queries, MatchRequest::new(field, tier))?;
            Ok(MatchOutcome {
                tier: (!records.is_empty()).then_some(tier),
                records,
            })
        }
    }
}

/// 1始まりのページを切り出す（`page_size` が0なら全件）
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return items;
    }
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

/// ページ数
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 || len == 0 {
        return 1;
    }
    len.div_ceil(page_size)
}

/// 一括照合リクエストをファイルから読み込み
pub fn load_batch(path: &Path) -> Result<Vec<BatchRequest>> {
    if !path.exists() {
        return Err(CosmoError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| CosmoError::InvalidRequest(e.to_string()))
}

/// 一括照合（リクエストごとに並列実行）
///
/// 各リクエストは独立しており、1件の失敗は他のリクエストに影響しない。
pub fn run_batch<S>(store: &S, requests: &[BatchRequest], default_field: Field) -> Vec<BatchResult>
where
    S: CatalogStore + ?Sized,
{
    requests
        .par_iter()
        .enumerate()
        .map(|(index, request)| {
            let field = request.field.unwrap_or(default_field);
            let mut queries = QuerySet::new(request.queries.iter().cloned());
            if let Some(transcript) = &request.transcript {
                queries.extend(QuerySet::from_transcript(transcript));
            }

            match run_match(store, &queries, field, MatchMode::from(request.tier)) {
                Ok(outcome) => BatchResult {
                    index,
                    field,
                    tier: outcome.tier,
                    matches: outcome.records.iter().map(ProductSummary::from).collect(),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!(index, "一括照合の失敗: {}", e);
                    BatchResult {
                        index,
                        field,
                        tier: None,
                        matches: Vec::new(),
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect()
}
