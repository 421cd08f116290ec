//! 照合パイプライン
//!
//! 問い合わせ文字列群・対象フィールド・照合方式を受け取り、
//! カタログ全件を1回だけ取得してメモリ上で絞り込む。
//!
//! ## 処理フロー
//! 1. 問い合わせが空なら即座に空の結果を返す（ストアを読まない）
//! 2. ストアから全件スナップショットを取得（失敗時はリクエスト全体がエラー）
//! 3. 各レコードの対象フィールドに述語を適用
//! 4. カタログ順を保ったまま一致したレコードを返す

use crate::catalog::CatalogStore;
use crate::error::Result;
use crate::predicate::{MatchTier, PreparedQuery};
use crate::types::{Field, ProductRecord};
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    /// 音声認識結果を断片に分ける区切り（空白・句読点）
    static ref FRAGMENT_SEPARATOR: Regex = Regex::new(r"[\s、。，．,.!?！？・「」『』()（）]+").unwrap();
}

/// 1リクエスト分の問い合わせ文字列
///
/// 順序を保持し、重複は許容する。空白のみの文字列は含めない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuerySet(Vec<String>);

impl QuerySet {
    pub fn new(queries: impl IntoIterator<Item = String>) -> Self {
        Self(
            queries
                .into_iter()
                .filter(|q| !q.trim().is_empty())
                .collect(),
        )
    }

    /// OCR結果（1行1文字列）から構築
    pub fn from_ocr_lines(text: &str) -> Self {
        Self::new(text.lines().map(|line| line.trim().to_string()))
    }

    /// 音声認識の書き起こしから構築
    ///
    /// 書き起こし全体に加えて、空白・句読点で区切った断片も問い合わせにする。
    pub fn from_transcript(transcript: &str) -> Self {
        let whole = transcript.trim();
        let fragments: Vec<&str> = FRAGMENT_SEPARATOR
            .split(whole)
            .filter(|f| !f.is_empty())
            .collect();

        let mut queries = vec![whole.to_string()];
        if fragments.len() > 1 {
            queries.extend(fragments.into_iter().map(str::to_string));
        }
        Self::new(queries)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// 別の問い合わせを後ろに連結
    pub fn extend(&mut self, other: QuerySet) {
        self.0.extend(other.0);
    }
}

/// 照合リクエスト（対象フィールド + 照合方式）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub field: Field,
    pub tier: MatchTier,
}

impl MatchRequest {
    pub fn new(field: Field, tier: MatchTier) -> Self {
        Self { field, tier }
    }
}

/// カスケード照合の結果
#[derive(Debug, Clone, Default)]
pub struct CascadeOutcome {
    /// 結果を出した照合方式（どれも一致しなければ `None`）
    pub tier: Option<MatchTier>,
    pub records: Vec<ProductRecord>,
}

/// 指定した照合方式でカタログを絞り込む
///
/// - 問い合わせが空ならストアを読まずに空の結果
/// - ストアの読み出し失敗はそのまま返す（部分的な結果は返さない）
/// - 結果はカタログ順、同じレコードは1回だけ
pub fn match_records<S>(store: &S, queries: &QuerySet, request: MatchRequest) -> Result<Vec<ProductRecord>>
where
    S: CatalogStore + ?Sized,
{
    if queries.is_empty() {
        tracing::debug!(field = %request.field, tier = %request.tier, "問い合わせが空のため照合をスキップ");
        return Ok(Vec::new());
    }

    let records = store.all_records()?;
    let total = records.len();
    let prepared = PreparedQuery::new(queries.as_slice());
    let matched = filter_records(records, &prepared, request);

    tracing::debug!(
        field = %request.field,
        tier = %request.tier,
        queries = queries.len(),
        total,
        matched = matched.len(),
        "照合完了"
    );

    Ok(matched)
}

/// 安い照合方式から順に試し、最初に一致したものを返す
///
/// ストアの読み出しは1回だけで、全方式が同じスナップショットを使う。
pub fn match_cascade<S>(store: &S, queries: &QuerySet, field: Field) -> Result<CascadeOutcome>
where
    S: CatalogStore + ?Sized,
{
    if queries.is_empty() {
        tracing::debug!(field = %field, "問い合わせが空のためカスケード照合をスキップ");
        return Ok(CascadeOutcome::default());
    }

    let records = store.all_records()?;
    let prepared = PreparedQuery::new(queries.as_slice());

    for tier in MatchTier::CASCADE {
        let mask = matching_mask(&records, &prepared, MatchRequest::new(field, tier));
        let hits = mask.iter().filter(|&&hit| hit).count();
        tracing::debug!(field = %field, tier = %tier, hits, "カスケード照合");

        if hits > 0 {
            return Ok(CascadeOutcome {
                tier: Some(tier),
                records: take_masked(records, &mask),
            });
        }
    }

    Ok(CascadeOutcome::default())
}

/// スナップショットを1つの照合方式で絞り込む
pub fn filter_records(
    records: Vec<ProductRecord>,
    prepared: &PreparedQuery<'_>,
    request: MatchRequest,
) -> Vec<ProductRecord> {
    let mask = matching_mask(&records, prepared, request);
    take_masked(records, &mask)
}

fn matching_mask(records: &[ProductRecord], prepared: &PreparedQuery<'_>, request: MatchRequest) -> Vec<bool> {
    let case_fold = request.field.case_fold();
    records
        .iter()
        .map(|record| prepared.matches(request.tier, record.field(request.field), case_fold))
        .collect()
}

fn take_masked(records: Vec<ProductRecord>, mask: &[bool]) -> Vec<ProductRecord> {
    records
        .into_iter()
        .zip(mask.iter())
        .filter(|(_, &keep)| keep)
        .map(|(record, _)| record)
        .collect()
}
