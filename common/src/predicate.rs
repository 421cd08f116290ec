//! 照合述語
//!
//! 1つのフィールド値と問い合わせ文字列群から、レコードを採用するかを判定する。
//! 未設定・空のフィールド値はどの述語でも一致しない。

use crate::distance::{graphemes, within, MAX_EDIT_DISTANCE};
use crate::fold::{fold, lowercase};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

/// 照合方式（コストの低い順）
///
/// JSON・CLI・表示で同じ表記（`exact`, `contains`, `substring`, `edit`, `substring-edit`）を使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MatchTier {
    /// 問い合わせ文字列のいずれかと完全一致
    Exact,
    /// 問い合わせ文字列のいずれかを含む（大文字小文字・濁点等を無視）
    Contains,
    /// 問い合わせ文字列の部分文字列のいずれかと完全一致
    SubstringEquality,
    /// 問い合わせ文字列のいずれかとの編集距離が1以下
    EditDistance,
    /// 問い合わせ文字列の部分文字列のいずれかとの編集距離が1以下
    SubstringEditDistance,
}

impl MatchTier {
    /// カスケード照合で試す順
    pub const CASCADE: [MatchTier; 5] = [
        MatchTier::Exact,
        MatchTier::Contains,
        MatchTier::SubstringEquality,
        MatchTier::EditDistance,
        MatchTier::SubstringEditDistance,
    ];
}

impl FromStr for MatchTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "exact" => Ok(MatchTier::Exact),
            "contains" => Ok(MatchTier::Contains),
            "substring" | "substring-equality" => Ok(MatchTier::SubstringEquality),
            "edit" | "edit-distance" | "fuzzy" => Ok(MatchTier::EditDistance),
            "substring-edit" | "substring-edit-distance" => Ok(MatchTier::SubstringEditDistance),
            _ => Err(format!(
                "Unknown tier: {}. Use exact, contains, substring, edit, or substring-edit",
                s
            )),
        }
    }
}

impl TryFrom<String> for MatchTier {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MatchTier> for String {
    fn from(tier: MatchTier) -> Self {
        tier.to_string()
    }
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchTier::Exact => write!(f, "exact"),
            MatchTier::Contains => write!(f, "contains"),
            MatchTier::SubstringEquality => write!(f, "substring"),
            MatchTier::EditDistance => write!(f, "edit"),
            MatchTier::SubstringEditDistance => write!(f, "substring-edit"),
        }
    }
}

/// 1リクエスト分に前処理した問い合わせ
///
/// 正規化キーと書記素列はここで1度だけ作る。
#[derive(Debug)]
pub struct PreparedQuery<'q> {
    queries: &'q [String],
    lowered: Vec<String>,
    folded: Vec<String>,
    graphemes: Vec<Vec<&'q str>>,
}

impl<'q> PreparedQuery<'q> {
    pub fn new(queries: &'q [String]) -> Self {
        Self {
            queries,
            lowered: queries.iter().map(|q| lowercase(q)).collect(),
            folded: queries
                .iter()
                .map(|q| fold(q))
                .filter(|q| !q.is_empty())
                .collect(),
            graphemes: queries.iter().map(|q| graphemes(q)).collect(),
        }
    }

    pub fn queries(&self) -> &[String] {
        self.queries
    }

    /// フィールド値が一致するか
    ///
    /// `case_fold` が真なら編集距離の比較前に両辺を小文字化する。
    pub fn matches(&self, tier: MatchTier, value: Option<&str>, case_fold: bool) -> bool {
        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ => return false,
        };

        match tier {
            MatchTier::Exact => self.queries.iter().any(|q| q == value),
            MatchTier::Contains => {
                let folded_value = fold(value);
                self.folded.iter().any(|q| folded_value.contains(q.as_str()))
            }
            MatchTier::SubstringEquality => {
                let value_graphemes = graphemes(value);
                self.graphemes
                    .iter()
                    .any(|q| contains_window(q, value_graphemes.len(), value))
            }
            MatchTier::EditDistance => {
                let (value, queries) = self.distance_operands(value, case_fold);
                let value = graphemes(&value);
                queries
                    .iter()
                    .any(|q| within(&value, &graphemes(q), MAX_EDIT_DISTANCE))
            }
            MatchTier::SubstringEditDistance => {
                let (value, queries) = self.distance_operands(value, case_fold);
                let value = graphemes(&value);
                queries
                    .iter()
                    .any(|q| any_substring_within(&value, &graphemes(q), MAX_EDIT_DISTANCE))
            }
        }
    }

    fn distance_operands<'v>(&self, value: &'v str, case_fold: bool) -> (Cow<'v, str>, &[String]) {
        if case_fold {
            (Cow::Owned(lowercase(value)), self.lowered.as_slice())
        } else {
            (Cow::Borrowed(value), self.queries)
        }
    }
}

/// 長さ `len` の窓のいずれかが `value` と等しいか
fn contains_window(query: &[&str], len: usize, value: &str) -> bool {
    len > 0 && query.windows(len).any(|window| window.concat() == value)
}

/// `query` のいずれかの部分文字列と `value` の距離が `max` 以下か
///
/// 長さが `value` ± `max` の範囲外の部分文字列は距離が必ず `max` を超えるので列挙しない。
fn any_substring_within(value: &[&str], query: &[&str], max: usize) -> bool {
    let n = query.len();
    let min_len = value.len().saturating_sub(max).max(1);
    let max_len = (value.len() + max).min(n);

    (min_len..=max_len).any(|len| {
        query
            .windows(len)
            .any(|window| within(value, window, max))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::distance;
    use crate::substring::all_substrings;
    use proptest::prelude::*;

    fn q(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact() {
        let queries = q(&["ポッキー", "グリコ"]);
        let prepared = PreparedQuery::new(&queries);
        assert!(prepared.matches(MatchTier::Exact, Some("ポッキー"), false));
        assert!(!prepared.matches(MatchTier::Exact, Some("ポッキーチョコ"), false));
    }

    #[test]
    fn test_absent_or_empty_never_matches() {
        let queries = q(&["ポッキー", ""]);
        let prepared = PreparedQuery::new(&queries);
        for tier in MatchTier::CASCADE {
            assert!(!prepared.matches(tier, None, false), "{} matched None", tier);
            assert!(!prepared.matches(tier, Some(""), true), "{} matched empty", tier);
        }
    }

    #[test]
    fn test_contains_case_and_diacritic_insensitive() {
        let queries = q(&["pocky", "CRÈME"]);
        let prepared = PreparedQuery::new(&queries);
        assert!(prepared.matches(MatchTier::Contains, Some("Glico Pocky Sticks"), false));
        assert!(prepared.matches(MatchTier::Contains, Some("creme brulee"), false));
        assert!(!prepared.matches(MatchTier::Contains, Some("Pretz"), false));
    }

    #[test]
    fn test_contains_is_one_directional() {
        // フィールド値が問い合わせを含む場合のみ一致
        let queries = q(&["Tasty Pocky Sticks"]);
        let prepared = PreparedQuery::new(&queries);
        assert!(!prepared.matches(MatchTier::Contains, Some("Pocky"), false));
        assert!(prepared.matches(MatchTier::Contains, Some("Glico Tasty Pocky Sticks"), false));
    }

    #[test]
    fn test_substring_equality() {
        let queries = q(&["新商品ポッキー極細"]);
        let prepared = PreparedQuery::new(&queries);
        assert!(prepared.matches(MatchTier::SubstringEquality, Some("ポッキー"), false));
        assert!(!prepared.matches(MatchTier::SubstringEquality, Some("プリッツ"), false));
        assert!(!prepared.matches(MatchTier::Exact, Some("ポッキー"), false));
    }

    #[test]
    fn test_edit_distance_threshold() {
        let snaks = q(&["Snaks"]);
        let snaxs = q(&["Snaxs"]);
        assert!(PreparedQuery::new(&snaks).matches(MatchTier::EditDistance, Some("Snacks"), true));
        assert!(!PreparedQuery::new(&snaxs).matches(MatchTier::EditDistance, Some("Snacks"), true));
    }

    #[test]
    fn test_edit_distance_case_fold() {
        let queries = q(&["SNACKS"]);
        let prepared = PreparedQuery::new(&queries);
        assert!(prepared.matches(MatchTier::EditDistance, Some("Snacks"), true));
        assert!(!prepared.matches(MatchTier::EditDistance, Some("Snacks"), false));
    }

    #[test]
    fn test_substring_edit_distance() {
        // OCR行の中に1文字誤認識したブランド名が埋もれている
        let queries = q(&["期間限定ボッキー極細"]);
        let prepared = PreparedQuery::new(&queries);
        assert!(prepared.matches(MatchTier::SubstringEditDistance, Some("ポッキー"), false));
        assert!(!prepared.matches(MatchTier::EditDistance, Some("ポッキー"), false));
        assert!(!prepared.matches(MatchTier::SubstringEditDistance, Some("トッポ"), false));
    }

    #[test]
    fn test_substring_edit_distance_short_value() {
        // 1文字の値は任意の1文字と距離1以下
        let queries = q(&["あいう"]);
        let prepared = PreparedQuery::new(&queries);
        assert!(prepared.matches(MatchTier::SubstringEditDistance, Some("x"), false));
        assert!(prepared.matches(MatchTier::EditDistance, Some("あい"), false));
    }

    #[test]
    fn test_any_substring_within_matches_enumeration() {
        let query = "abcab";
        let value = "ca";
        let expected = all_substrings(query)
            .iter()
            .any(|s| distance(s, value) <= 1);
        assert_eq!(
            any_substring_within(&graphemes(value), &graphemes(query), 1),
            expected
        );
    }

    #[test]
    fn test_tier_from_str_and_display() {
        for tier in MatchTier::CASCADE {
            assert_eq!(tier.to_string().parse::<MatchTier>(), Ok(tier));
        }
        assert_eq!("fuzzy".parse::<MatchTier>(), Ok(MatchTier::EditDistance));
        assert!("auto".parse::<MatchTier>().is_err());
    }

    #[test]
    fn test_tier_json_uses_display_form() {
        for tier in MatchTier::CASCADE {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier));
            assert_eq!(serde_json::from_str::<MatchTier>(&json).unwrap(), tier);
        }
        // 別名も読める
        let tier: MatchTier = serde_json::from_str("\"edit-distance\"").unwrap();
        assert_eq!(tier, MatchTier::EditDistance);
        assert!(serde_json::from_str::<MatchTier>("\"ranked\"").is_err());
    }

    #[test]
    fn test_substring_equality_long_query() {
        let long: String = "あいうえお".repeat(160) + "ポッキー";
        let queries = vec![long];
        let prepared = PreparedQuery::new(&queries);
        assert!(prepared.matches(MatchTier::SubstringEquality, Some("ポッキー"), false));
        assert!(!prepared.matches(MatchTier::SubstringEquality, Some("プリッツ"), false));
    }

    proptest! {
        #[test]
        fn prop_substring_equality_matches_enumeration(query in "[abア]{1,7}", value in "[abア]{1,5}") {
            let queries = vec![query.clone()];
            let prepared = PreparedQuery::new(&queries);
            let expected = all_substrings(&query).contains(&value);
            prop_assert_eq!(prepared.matches(MatchTier::SubstringEquality, Some(&value), false), expected);
        }

        #[test]
        fn prop_any_substring_within_matches_enumeration(query in "[abア]{1,7}", value in "[abア]{1,5}") {
            let expected = all_substrings(&query)
                .iter()
                .any(|s| distance(s, &value) <= MAX_EDIT_DISTANCE);
            prop_assert_eq!(
                any_substring_within(&graphemes(&value), &graphemes(&query), MAX_EDIT_DISTANCE),
                expected
            );
        }
    }
}
