//! 比較用のテキスト正規化

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 大文字小文字・ダイアクリティカルマークを無視する比較キー
///
/// NFKDで分解して結合文字を除去し、小文字化する。
/// 全角英数字は半角に、濁点・半濁点は除去される（ポ → ホ）。
pub fn fold(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// 大文字小文字のみを無視する比較キー
pub fn lowercase(s: &str) -> String {
    s.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_case() {
        assert_eq!(fold("Pocky"), "pocky");
        assert_eq!(fold("SNACKS"), "snacks");
    }

    #[test]
    fn test_fold_diacritics() {
        assert_eq!(fold("Crème Brûlée"), "creme brulee");
        assert_eq!(fold("ポッキー"), fold("ホッキー"));
    }

    #[test]
    fn test_fold_fullwidth() {
        assert_eq!(fold("ＰＯＣＫＹ"), "pocky");
    }

    #[test]
    fn test_lowercase_keeps_diacritics() {
        assert_eq!(lowercase("Crème"), "crème");
    }
}
