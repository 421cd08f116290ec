//! 部分文字列の列挙

use crate::distance::graphemes;

/// すべての連続する空でない部分文字列を返す
///
/// 書記素単位で `0 <= i <= j < n` の全組を列挙する。
/// 順序は開始位置、次に終了位置の昇順。重複は除去しない（長さ n に対して n(n+1)/2 件）。
pub fn all_substrings(s: &str) -> Vec<String> {
    let chars = graphemes(s);
    let n = chars.len();
    let mut result = Vec::with_capacity(n * (n + 1) / 2);

    for i in 0..n {
        for j in i..n {
            result.push(chars[i..=j].concat());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_substrings_abc() {
        let subs = all_substrings("abc");
        assert_eq!(subs, vec!["a", "ab", "abc", "b", "bc", "c"]);

        let set: HashSet<&str> = subs.iter().map(|s| s.as_str()).collect();
        let expected: HashSet<&str> = ["a", "b", "c", "ab", "bc", "abc"].into_iter().collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_all_substrings_empty() {
        assert!(all_substrings("").is_empty());
    }

    #[test]
    fn test_all_substrings_keeps_duplicates() {
        let subs = all_substrings("aa");
        assert_eq!(subs, vec!["a", "aa", "a"]);
    }

    #[test]
    fn test_all_substrings_japanese() {
        let subs = all_substrings("ポッキー");
        assert_eq!(subs.len(), 10);
        assert!(subs.contains(&"ッキ".to_string()));
        assert!(subs.contains(&"ポッキー".to_string()));
    }

    proptest! {
        #[test]
        fn prop_substring_count(s in "\\PC{0,10}") {
            let n = graphemes(&s).len();
            prop_assert_eq!(all_substrings(&s).len(), n * (n + 1) / 2);
        }

        #[test]
        fn prop_substrings_are_contained(s in "[a-cあ-う]{0,6}") {
            for sub in all_substrings(&s) {
                prop_assert!(!sub.is_empty());
                prop_assert!(s.contains(&sub));
            }
        }
    }
}
