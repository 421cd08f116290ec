//! 編集距離（レーベンシュタイン距離）
//!
//! 文字の比較は拡張書記素クラスタ単位で行う。
//! 日本語の結合文字（濁点など）を含む文字列をバイト単位で比較しないため。

use unicode_segmentation::UnicodeSegmentation;

/// 照合で許容する最大編集距離（1文字の誤認識まで許容）
pub const MAX_EDIT_DISTANCE: usize = 1;

/// 文字列を書記素クラスタ単位に分割
pub fn graphemes(s: &str) -> Vec<&str> {
    s.graphemes(true).collect()
}

/// 書記素単位のレーベンシュタイン距離
pub fn distance(a: &str, b: &str) -> usize {
    levenshtein(&graphemes(a), &graphemes(b))
}

/// 任意の要素列のレーベンシュタイン距離
///
/// 挿入・削除・置換のコストはすべて1。
/// `(len(a)+1) × (len(b)+1)` のDP表を埋める。
pub fn levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut matrix = vec![vec![0usize; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b_len {
        matrix[0][j] = j;
    }

    for i in 1..=a_len {
        for j in 1..=b_len {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a_len][b_len]
}

/// 距離が `max` 以下かを判定
///
/// 長さの差が `max` を超える組はDPを省略する（距離は長さの差以上になるため結果は変わらない）。
pub fn within<T: PartialEq>(a: &[T], b: &[T], max: usize) -> bool {
    if a.len().abs_diff(b.len()) > max {
        return false;
    }
    levenshtein(a, b) <= max
}
