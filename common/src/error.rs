//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// カタログストアの読み出し失敗（リクエスト全体を中断する）
    #[error("Catalog store unavailable: {0}")]
    StoreUnavailable(String),

    /// 1レコードのデコード失敗（呼び出し側でスキップされる）
    #[error("Malformed record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("Duplicate product id: {0}")]
    DuplicateId(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
