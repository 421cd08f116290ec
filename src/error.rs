use thiserror::Error;

#[derive(Error, Debug)]
pub enum CosmoError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("カタログファイルが不正: {0}")]
    InvalidCatalog(String),

    #[error("問い合わせファイルが不正: {0}")]
    InvalidRequest(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Catalog(#[from] cosmo_cuisine_common::Error),
}

pub type Result<T> = std::result::Result<T, CosmoError>;
