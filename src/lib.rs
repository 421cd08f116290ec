//! Cosmo Cuisine
//!
//! 照合エンジン（`cosmo_cuisine_common`）の外側にある、永続カタログ・インポート・CLIの実装。

pub mod cli;
pub mod config;
pub mod error;
pub mod importer;
pub mod matcher;
pub mod store;
