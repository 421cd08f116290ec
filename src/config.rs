use crate::error::{CosmoError, Result};
use cosmo_cuisine_common::{Field, MatchTier};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// カタログパスを上書きする環境変数
pub const CATALOG_PATH_ENV: &str = "COSMO_CATALOG_PATH";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 永続カタログ（JSON）の場所
    pub catalog_path: Option<PathBuf>,
    /// 商品画像のフォルダ
    pub assets_dir: Option<PathBuf>,
    /// 照合対象フィールドの既定値
    pub default_field: Field,
    /// 照合方式の既定値（`None` はカスケード）
    pub default_tier: Option<MatchTier>,
    /// 1ページあたりの表示件数
    pub page_size: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CosmoError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("cosmo-cuisine").join("config.json"))
    }

    pub fn default_config() -> Self {
        Self {
            catalog_path: None,
            assets_dir: None,
            default_field: Field::BrandJp,
            default_tier: None,
            page_size: 10,
        }
    }

    /// カタログパスを解決
    ///
    /// 優先順: 引数 > 環境変数 > 設定ファイル > `~/.local/share/cosmo-cuisine/catalog.json`
    pub fn resolve_catalog_path(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path);
        }
        if let Ok(path) = std::env::var(CATALOG_PATH_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        if let Some(path) = &self.catalog_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| CosmoError::Config("データディレクトリが見つかりません".into()))?;
        Ok(data_dir.join("cosmo-cuisine").join("catalog.json"))
    }

    pub fn set_catalog_path(&mut self, path: PathBuf) -> Result<()> {
        self.catalog_path = Some(path);
        self.save()
    }

    pub fn set_assets_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.assets_dir = Some(dir);
        self.save()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_config();
        assert_eq!(config.default_field, Field::BrandJp);
        assert_eq!(config.default_tier, None);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_explicit_catalog_path_wins() {
        let config = Config {
            catalog_path: Some(PathBuf::from("/from/config.json")),
            ..Config::default_config()
        };
        let path = config
            .resolve_catalog_path(Some(PathBuf::from("/explicit.json")))
            .unwrap();
        assert_eq!(path, PathBuf::from("/explicit.json"));
    }

    #[test]
    fn test_partial_config_json() {
        let config: Config = serde_json::from_str(r#"{"default_tier": "edit-distance"}"#).unwrap();
        assert_eq!(config.default_tier, Some(MatchTier::EditDistance));
        assert_eq!(config.default_field, Field::BrandJp);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_saved_tier_reloads() {
        // 表示と同じ表記で保存され、そのまま読み戻せる
        for tier in MatchTier::CASCADE {
            let config = Config {
                default_tier: Some(tier),
                ..Config::default_config()
            };
            let json = serde_json::to_string(&config).unwrap();
            assert!(json.contains(&format!("\"default_tier\":\"{}\"", tier)));
            let loaded: Config = serde_json::from_str(&json).unwrap();
            assert_eq!(loaded.default_tier, Some(tier));
        }

        let config: Config = serde_json::from_str(r#"{"default_tier": "edit"}"#).unwrap();
        assert_eq!(config.default_tier, Some(MatchTier::EditDistance));
    }
}
