//! contactid-config - 配置加载库
//!
//! 依次合并 `default.toml`、`<APP_ENV>.toml` 与 `CONTACTID_` 前缀的环境变量，
//! 环境变量以 `__` 分隔层级，如 `CONTACTID_EMAIL__LOCAL_PART_CASE=preserve`。

use contactid_domain_core::EmailNormalization;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 电话号码配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhoneConfig {
    /// 解析国内格式号码时使用的区域提示（如 `ID`）
    pub default_region: Option<String>,
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

/// 标识符配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentifierConfig {
    #[serde(default)]
    pub email: EmailNormalization,
    #[serde(default)]
    pub phone: PhoneConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl IdentifierConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        Ok(Self::figment(config_dir).extract()?)
    }

    /// 配置来源，按合并顺序后者覆盖前者
    pub fn figment(config_dir: &str) -> Figment {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("CONTACTID_").split("__"))
    }

    pub fn email_normalization(&self) -> EmailNormalization {
        self.email
    }

    /// 电话号码区域提示，未配置时按国际格式解析
    pub fn numbering_region(&self) -> Option<&str> {
        self.phone.default_region.as_deref()
    }
}
