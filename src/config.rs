//! 存储适配器的配置
//!
//! 可以直接构造，也可以从toml文件或环境变量中读取
//!
//! ```toml
//! access_key = "Your AccessKey"
//! secret_key = "Your SecretKey"
//! bucket = "photos"
//! domain = "cdn.example.com"
//! is_ssl = true
//! is_private = true
//! region = "z0"
//! ```
use crate::{common::Region, Error};
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "KODO_";

fn default_overwrite() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// 存储空间绑定的下载域名
    pub domain: String,
    /// 是否使用https
    #[serde(default)]
    pub is_ssl: bool,
    /// 是否为私有空间，私有空间生成的url带有下载凭证
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub region: Region,
    /// 覆盖区域默认的上传域名
    #[serde(default)]
    pub up_host: Option<String>,
    /// 覆盖区域默认的资源管理域名
    #[serde(default)]
    pub rs_host: Option<String>,
    /// 重命名和拷贝时是否覆盖同名文件
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

impl Config {
    pub fn new(
        access_key: impl ToString,
        secret_key: impl ToString,
        bucket: impl ToString,
        domain: impl ToString,
    ) -> Self {
        Config {
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
            bucket: bucket.to_string(),
            domain: domain.to_string(),
            is_ssl: false,
            is_private: false,
            region: Region::default(),
            up_host: None,
            rs_host: None,
            overwrite: default_overwrite(),
        }
    }
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
    /// 从环境变量读取配置
    ///
    /// KODO_ACCESS_KEY、KODO_SECRET_KEY、KODO_BUCKET、KODO_DOMAIN 必须设置，
    /// KODO_IS_SSL、KODO_IS_PRIVATE、KODO_REGION、KODO_UP_HOST、KODO_RS_HOST、KODO_OVERWRITE 可选
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));
        let required = |name: &str| {
            var(name).ok_or_else(|| Error::InvalidConfig(format!("缺少环境变量 {}{}", ENV_PREFIX, name)))
        };
        let flag = |name: &str, default: bool| match var(name) {
            None => Ok(default),
            Some(value) => parse_bool(&value)
                .ok_or_else(|| Error::InvalidConfig(format!("{}{} 不是合法的布尔值：{}", ENV_PREFIX, name, value))),
        };
        let mut config = Config::new(
            required("ACCESS_KEY")?,
            required("SECRET_KEY")?,
            required("BUCKET")?,
            required("DOMAIN")?,
        );
        config.is_ssl = flag("IS_SSL", false)?;
        config.is_private = flag("IS_PRIVATE", false)?;
        config.overwrite = flag("OVERWRITE", default_overwrite())?;
        if let Some(region) = var("REGION") {
            config.region = Region::from_id(&region)
                .ok_or_else(|| Error::InvalidConfig(format!("未知的区域：{}", region)))?;
        }
        config.up_host = var("UP_HOST");
        config.rs_host = var("RS_HOST");
        config.validate()?;
        Ok(config)
    }
    /// 检查必填项
    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("access_key", &self.access_key),
            ("secret_key", &self.secret_key),
            ("bucket", &self.bucket),
            ("domain", &self.domain),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("{} 不能为空", name)));
            }
        }
        Ok(())
    }
    /// 合并域名覆盖项之后实际使用的区域
    pub fn effective_region(&self) -> Region {
        if self.up_host.is_none() && self.rs_host.is_none() {
            return self.region.clone();
        }
        Region::Custom {
            up_host: self
                .up_host
                .clone()
                .unwrap_or_else(|| self.region.up_host().to_owned()),
            rs_host: self
                .rs_host
                .clone()
                .unwrap_or_else(|| self.region.rs_host().to_owned()),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn toml_with_defaults() {
        let config = Config::from_toml_str(
            r#"
            access_key = "ak"
            secret_key = "sk"
            bucket = "photos"
            domain = "cdn.example.com"
            "#,
        )
        .unwrap();
        assert!(!config.is_ssl);
        assert!(!config.is_private);
        assert!(config.overwrite);
        assert_eq!(config.region, Region::Z0);
    }

    #[test]
    fn toml_region_and_flags() {
        let config = Config::from_toml_str(
            r#"
            access_key = "ak"
            secret_key = "sk"
            bucket = "photos"
            domain = "cdn.example.com"
            is_ssl = true
            is_private = true
            region = "z2"
            overwrite = false
            "#,
        )
        .unwrap();
        assert!(config.is_ssl && config.is_private && !config.overwrite);
        assert_eq!(config.effective_region().up_host(), "upload-z2.qiniup.com");
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let result = Config::from_toml_str(
            r#"
            access_key = ""
            secret_key = "sk"
            bucket = "photos"
            domain = "cdn.example.com"
            "#,
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
        assert!(matches!(Config::from_toml_str("bucket = 1"), Err(Error::ConfigParse(_))));
    }

    #[test]
    fn env_lookup() {
        let vars = HashMap::from([
            ("KODO_ACCESS_KEY", "ak"),
            ("KODO_SECRET_KEY", "sk"),
            ("KODO_BUCKET", "photos"),
            ("KODO_DOMAIN", "cdn.example.com"),
            ("KODO_IS_PRIVATE", "1"),
            ("KODO_REGION", "na0"),
            ("KODO_RS_HOST", "127.0.0.1:9001"),
        ]);
        let config = Config::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert!(config.is_private);
        assert!(!config.is_ssl);
        let region = config.effective_region();
        assert_eq!(region.up_host(), "upload-na0.qiniup.com");
        assert_eq!(region.rs_host(), "127.0.0.1:9001");
    }

    #[test]
    fn env_lookup_reports_missing_and_invalid_values() {
        let missing = Config::from_lookup(|_| None);
        assert!(matches!(missing, Err(Error::InvalidConfig(_))));
        let bad_flag = Config::from_lookup(|name| match name {
            "KODO_IS_SSL" => Some("maybe".to_owned()),
            _ => Some("x".to_owned()),
        });
        assert!(matches!(bad_flag, Err(Error::InvalidConfig(_))));
    }
}
