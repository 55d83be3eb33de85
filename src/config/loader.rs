use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::api::{lrclib, musixmatch};

/// 覆盖配置文件中 usertoken 的环境变量
pub const USERTOKEN_ENV: &str = "MUSIXMATCH_USERTOKEN";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 启用的歌词源列表，按优先级排列
    pub lyrics_sources: Vec<String>,

    /// HTTP 请求设置
    pub http: HttpSettings,

    /// 歌词源特定配置
    pub sources: SourcesConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HttpSettings {
    /// 单次请求超时（秒）
    pub timeout_secs: u64,

    pub user_agent: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SourcesConfig {
    /// LRCLIB 配置
    pub lrclib: Option<LrclibConfig>,

    /// Musixmatch 配置
    pub musixmatch: Option<MusixmatchConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LrclibConfig {
    pub base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct MusixmatchConfig {
    pub base_url: String,

    /// 桌面端 usertoken，未设置时 Musixmatch 歌词源不可用
    pub usertoken: Option<String>,
}

impl MusixmatchConfig {
    /// 环境变量优先于配置文件
    pub fn usertoken(&self) -> Option<String> {
        pick_usertoken(env::var(USERTOKEN_ENV).ok(), self.usertoken.as_deref())
    }
}

fn pick_usertoken(from_env: Option<String>, configured: Option<&str>) -> Option<String> {
    from_env
        .filter(|t| !t.is_empty())
        .or_else(|| configured.filter(|t| !t.is_empty()).map(str::to_string))
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for LrclibConfig {
    fn default() -> Self {
        Self {
            base_url: lrclib::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Default for MusixmatchConfig {
    fn default() -> Self {
        Self {
            base_url: musixmatch::DEFAULT_BASE_URL.to_string(),
            usertoken: None,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            lrclib: Some(LrclibConfig::default()),
            musixmatch: Some(MusixmatchConfig::default()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lyrics_sources: vec!["lrclib".to_string(), "musixmatch".to_string()],
            http: HttpSettings::default(),
            sources: SourcesConfig::default(),
        }
    }
}

impl Config {
    /// 默认配置文件路径
    pub fn default_path() -> PathBuf {
        let pkg_name = env!("CARGO_PKG_NAME");
        dirs::config_dir()
            .map(|p| p.join(pkg_name).join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(format!("{}-config.toml", pkg_name)))
    }

    /// 加载配置，支持从指定路径或默认路径加载
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(Self::default_path);

        debug!("尝试从 {:?} 加载配置文件", config_path);

        if !config_path.exists() {
            debug!("配置文件 {:?} 不存在，将创建默认配置", config_path);
            let default_config = Config::default();

            match Self::write_default(&config_path, &default_config) {
                Ok(()) => info!("已创建默认配置文件: {:?}", config_path),
                Err(e) => warn!("无法创建默认配置文件 {:?}: {}，使用默认配置", config_path, e),
            }
            return Ok(default_config);
        }

        let content = match fs::read_to_string(&config_path) {
            Ok(content) => content,
            Err(e) => {
                error!("读取配置文件 {:?} 失败: {}", config_path, e);
                warn!("由于读取错误，将加载默认配置");
                return Ok(Config::default());
            }
        };
        let config = match Self::parse(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("解析配置文件 {:?} 失败: {}", config_path, e);
                warn!("由于解析错误，将加载默认配置");
                Config::default()
            }
        };

        debug!("已成功加载配置文件");
        Ok(config)
    }

    fn write_default(config_path: &Path, config: &Config) -> Result<()> {
        let toml = toml::to_string_pretty(config)?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
            debug!("已确保目录 {:?} 存在", parent);
        }

        fs::write(config_path, toml)?;
        Ok(())
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed = Config::parse(&text).unwrap();

        assert_eq!(parsed.lyrics_sources, vec!["lrclib", "musixmatch"]);
        assert_eq!(parsed.http.timeout_secs, 10);
        assert_eq!(
            parsed.sources.lrclib.unwrap().base_url,
            "https://lrclib.net/api"
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse(
            r#"
lyrics_sources = ["lrclib"]

[http]
timeout_secs = 3

[sources.musixmatch]
usertoken = "abc"
"#,
        )
        .unwrap();

        assert_eq!(config.lyrics_sources, vec!["lrclib"]);
        assert_eq!(config.http.timeout_secs, 3);
        assert!(config.http.user_agent.starts_with("lyrics-fetch-rs/"));
        assert_eq!(
            config.sources.lrclib.unwrap().base_url,
            lrclib::DEFAULT_BASE_URL
        );

        let mxm = config.sources.musixmatch.unwrap();
        assert_eq!(mxm.base_url, musixmatch::DEFAULT_BASE_URL);
        assert_eq!(mxm.usertoken.as_deref(), Some("abc"));
    }

    #[test]
    fn test_invalid_config_is_error() {
        assert!(Config::parse("lyrics_sources = 3").is_err());
    }

    #[test]
    fn test_pick_usertoken() {
        assert_eq!(pick_usertoken(Some("env".to_string()), Some("file")), Some("env".to_string()));
        assert_eq!(pick_usertoken(Some(String::new()), Some("file")), Some("file".to_string()));
        assert_eq!(pick_usertoken(None, Some("")), None);
        assert_eq!(pick_usertoken(None, None), None);
    }

    #[test]
    fn test_load_creates_default_file() {
        let path = env::temp_dir()
            .join(format!("lyrics-fetch-rs-test-{}", std::process::id()))
            .join("config.toml");
        let _ = fs::remove_file(&path);

        let config = Config::load(Some(path.clone())).unwrap();
        assert_eq!(config.lyrics_sources, vec!["lrclib", "musixmatch"]);
        assert!(path.exists());

        fs::write(&path, "not = [valid").unwrap();
        let fallback = Config::load(Some(path.clone())).unwrap();
        assert_eq!(fallback.http.timeout_secs, 10);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_load_unwritable_path_uses_defaults() {
        let path = PathBuf::from("/proc/lyrics-fetch-rs-no-such-dir/config.toml");

        let config = Config::load(Some(path.clone())).unwrap();
        assert_eq!(config.lyrics_sources, vec!["lrclib", "musixmatch"]);
        assert!(!path.exists());
    }

    #[test]
    fn test_load_unreadable_path_uses_defaults() {
        // 目录存在但无法当作文件读取
        let config = Config::load(Some(env::temp_dir())).unwrap();
        assert_eq!(config.lyrics_sources, vec!["lrclib", "musixmatch"]);
        assert_eq!(config.http.timeout_secs, 10);
    }
}
