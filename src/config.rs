//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，API_KEY 环境变量可覆盖文件中的 api_key

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 默认查找的配置文件路径
const CONFIG_PATHS: [&str; 2] = ["config.json", "config/config.json"];

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API Key（为空则不启用认证）
    #[serde(default)]
    pub api_key: String,
    /// 上游请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 上游连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// 配置来源文件，使用默认配置时为 None
    #[serde(skip)]
    pub source: Option<String>,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 从 JSON 字符串解析配置
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    /// 加载配置
    ///
    /// 依次查找默认路径，找到的第一个文件必须能解析成功；都不存在时使用默认值。
    /// 日志系统在此之后才初始化，加载结果通过 `source` 字段交给调用方记录。
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::default();

        for path in CONFIG_PATHS {
            if Path::new(path).exists() {
                config = Self::from_file(path)
                    .map_err(|e| anyhow::anyhow!("加载配置文件 {} 失败: {}", path, e))?;
                config.source = Some(path.to_string());
                break;
            }
        }

        if let Ok(key) = env::var("API_KEY") {
            config.api.api_key = key;
        }

        Ok(config)
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.api.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.log.level, "info");
        assert!(config.api.api_key.is_empty());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = AppConfig::from_json(r#"{"server": {"port": 9000}, "api": {"api_key": "k"}}"#)
            .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.api.api_key, "k");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.log.level, "info");
        assert!(config.source.is_none());
    }

    #[test]
    fn test_invalid_json() {
        assert!(AppConfig::from_json("{server:").is_err());
    }
}
