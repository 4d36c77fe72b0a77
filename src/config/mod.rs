use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::storage::mutate::lock_manager::DEFAULT_LOCK_WAIT;
use crate::storage::mutate::validator::DEFAULT_MAX_ELEMENTS;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub batch: BatchConfig,
    pub lock: LockConfig,
    pub log: LogConfig,
}

/// 批量更新配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    /// 单批次元素上限
    pub max_elements: usize,
    /// 命令行请求未指定时使用的默认值
    pub create_if_not_exist_default: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_elements: DEFAULT_MAX_ELEMENTS,
            create_if_not_exist_default: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LockConfig {
    /// 等待元素锁的超时（毫秒）
    pub wait_timeout_ms: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            wait_timeout_ms: DEFAULT_LOCK_WAIT.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "graphmerge".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn check(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.batch.max_elements == 0 {
            return Err("batch.max_elements 必须大于 0".into());
        }
        Ok(())
    }
}
