use crate::error::{Result, VizError};
use std::env;

/// 环境变量配置管理
pub struct EnvConfig;

impl EnvConfig {
    /// 从环境变量获取值
    pub fn get_env(key: &str) -> Result<String> {
        env::var(key).map_err(|_| VizError::Config(format!("environment variable '{key}' is not set")))
    }

    /// 获取可选的环境变量，空字符串视为未设置
    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.trim().is_empty())
    }

    /// 获取可选的毫秒数；值存在但无法解析时报错
    pub fn get_u64(key: &str) -> Result<Option<u64>> {
        match Self::get_env_optional(key) {
            Some(raw) => raw.trim().parse::<u64>().map(Some).map_err(|_| {
                VizError::Config(format!(
                    "environment variable '{key}' must be an integer, got '{raw}'"
                ))
            }),
            None => Ok(None),
        }
    }

    /// 检查是否启用调试模式
    pub fn is_debug_mode() -> bool {
        env::var("AGENTVIZ_DEBUG").is_ok()
    }
}
