use crate::error::{Result, VizError};

/// 配置验证器
pub struct ConfigValidator;

impl ConfigValidator {
    /// 验证 URL 格式
    pub fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(VizError::Config("URL must not be empty".to_string()));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(VizError::Config(format!(
                "URL '{url}' must start with http:// or https://"
            )));
        }

        Ok(())
    }

    /// 验证节点 ID
    pub fn validate_node_id(node_id: &str) -> Result<()> {
        if node_id.is_empty() {
            return Err(VizError::Config("node id must not be empty".to_string()));
        }

        if !node_id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(VizError::Config(format!(
                "node id '{node_id}' may only contain letters, digits, '_' and '-'"
            )));
        }

        Ok(())
    }

    /// 时长必须为正
    pub fn validate_duration(field: &str, millis: u64) -> Result<()> {
        if millis == 0 {
            return Err(VizError::Config(format!("{field} must be greater than 0")));
        }
        Ok(())
    }

    /// `#rrggbb` 格式的颜色
    pub fn validate_color(color: &str) -> Result<()> {
        let valid = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(VizError::Config(format!(
                "color '{color}' must look like #rrggbb"
            )));
        }
        Ok(())
    }
}
