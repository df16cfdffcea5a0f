use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::timing::*;
use crate::error::{Result, VizError};
use crate::utils::validation::ConfigValidator;

use super::env::EnvConfig;
use super::topology::TopologyConfig;

/// 动画相关时长（毫秒）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTiming {
    pub hop_duration_ms: u64,
    pub pulse_duration_ms: u64,
    /// 序列步骤中高亮源节点到发出数据流之间的间隔
    pub step_lead_ms: u64,
    pub default_step_delay_ms: u64,
    pub skipped_step_delay_ms: u64,
    /// 外部服务节点收到调用后回传响应前的等待
    pub external_echo_delay_ms: u64,
    pub fanout_delay_ms: u64,
    /// 守卫序列的超时；`None` 表示不设上限
    pub sequence_timeout_ms: Option<u64>,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            hop_duration_ms: HOP_DURATION_MS,
            pulse_duration_ms: PULSE_DURATION_MS,
            step_lead_ms: STEP_LEAD_MS,
            default_step_delay_ms: STEP_DELAY_MS,
            skipped_step_delay_ms: SKIPPED_STEP_DELAY_MS,
            external_echo_delay_ms: EXTERNAL_ECHO_DELAY_MS,
            fanout_delay_ms: FANOUT_DELAY_MS,
            sequence_timeout_ms: None,
        }
    }
}

impl AnimationTiming {
    pub fn hop_duration(&self) -> Duration {
        Duration::from_millis(self.hop_duration_ms)
    }

    pub fn pulse_duration(&self) -> Duration {
        Duration::from_millis(self.pulse_duration_ms)
    }

    pub fn step_lead(&self) -> Duration {
        Duration::from_millis(self.step_lead_ms)
    }

    pub fn default_step_delay(&self) -> Duration {
        Duration::from_millis(self.default_step_delay_ms)
    }

    pub fn skipped_step_delay(&self) -> Duration {
        Duration::from_millis(self.skipped_step_delay_ms)
    }

    pub fn external_echo_delay(&self) -> Duration {
        Duration::from_millis(self.external_echo_delay_ms)
    }

    pub fn fanout_delay(&self) -> Duration {
        Duration::from_millis(self.fanout_delay_ms)
    }

    pub fn sequence_timeout(&self) -> Option<Duration> {
        self.sequence_timeout_ms.map(Duration::from_millis)
    }
}

/// 周期模拟的节奏
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub random_flow_interval_ms: u64,
    pub random_flow_jitter_ms: u64,
    pub alarm_interval_ms: u64,
    pub alarm_initial_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            random_flow_interval_ms: RANDOM_FLOW_INTERVAL_MS,
            random_flow_jitter_ms: RANDOM_FLOW_JITTER_MS,
            alarm_interval_ms: ALARM_INTERVAL_MS,
            alarm_initial_delay_ms: ALARM_INITIAL_DELAY_MS,
        }
    }
}

impl SimulationConfig {
    pub fn alarm_interval(&self) -> Duration {
        Duration::from_millis(self.alarm_interval_ms)
    }

    pub fn alarm_initial_delay(&self) -> Duration {
        Duration::from_millis(self.alarm_initial_delay_ms)
    }

    /// 周期为 0 的字段回落到默认值
    pub fn with_fallbacks(mut self) -> Self {
        if self.random_flow_interval_ms == 0 {
            self.random_flow_interval_ms = RANDOM_FLOW_INTERVAL_MS;
        }
        if self.alarm_interval_ms == 0 {
            self.alarm_interval_ms = ALARM_INTERVAL_MS;
        }
        self
    }
}

/// 服务端 `/api/config` 返回的配置
///
/// 缺失或为 0 的值使用默认值
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub alarm_interval: Option<u64>,
    #[serde(default)]
    pub alarm_initial_delay: Option<u64>,
}

impl RemoteConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| VizError::Config(format!("failed to parse remote config: {e}")))
    }

    pub fn apply_to(&self, simulation: &mut SimulationConfig) {
        simulation.alarm_interval_ms = self
            .alarm_interval
            .filter(|value| *value > 0)
            .unwrap_or(ALARM_INTERVAL_MS);
        simulation.alarm_initial_delay_ms = self
            .alarm_initial_delay
            .filter(|value| *value > 0)
            .unwrap_or(ALARM_INITIAL_DELAY_MS);
    }
}

/// 顶层配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VizConfig {
    #[serde(default)]
    pub timing: AnimationTiming,
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// 自定义拓扑；缺省使用内置拓扑
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<TopologyConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_endpoint: Option<String>,
}

impl VizConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| VizError::Config(format!("failed to parse config: {e}")))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// 环境变量覆盖文件中的值
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(interval) = EnvConfig::get_u64("AGENTVIZ_ALARM_INTERVAL")? {
            self.simulation.alarm_interval_ms = interval;
        }
        if let Some(delay) = EnvConfig::get_u64("AGENTVIZ_ALARM_INITIAL_DELAY")? {
            self.simulation.alarm_initial_delay_ms = delay;
        }
        if let Some(endpoint) = EnvConfig::get_env_optional("AGENTVIZ_HISTORY_ENDPOINT") {
            self.history_endpoint = Some(endpoint);
        }
        Ok(self)
    }

    pub fn apply_remote(&mut self, remote: &RemoteConfig) {
        remote.apply_to(&mut self.simulation);
    }

    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate_duration("timing.hop_duration_ms", self.timing.hop_duration_ms)?;
        ConfigValidator::validate_duration(
            "simulation.random_flow_interval_ms",
            self.simulation.random_flow_interval_ms,
        )?;
        ConfigValidator::validate_duration(
            "simulation.alarm_interval_ms",
            self.simulation.alarm_interval_ms,
        )?;
        if let Some(timeout) = self.timing.sequence_timeout_ms {
            ConfigValidator::validate_duration("timing.sequence_timeout_ms", timeout)?;
        }
        if let Some(endpoint) = &self.history_endpoint {
            ConfigValidator::validate_url(endpoint)?;
        }
        if let Some(topology) = &self.topology {
            topology.validate()?;
            for node in &topology.nodes {
                ConfigValidator::validate_node_id(&node.id)?;
                ConfigValidator::validate_color(&node.color)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config =
            VizConfig::from_json(r#"{"timing": {"hop_duration_ms": 250}}"#).unwrap();
        assert_eq!(config.timing.hop_duration_ms, 250);
        assert_eq!(config.timing.pulse_duration_ms, PULSE_DURATION_MS);
        assert_eq!(config.simulation.alarm_interval_ms, ALARM_INTERVAL_MS);
        assert!(config.topology.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn remote_zero_values_fall_back_to_defaults() {
        let mut simulation = SimulationConfig {
            alarm_interval_ms: 1,
            alarm_initial_delay_ms: 1,
            ..SimulationConfig::default()
        };
        RemoteConfig::from_json(r#"{"alarm_interval": 0}"#)
            .unwrap()
            .apply_to(&mut simulation);
        assert_eq!(simulation.alarm_interval_ms, ALARM_INTERVAL_MS);
        assert_eq!(simulation.alarm_initial_delay_ms, ALARM_INITIAL_DELAY_MS);

        RemoteConfig::from_json(r#"{"alarm_interval": 7000, "alarm_initial_delay": 100}"#)
            .unwrap()
            .apply_to(&mut simulation);
        assert_eq!(simulation.alarm_interval_ms, 7000);
        assert_eq!(simulation.alarm_initial_delay_ms, 100);
    }

    #[test]
    fn zero_periods_fall_back_to_defaults() {
        let simulation = SimulationConfig {
            random_flow_interval_ms: 0,
            alarm_interval_ms: 0,
            alarm_initial_delay_ms: 0,
            ..SimulationConfig::default()
        }
        .with_fallbacks();
        assert_eq!(simulation.random_flow_interval_ms, RANDOM_FLOW_INTERVAL_MS);
        assert_eq!(simulation.alarm_interval_ms, ALARM_INTERVAL_MS);
        assert_eq!(simulation.alarm_initial_delay_ms, 0);
    }

    #[test]
    fn zero_hop_duration_is_invalid() {
        let config = VizConfig::from_json(r#"{"timing": {"hop_duration_ms": 0}}"#).unwrap();
        assert!(matches!(config.validate(), Err(VizError::Config(_))));
    }
}
