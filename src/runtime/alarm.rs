use crate::constants::nodes::*;
use crate::message::InteractionKind;
use crate::scheduler::SequenceStep;

/// 告警周期的三个阶段
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlarmPhase {
    /// 告警节点经中央节点向上游请求最新数据
    Request,
    /// 多代理节点把处理任务分发给各专项节点
    Processing,
    /// 汇总结果并返回告警节点
    Response,
}

impl AlarmPhase {
    pub const ALL: [AlarmPhase; 3] = [
        AlarmPhase::Request,
        AlarmPhase::Processing,
        AlarmPhase::Response,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmPhase::Request => "request",
            AlarmPhase::Processing => "processing",
            AlarmPhase::Response => "response",
        }
    }

    pub fn steps(&self) -> Vec<SequenceStep> {
        match self {
            AlarmPhase::Request => vec![
                SequenceStep::new(ALARM, CENTRAL, "request latest alarm data").delay(0),
                SequenceStep::new(CENTRAL, DATA_CLEAN, "fetch latest processed data").delay(1000),
                SequenceStep::new(DATA_CLEAN, INFO_PROCESS, "request fresh data").delay(1000),
                SequenceStep::new(INFO_PROCESS, "API", "call API for latest data")
                    .delay(1000)
                    .kind(InteractionKind::ApiCall),
                SequenceStep::new("API", INFO_PROCESS, "return API data")
                    .delay(1500)
                    .kind(InteractionKind::ApiResponse),
            ],
            AlarmPhase::Processing => vec![
                SequenceStep::new(INFO_PROCESS, MULTI_AGENTS, "dispatch processing tasks").delay(1000),
                SequenceStep::new(MULTI_AGENTS, CEX_WITHDRAW, "process exchange withdrawals").delay(500),
                SequenceStep::new(MULTI_AGENTS, WHALE, "process large transfers").delay(700),
                SequenceStep::new(MULTI_AGENTS, TX, "process transaction frequency").delay(900),
                SequenceStep::new(MULTI_AGENTS, CONTRACT_MONITOR, "process contract calls").delay(1100),
                SequenceStep::new(MULTI_AGENTS, BASIC_INFO, "process basic coin info").delay(1300),
            ],
            AlarmPhase::Response => vec![
                SequenceStep::new(MULTI_AGENTS, DATA_CLEAN, "aggregate results").delay(2500),
                SequenceStep::new(DATA_CLEAN, CENTRAL, "submit merged data").delay(1000),
                SequenceStep::new(CENTRAL, ALARM, "return alarm analysis").delay(1000),
            ],
        }
    }
}

/// 完整告警周期，三个阶段按顺序拼接
pub fn alarm_cycle_steps() -> Vec<SequenceStep> {
    AlarmPhase::ALL
        .iter()
        .flat_map(|phase| phase.steps())
        .collect()
}
