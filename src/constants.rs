/// 可视化相关的常量定义
///
/// 统一管理节点 ID、颜色、默认时长等硬编码值

/// 内置拓扑中的规范节点 ID
pub mod nodes {
    pub const CEX_WITHDRAW: &str = "CEXWithdrawAgent";
    pub const WHALE: &str = "WhaleAgent";
    pub const TX: &str = "TxAgent";
    pub const CONTRACT_MONITOR: &str = "ContractMonitorAgent";
    pub const BASIC_INFO: &str = "BasicInfoAgent";
    pub const INFO_PROCESS: &str = "InfoProcessAgent";
    pub const MULTI_AGENTS: &str = "MultiAgents";
    pub const DATA_CLEAN: &str = "DataCleanAgent";
    pub const CENTRAL: &str = "CentralAgent";
    pub const ALARM: &str = "AlarmAgent";
    pub const AUTO_TRADE: &str = "AutoTradeAgent";
    pub const WALLET: &str = "WalletAgent";
    pub const CEX: &str = "CEXAgent";
    pub const USER: &str = "User";
    pub const BLOCKCHAIN_API: &str = "BlockchainAPI";
    pub const LLM_API: &str = "LLMAPI";
    pub const CEX_API: &str = "CEXAPI";
    pub const APPROVAL_TX: &str = "ApprovalTx";
    pub const PLACE_ORDER: &str = "PlaceOrder";
    pub const MESSAGE_CALL: &str = "MessageCall";

    /// 两跳中转时按顺序尝试的枢纽节点
    pub const DEFAULT_HUBS: [&str; 2] = [CENTRAL, MULTI_AGENTS];

    /// 用户提交后中央节点广播的目标
    pub const SUBMISSION_FANOUT: [&str; 4] = [INFO_PROCESS, ALARM, AUTO_TRADE, DATA_CLEAN];
}

/// 颜色常量
pub mod colors {
    pub const MESSAGE: &str = "#3498db";
    pub const API_CALL: &str = "#e74c3c";
    pub const API_RESPONSE: &str = "#2ecc71";
    pub const SYSTEM: &str = "#f39c12";
    pub const FALLBACK: &str = "#95a5a6";

    pub const USER_REQUEST: &str = "#ffeaa7";
    pub const ALERT_BORDER: &str = "#fd79a8";
    pub const RELATED_BORDER: &str = "#ffcc00";
    pub const STEP_BORDER: &str = "#ff3333";

    /// 随机数据流使用的调色板
    pub const RANDOM_PALETTE: [&str; 6] = [
        "#74b9ff", "#a29bfe", "#55efc4", "#ffeaa7", "#ff7675", "#fd79a8",
    ];
}

/// 布局常量
pub mod layout {
    pub const BASE_WIDTH: f64 = 1000.0;
    pub const BASE_HEIGHT: f64 = 800.0;
}

/// 默认时长（毫秒）
pub mod timing {
    pub const HOP_DURATION_MS: u64 = 1000;
    pub const PULSE_DURATION_MS: u64 = 600;
    pub const STEP_LEAD_MS: u64 = 500;
    pub const STEP_DELAY_MS: u64 = 1000;
    pub const SKIPPED_STEP_DELAY_MS: u64 = 500;
    pub const EXTERNAL_ECHO_DELAY_MS: u64 = 500;
    pub const FANOUT_DELAY_MS: u64 = 500;

    pub const RANDOM_FLOW_INTERVAL_MS: u64 = 5000;
    pub const RANDOM_FLOW_JITTER_MS: u64 = 1000;
    pub const ALARM_INTERVAL_MS: u64 = 20000;
    pub const ALARM_INITIAL_DELAY_MS: u64 = 5000;
}

/// 持久化记录的固定字段
pub mod record {
    pub const VERSION: &str = "1.0";
    pub const PROTOCOL: &str = "MCP";
    pub const PRIORITY_NORMAL: &str = "normal";
}
