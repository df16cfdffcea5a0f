/// 持久化记录中写入的粗粒度 agent 类型
///
/// 先查精确表，再按顺序做子串匹配，都不命中时为 `unknown`
const EXACT: [(&str, &str); 23] = [
    ("API", "external_service"),
    ("LLM", "external_service"),
    ("CentralAgent", "central"),
    ("InfoProcessAgent", "processor"),
    ("MultiAgents", "dispatcher"),
    ("DataCleanAgent", "data_cleaner"),
    ("CEXWithdrawAgent", "specialist"),
    ("WhaleAgent", "specialist"),
    ("TxAgent", "specialist"),
    ("ContractMonitorAgent", "specialist"),
    ("BasicInfoAgent", "specialist"),
    ("AlarmAgent", "notification"),
    ("WalletAgent", "executor"),
    ("CEXAgent", "executor"),
    ("AutoTradeAgent", "executor"),
    ("BlockchainAPI", "external_service"),
    ("LLMAPI", "external_service"),
    ("System", "system"),
    ("User", "user"),
    ("Client", "user"),
    ("ApprovalTx", "action"),
    ("PlaceOrder", "action"),
    ("MessageCall", "action"),
];

const FRAGMENTS: [(&str, &str); 13] = [
    ("InfoProcessAgent", "processor"),
    ("CentralAgent", "central"),
    ("DataCleanAgent", "data_cleaner"),
    ("UserAgent", "user"),
    ("CEXWithdrawAgent", "specialist"),
    ("SpecificCoinWhaleAgent", "specialist"),
    ("FreqTxAgent", "specialist"),
    ("ContractMonitorAgent", "specialist"),
    ("BasicCoinInfoAgent", "specialist"),
    ("AlarmAgent", "notification"),
    ("WalletAgent", "executor"),
    ("CEXAgent", "executor"),
    ("AutoTradeAgent", "executor"),
];

pub fn agent_type(name: &str) -> &'static str {
    if let Some((_, kind)) = EXACT.iter().find(|(id, _)| *id == name) {
        return *kind;
    }
    FRAGMENTS
        .iter()
        .find(|(fragment, _)| name.contains(fragment))
        .map(|(_, kind)| *kind)
        .unwrap_or("unknown")
}
