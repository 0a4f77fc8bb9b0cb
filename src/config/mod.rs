// ==========================================
// 军人勤务排班系统 - 配置层
// ==========================================
// 职责: 配置读取契约与 config_kv 实现
// ==========================================

pub mod config_manager;
pub mod roster_config_trait;

pub use config_manager::{ConfigManager, KEY_SUGGESTION_LIMIT, KEY_WEEK_START};
pub use roster_config_trait::RosterConfigReader;
