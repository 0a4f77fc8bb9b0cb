// ==========================================
// 军人勤务排班系统 - API层
// ==========================================
// 职责: 对外业务接口 - 无状态门面 + 有状态页控制器
// ==========================================

pub mod error;
pub mod orchestrator;
pub mod roster_api;

pub use error::{ApiError, ApiResult};
pub use orchestrator::RosterOrchestrator;
pub use roster_api::RosterApi;
