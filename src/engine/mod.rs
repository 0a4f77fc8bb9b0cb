// ==========================================
// 军人勤务排班系统 - 引擎层
// ==========================================
// 职责: 实现排班业务规则,不拼 SQL
// 红线: 占用不变量由构造保证 - 解析器不提供已占用人员,
//       变更先经持久化确认再落位网格
// ==========================================

pub mod assignment_mutator;
pub mod availability;
pub mod roster_grid;
pub mod suggestion;

// 重导出核心引擎
pub use assignment_mutator::{AssignOutcome, AssignmentMutator};
pub use availability::AvailabilityResolver;
pub use roster_grid::{GridConflict, RosterGrid};
pub use suggestion::{SuggestionFetcher, DEFAULT_SUGGESTION_LIMIT};
