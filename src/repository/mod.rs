// ==========================================
// 军人勤务排班系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 定义外部协作方契约,并提供 SQLite 参考实现
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod assignment_repo;
pub mod duty_type_repo;
pub mod error;
pub mod person_repo;
pub mod ranking_repo;
pub mod traits;

// 重导出契约与核心仓储
pub use assignment_repo::{normalize_duty_date, SqliteAssignmentRepository};
pub use duty_type_repo::SqliteDutyTypeRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use person_repo::SqlitePersonnelRepository;
pub use ranking_repo::SqliteRankingRepository;
pub use traits::{AssignmentPersistence, DutyTypeDirectory, PersonnelDirectory, RankingProvider};
