// ==========================================
// 军人勤务排班系统 - 外部协作方契约
// ==========================================
// 职责: 定义引擎所依赖的四个外部协作方接口 (只定义,不实现)
// 红线: 契约层不含业务逻辑;日期跨边界一律为日历日 (无时刻)
// ==========================================

use crate::domain::{Assignment, DutyType, Person, SuggestionEntry};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use chrono::NaiveDate;

// ==========================================
// PersonnelDirectory - 人员目录
// ==========================================
// 实现者: SqlitePersonnelRepository (参考实现) 或远程人员目录客户端
#[async_trait]
pub trait PersonnelDirectory: Send + Sync {
    /// 列出全部人员
    async fn list_persons(&self) -> RepositoryResult<Vec<Person>>;
}

// ==========================================
// DutyTypeDirectory - 勤务类型目录
// ==========================================
#[async_trait]
pub trait DutyTypeDirectory: Send + Sync {
    /// 列出全部勤务类型,按名称升序
    async fn list_duty_types(&self) -> RepositoryResult<Vec<DutyType>>;
}

// ==========================================
// AssignmentPersistence - 勤务安排持久化
// ==========================================
// 红线: assignment_id 由实现方分配;引擎先确认后更新,失败不触碰网格
#[async_trait]
pub trait AssignmentPersistence: Send + Sync {
    /// 查询日期区间内的全部安排 (闭区间,含两端)
    async fn list_assignments(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<Assignment>>;

    /// 创建新安排,返回带 assignment_id 的完整记录
    async fn create_assignment(
        &self,
        duty_type_id: &str,
        person_id: &str,
        duty_date: NaiveDate,
    ) -> RepositoryResult<Assignment>;

    /// 更换既有安排的人员,返回更新后的记录
    async fn update_assignment(
        &self,
        assignment_id: &str,
        person_id: &str,
    ) -> RepositoryResult<Assignment>;

    /// 删除安排
    async fn delete_assignment(&self, assignment_id: &str) -> RepositoryResult<()>;
}

// ==========================================
// RankingProvider - 公平排班排名协作方
// ==========================================
// 红线: 引擎不重算排名,只按接收顺序消费;失败由消费方降级为空列表
#[async_trait]
pub trait RankingProvider: Send + Sync {
    /// 查询 (勤务类型, 日期) 格子的建议列表,至多 limit 条
    async fn suggest(
        &self,
        duty_type_id: &str,
        duty_date: NaiveDate,
        limit: usize,
    ) -> RepositoryResult<Vec<SuggestionEntry>>;
}
