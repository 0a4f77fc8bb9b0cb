// ==========================================
// 军人勤务排班系统 - 排班API
// ==========================================
// 职责: 周排班的无状态门面 - 建窗/翻周/加载网格/可用性/变更/建议
// 红线: 纯函数或 I/O 隔离,无隐藏全局状态;会话状态由 RosterOrchestrator 持有
// ==========================================

use crate::domain::{Assignment, CalendarWindow, DutyType, Person, SuggestionEntry};
use crate::engine::{
    AssignOutcome, AssignmentMutator, AvailabilityResolver, RosterGrid, SuggestionFetcher,
};
use crate::repository::traits::{
    AssignmentPersistence, DutyTypeDirectory, PersonnelDirectory, RankingProvider,
};
use chrono::{NaiveDate, Weekday};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

use super::error::ApiResult;

// ==========================================
// RosterApi - 排班门面
// ==========================================
pub struct RosterApi {
    personnel: Arc<dyn PersonnelDirectory>,
    duty_types: Arc<dyn DutyTypeDirectory>,
    mutator: AssignmentMutator,
    persistence: Arc<dyn AssignmentPersistence>,
    fetcher: SuggestionFetcher,
    week_start: Weekday,
}

impl RosterApi {
    /// 创建新的 RosterApi 实例
    ///
    /// # 参数
    /// - personnel: 人员目录协作方
    /// - duty_types: 勤务类型目录协作方
    /// - persistence: 勤务安排持久化协作方
    /// - ranking: 排名协作方
    /// - week_start: 周起始日约定
    /// - suggestion_limit: 每格建议条数上限
    pub fn new(
        personnel: Arc<dyn PersonnelDirectory>,
        duty_types: Arc<dyn DutyTypeDirectory>,
        persistence: Arc<dyn AssignmentPersistence>,
        ranking: Arc<dyn RankingProvider>,
        week_start: Weekday,
        suggestion_limit: usize,
    ) -> Self {
        Self {
            personnel,
            duty_types,
            mutator: AssignmentMutator::new(persistence.clone()),
            persistence,
            fetcher: SuggestionFetcher::with_limit(ranking, suggestion_limit),
            week_start,
        }
    }

    /// 构造包含参考日期的周窗口
    pub fn build_window(&self, reference: NaiveDate) -> CalendarWindow {
        CalendarWindow::containing(reference, self.week_start)
    }

    /// 相邻周窗口 (正数向未来,负数向过去)
    pub fn shift_week(&self, window: &CalendarWindow, weeks: i32) -> CalendarWindow {
        window.shifted(weeks)
    }

    /// 列出全部人员
    pub async fn list_persons(&self) -> ApiResult<Vec<Person>> {
        Ok(self.personnel.list_persons().await?)
    }

    /// 加载窗口对应的排班网格
    ///
    /// 拉取勤务类型目录与窗口内全部安排,构建内存网格快照。
    #[instrument(skip(self), fields(window = %window.range_label()))]
    pub async fn load_grid(&self, window: &CalendarWindow) -> ApiResult<RosterGrid> {
        let duty_types = self.duty_types.list_duty_types().await?;
        let assignments = self
            .persistence
            .list_assignments(window.first_day(), window.last_day())
            .await?;
        Ok(RosterGrid::build(duty_types, window.clone(), assignments))
    }

    /// 计算格子的可指派人员列表 (纯计算,可逐格渲染调用)
    pub fn available_for(
        &self,
        grid: &RosterGrid,
        duty_type_id: &str,
        duty_date: NaiveDate,
        all_persons: &[Person],
    ) -> Vec<Person> {
        AvailabilityResolver::available_for(grid, duty_type_id, duty_date, all_persons)
    }

    /// 对格子执行变更 (创建/更换/清空/无变化)
    ///
    /// 悲观语义: 持久化确认失败时返回错误值,调用方的网格不受影响。
    pub async fn assign(
        &self,
        duty_type_id: &str,
        duty_date: NaiveDate,
        person_id: Option<&str>,
        current: Option<&Assignment>,
        all_persons: &[Person],
    ) -> ApiResult<AssignOutcome> {
        Ok(self
            .mutator
            .assign(duty_type_id, duty_date, person_id, current, all_persons)
            .await?)
    }

    /// 查询单个格子的建议列表 (失败降级为空)
    pub async fn suggestions_for(
        &self,
        duty_type_id: &str,
        duty_date: NaiveDate,
    ) -> Vec<SuggestionEntry> {
        self.fetcher.suggestions_for(duty_type_id, duty_date).await
    }

    /// 整窗建议扇出聚合
    pub async fn suggestions_for_window(
        &self,
        duty_types: &[DutyType],
        window: &CalendarWindow,
    ) -> HashMap<(String, NaiveDate), Vec<SuggestionEntry>> {
        self.fetcher.fetch_window(duty_types, window).await
    }
}
