// ==========================================
// 军人勤务排班系统 - 排班页控制器
// ==========================================
// 职责: 持有周可导航视图的会话状态 - 当前窗口、网格快照、
//       人员名单、加载错误、格子忙碌标记
// 红线: 单格单写 - 同一格子存在未完成变更时拒绝第二次变更 (CellBusy);
//       忙碌标记在成功与失败路径上都必须清除
// 红线: 变更确认后只逐项落位受影响格子;整网格重建仅发生在
//       翻周或显式刷新 (按需刷新,而非每写必刷)
// ==========================================

use crate::domain::{Assignment, CalendarWindow, Person, SuggestionEntry};
use crate::engine::{AssignOutcome, RosterGrid};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{info, instrument, warn};

use super::error::{ApiError, ApiResult};
use super::roster_api::RosterApi;

// ==========================================
// 视图状态
// ==========================================
struct ViewState {
    window: CalendarWindow,
    grid: Option<RosterGrid>,
    persons: Vec<Person>,
    last_error: Option<String>,
}

// ==========================================
// RosterOrchestrator - 排班页控制器
// ==========================================
pub struct RosterOrchestrator {
    api: Arc<RosterApi>,
    state: RwLock<ViewState>,
    // 存在未完成变更的格子集合;锁只做短临界区,不跨 await 持有
    busy_cells: Mutex<HashSet<(String, NaiveDate)>>,
}

impl RosterOrchestrator {
    /// 创建控制器,窗口定位到包含参考日期的一周
    ///
    /// 网格在首次 load/refresh 之前为空。
    pub fn new(api: Arc<RosterApi>, reference: NaiveDate) -> Self {
        let window = api.build_window(reference);
        Self {
            api,
            state: RwLock::new(ViewState {
                window,
                grid: None,
                persons: Vec::new(),
                last_error: None,
            }),
            busy_cells: Mutex::new(HashSet::new()),
        }
    }

    fn read_state(&self) -> ApiResult<std::sync::RwLockReadGuard<'_, ViewState>> {
        self.state
            .read()
            .map_err(|e| ApiError::InternalError(format!("状态锁获取失败: {}", e)))
    }

    fn write_state(&self) -> ApiResult<std::sync::RwLockWriteGuard<'_, ViewState>> {
        self.state
            .write()
            .map_err(|e| ApiError::InternalError(format!("状态锁获取失败: {}", e)))
    }

    fn lock_busy(&self) -> ApiResult<std::sync::MutexGuard<'_, HashSet<(String, NaiveDate)>>> {
        self.busy_cells
            .lock()
            .map_err(|e| ApiError::InternalError(format!("忙碌标记锁获取失败: {}", e)))
    }

    /// 加载当前窗口的人员名单与排班网格
    ///
    /// 失败时记录可读错误并原样返回;网格保持上一次的快照。
    /// 空周不是错误 - 没有任何安排时得到空网格。
    #[instrument(skip(self))]
    pub async fn load(&self) -> ApiResult<()> {
        let window = self.read_state()?.window.clone();

        let loaded = async {
            let persons = self.api.list_persons().await?;
            let grid = self.api.load_grid(&window).await?;
            Ok::<_, ApiError>((persons, grid))
        }
        .await;

        match loaded {
            Ok((persons, grid)) => {
                let mut state = self.write_state()?;
                info!(
                    window = %window.range_label(),
                    persons = persons.len(),
                    occupied = grid.occupied_count(),
                    "排班视图加载完成"
                );
                state.persons = persons;
                state.grid = Some(grid);
                state.last_error = None;
                Ok(())
            }
            Err(e) => {
                let message = format!("无法加载排班数据: {}", e);
                warn!(window = %window.range_label(), error = %e, "排班视图加载失败");
                self.write_state()?.last_error = Some(message);
                Err(e)
            }
        }
    }

    /// 翻到下一周并重新加载
    pub async fn next_week(&self) -> ApiResult<()> {
        self.shift_window(1)?;
        self.load().await
    }

    /// 翻到上一周并重新加载
    pub async fn previous_week(&self) -> ApiResult<()> {
        self.shift_window(-1)?;
        self.load().await
    }

    /// 按需刷新当前窗口
    pub async fn refresh(&self) -> ApiResult<()> {
        self.load().await
    }

    fn shift_window(&self, weeks: i32) -> ApiResult<()> {
        let mut state = self.write_state()?;
        let next = self.api.shift_week(&state.window, weeks);
        // 窗口整体重建,旧网格随之失效
        state.window = next;
        state.grid = None;
        Ok(())
    }

    /// 当前窗口
    pub fn window(&self) -> ApiResult<CalendarWindow> {
        Ok(self.read_state()?.window.clone())
    }

    /// 当前网格快照 (未加载时为 None)
    pub fn grid(&self) -> ApiResult<Option<RosterGrid>> {
        Ok(self.read_state()?.grid.clone())
    }

    /// 当前人员名单
    pub fn persons(&self) -> ApiResult<Vec<Person>> {
        Ok(self.read_state()?.persons.clone())
    }

    /// 最近一次加载错误
    pub fn last_error(&self) -> ApiResult<Option<String>> {
        Ok(self.read_state()?.last_error.clone())
    }

    /// 查询单个格子
    pub fn cell_at(&self, duty_type_id: &str, duty_date: NaiveDate) -> ApiResult<Option<Assignment>> {
        let state = self.read_state()?;
        Ok(state
            .grid
            .as_ref()
            .and_then(|grid| grid.cell_at(duty_type_id, duty_date))
            .cloned())
    }

    /// 格子是否存在未完成的变更
    pub fn is_cell_busy(&self, duty_type_id: &str, duty_date: NaiveDate) -> ApiResult<bool> {
        Ok(self
            .lock_busy()?
            .contains(&(duty_type_id.to_string(), duty_date)))
    }

    /// 计算格子的可指派人员列表
    pub fn available_for(
        &self,
        duty_type_id: &str,
        duty_date: NaiveDate,
    ) -> ApiResult<Vec<Person>> {
        let state = self.read_state()?;
        match state.grid.as_ref() {
            Some(grid) => Ok(self
                .api
                .available_for(grid, duty_type_id, duty_date, &state.persons)),
            None => Ok(Vec::new()),
        }
    }

    /// 对格子执行变更并落位结果
    ///
    /// 流程: 忙碌检查 → 标记忙碌 → 持久化确认 → 清除标记 → 逐项落位。
    /// 同一格子并发变更被 CellBusy 拒绝;失败路径同样清除忙碌标记,
    /// 且网格保持原状。
    #[instrument(skip(self), fields(duty_type_id = %duty_type_id, duty_date = %duty_date))]
    pub async fn assign(
        &self,
        duty_type_id: &str,
        duty_date: NaiveDate,
        person_id: Option<&str>,
    ) -> ApiResult<AssignOutcome> {
        let key = (duty_type_id.to_string(), duty_date);

        // 读取当前格子与人员名单快照
        let (current, persons) = {
            let state = self.read_state()?;
            let grid = state.grid.as_ref().ok_or_else(|| {
                ApiError::InvalidInput("排班网格尚未加载,无法执行变更".to_string())
            })?;
            (
                grid.cell_at(duty_type_id, duty_date).cloned(),
                state.persons.clone(),
            )
        };

        // 单格单写: 忙碌格子拒绝第二次变更
        {
            let mut busy = self.lock_busy()?;
            if !busy.insert(key.clone()) {
                return Err(ApiError::CellBusy {
                    duty_type_id: duty_type_id.to_string(),
                    duty_date,
                });
            }
        }

        let result = self
            .api
            .assign(duty_type_id, duty_date, person_id, current.as_ref(), &persons)
            .await;

        // 成功与失败都要清除忙碌标记
        self.lock_busy()?.remove(&key);

        let outcome = result?;
        self.apply_outcome(&outcome)?;
        Ok(outcome)
    }

    /// 确认结果逐项落位,只触碰受影响的格子
    fn apply_outcome(&self, outcome: &AssignOutcome) -> ApiResult<()> {
        let mut state = self.write_state()?;
        let Some(grid) = state.grid.as_mut() else {
            return Ok(());
        };
        match outcome {
            AssignOutcome::Created(assignment) | AssignOutcome::Updated(assignment) => {
                grid.apply(assignment.clone());
            }
            AssignOutcome::Removed { assignment_id } => {
                // Removed 只携带 id,按持有该 id 的格子清除
                let cell = grid.duty_types().iter().find_map(|duty| {
                    grid.window().days().iter().find_map(|day| {
                        grid.cell_at(&duty.duty_type_id, *day)
                            .filter(|a| &a.assignment_id == assignment_id)
                            .map(|a| (a.duty_type_id.clone(), a.duty_date))
                    })
                });
                if let Some((duty_type_id, duty_date)) = cell {
                    grid.remove(&duty_type_id, duty_date);
                }
            }
            AssignOutcome::NoChange => {}
        }
        Ok(())
    }

    /// 整窗建议浮层: 对网格全部格子并发扇出
    ///
    /// 翻周后到达的过期结果由调用方丢弃即可,不做取消。
    pub async fn suggestions_overlay(
        &self,
    ) -> ApiResult<HashMap<(String, NaiveDate), Vec<SuggestionEntry>>> {
        let (duty_types, window) = {
            let state = self.read_state()?;
            let Some(grid) = state.grid.as_ref() else {
                return Ok(HashMap::new());
            };
            (grid.duty_types().to_vec(), state.window.clone())
        };
        Ok(self.api.suggestions_for_window(&duty_types, &window).await)
    }
}
