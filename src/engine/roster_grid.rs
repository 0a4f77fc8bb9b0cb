// ==========================================
// 军人勤务排班系统 - 周排班网格模型
// ==========================================
// 职责: 内存中的排班网格 - 行为勤务类型,列为日历日,
//       底层为按 (勤务类型, 日期) 复合键索引的稀疏安排集合
// 红线: 网格快照构建后视为不可变,单格变更走 apply/remove 逐项替换,
//       整体重建仅发生在翻周或显式刷新
// 占用不变量:
// - 一个 (勤务类型, 日期) 格子至多一条有人安排
// - 同一日历日,同一人员至多占用一个格子 (跨所有勤务类型)
// ==========================================

use crate::domain::{Assignment, CalendarWindow, DutyType, GridConflictKind};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::warn;

// ==========================================
// GridConflict - 构建期冲突记录
// ==========================================
// 外部数据违反占用约束时记录在案,不中断构建
#[derive(Debug, Clone)]
pub struct GridConflict {
    pub kind: GridConflictKind,
    pub duty_type_id: String,
    pub duty_date: NaiveDate,
    pub detail: String,
}

// ==========================================
// RosterGrid - 周排班网格
// ==========================================
// 查询复杂度: cell_at 为 O(1) 均摊 (两级哈希索引,渲染期逐格查询)
#[derive(Debug, Clone)]
pub struct RosterGrid {
    duty_types: Vec<DutyType>,
    window: CalendarWindow,
    // 勤务类型 id → (日期 → 安排)
    cells: HashMap<String, HashMap<NaiveDate, Assignment>>,
    conflicts: Vec<GridConflict>,
}

impl RosterGrid {
    /// 由协作方返回的数据构建网格
    ///
    /// 清洗规则:
    /// - 窗口外的安排跳过并告警
    /// - person_id 为空的安排在逻辑上等价于"未指派",跳过并告警
    /// - 同一格子出现多条: 保留后到的一条,记录 DUPLICATE_CELL 冲突
    /// - 同一人员同日多格: 保留全部,记录 DUPLICATE_PERSON 冲突
    pub fn build(
        duty_types: Vec<DutyType>,
        window: CalendarWindow,
        assignments: Vec<Assignment>,
    ) -> Self {
        let mut cells: HashMap<String, HashMap<NaiveDate, Assignment>> = HashMap::new();
        let mut conflicts = Vec::new();

        for assignment in assignments {
            if !window.contains(assignment.duty_date) {
                warn!(
                    assignment_id = %assignment.assignment_id,
                    duty_date = %assignment.duty_date,
                    "安排落在窗口外,跳过"
                );
                continue;
            }
            if !assignment.is_assigned() {
                warn!(
                    assignment_id = %assignment.assignment_id,
                    "安排未指派人员 (person_id 为空),跳过"
                );
                continue;
            }

            let by_date = cells.entry(assignment.duty_type_id.clone()).or_default();
            if let Some(previous) = by_date.insert(assignment.duty_date, assignment.clone()) {
                warn!(
                    duty_type_id = %assignment.duty_type_id,
                    duty_date = %assignment.duty_date,
                    dropped = %previous.assignment_id,
                    kept = %assignment.assignment_id,
                    "同一格子出现多条安排,保留后到的一条"
                );
                conflicts.push(GridConflict {
                    kind: GridConflictKind::DuplicateCell,
                    duty_type_id: assignment.duty_type_id.clone(),
                    duty_date: assignment.duty_date,
                    detail: format!(
                        "丢弃 {} 保留 {}",
                        previous.assignment_id, assignment.assignment_id
                    ),
                });
            }
        }

        let mut grid = Self {
            duty_types,
            window,
            cells,
            conflicts,
        };
        grid.detect_person_conflicts();
        grid
    }

    /// 同一人员同日多格检测 (只记录,不修改数据)
    fn detect_person_conflicts(&mut self) {
        for day in *self.window.days() {
            let mut seen: HashMap<&str, &Assignment> = HashMap::new();
            for by_date in self.cells.values() {
                let Some(assignment) = by_date.get(&day) else {
                    continue;
                };
                let Some(person_id) = assignment.person_id.as_deref() else {
                    continue;
                };
                if let Some(first) = seen.get(person_id) {
                    warn!(
                        person_id,
                        duty_date = %day,
                        first = %first.assignment_id,
                        second = %assignment.assignment_id,
                        "同一人员同日占用多个格子"
                    );
                    self.conflicts.push(GridConflict {
                        kind: GridConflictKind::DuplicatePerson,
                        duty_type_id: assignment.duty_type_id.clone(),
                        duty_date: day,
                        detail: format!("人员 {} 同日多格", person_id),
                    });
                } else {
                    seen.insert(person_id, assignment);
                }
            }
        }
    }

    /// 查询单个格子的安排
    pub fn cell_at(&self, duty_type_id: &str, duty_date: NaiveDate) -> Option<&Assignment> {
        self.cells.get(duty_type_id)?.get(&duty_date)
    }

    /// 指定日历日被占用的人员 id 集合 (跨所有勤务类型)
    pub fn assigned_person_ids_on(&self, duty_date: NaiveDate) -> HashSet<&str> {
        self.cells
            .values()
            .filter_map(|by_date| by_date.get(&duty_date))
            .filter_map(|a| a.person_id.as_deref())
            .collect()
    }

    /// 变更确认后逐项落位: 只替换受影响的格子
    ///
    /// 窗口外的安排拒绝落位 (返回 false 并告警),避免污染当前快照。
    pub fn apply(&mut self, assignment: Assignment) -> bool {
        if !self.window.contains(assignment.duty_date) {
            warn!(
                assignment_id = %assignment.assignment_id,
                duty_date = %assignment.duty_date,
                "变更落在窗口外,忽略"
            );
            return false;
        }
        self.cells
            .entry(assignment.duty_type_id.clone())
            .or_default()
            .insert(assignment.duty_date, assignment);
        true
    }

    /// 清空格子,返回原安排
    pub fn remove(&mut self, duty_type_id: &str, duty_date: NaiveDate) -> Option<Assignment> {
        self.cells.get_mut(duty_type_id)?.remove(&duty_date)
    }

    /// 勤务类型行 (目录顺序)
    pub fn duty_types(&self) -> &[DutyType] {
        &self.duty_types
    }

    /// 当前周窗口
    pub fn window(&self) -> &CalendarWindow {
        &self.window
    }

    /// 构建期冲突记录
    pub fn conflicts(&self) -> &[GridConflict] {
        &self.conflicts
    }

    /// 占用格子总数
    pub fn occupied_count(&self) -> usize {
        self.cells.values().map(|by_date| by_date.len()).sum()
    }
}
