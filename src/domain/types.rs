// ==========================================
// 军人勤务排班系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 勤务变更类型 (Mutation Kind)
// ==========================================
// 由"当前格子是否有安排"与"目标人员是否为空"组合决定
// 序列化格式: SCREAMING_SNAKE_CASE (与操作日志一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationKind {
    Create,   // 空格子指派人员
    Update,   // 替换已指派人员
    Remove,   // 清空已指派格子
    NoChange, // 空格子且未选择人员,不产生外部调用
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::Create => write!(f, "CREATE"),
            MutationKind::Update => write!(f, "UPDATE"),
            MutationKind::Remove => write!(f, "REMOVE"),
            MutationKind::NoChange => write!(f, "NO_CHANGE"),
        }
    }
}

impl MutationKind {
    /// 转换为日志存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MutationKind::Create => "CREATE",
            MutationKind::Update => "UPDATE",
            MutationKind::Remove => "REMOVE",
            MutationKind::NoChange => "NO_CHANGE",
        }
    }
}

// ==========================================
// 网格冲突类型 (Grid Conflict Kind)
// ==========================================
// 构建网格时外部数据违反占用约束的分类
// 正常情况下不应出现;出现说明协作方数据有误,记录告警后继续
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GridConflictKind {
    DuplicateCell,   // 同一 (勤务类型, 日期) 出现多条安排
    DuplicatePerson, // 同一人员同日出现在多个勤务格子
}

impl fmt::Display for GridConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridConflictKind::DuplicateCell => write!(f, "DUPLICATE_CELL"),
            GridConflictKind::DuplicatePerson => write!(f, "DUPLICATE_PERSON"),
        }
    }
}
