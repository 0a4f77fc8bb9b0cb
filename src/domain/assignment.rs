// ==========================================
// 军人勤务排班系统 - 勤务安排领域模型
// ==========================================
// 红线: assignment_id 由持久化协作方分配,客户端不得自造
// 红线: person_id 为空的安排在逻辑上等价于"未指派",应删除而非存储
// ==========================================

use crate::domain::person::Person;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Assignment - 勤务安排 (一个被占用的格子)
// ==========================================
// 键: (duty_type_id, duty_date) 在一个方案内唯一
// duty_date 只有日期精度,不携带时刻语义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    // ===== 主键 =====
    pub assignment_id: String, // 持久化层分配的唯一标识

    // ===== 关联 =====
    pub duty_type_id: String,          // 勤务类型
    pub person_id: Option<String>,     // 被指派人员 (None = 未指派)
    pub person: Option<Person>,        // 人员快照 (展示用,由调用方解析补充)

    // ===== 日期 =====
    pub duty_date: NaiveDate, // 勤务日期 (日历日,无时刻)

    // ===== 审计字段 (持久化层所有) =====
    pub created_at: DateTime<Utc>, // 创建时间
    pub updated_at: DateTime<Utc>, // 更新时间
}

impl Assignment {
    /// 是否实际占用格子 (person_id 为空视为未指派)
    pub fn is_assigned(&self) -> bool {
        self.person_id.is_some()
    }

    /// 占用人展示标签,未指派时返回占位符
    pub fn person_label(&self) -> String {
        match &self.person {
            Some(p) => p.display_label(),
            None => "(未指派)".to_string(),
        }
    }
}
