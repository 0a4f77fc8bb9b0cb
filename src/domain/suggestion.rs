// ==========================================
// 军人勤务排班系统 - 排班建议领域模型
// ==========================================
// 红线: 建议内容完全由排名协作方提供,引擎只消费展示,
//       不校验其排序依据,仅保证"至多 N 条,按接收顺序"
// ==========================================

use crate::domain::person::Person;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// "从未服勤"的空闲天数哨兵值
///
/// 协作方用该值表示人员在此勤务类型下没有任何历史记录,
/// 展示层将其渲染为无穷符号而非具体天数。
pub const NEVER_SERVED_IDLE_DAYS: i64 = 999_999;

// ==========================================
// SuggestionEntry - 单条排班建议
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionEntry {
    pub person: Person,                     // 建议人员
    pub last_duty_date: Option<NaiveDate>,  // 该勤务类型下最近一次服勤日期
    pub idle_days: i64,                     // 距上次服勤的天数 (NEVER_SERVED_IDLE_DAYS = 从未)
    pub total_in_duty_type: i64,            // 该勤务类型下的历史服勤次数
}

impl SuggestionEntry {
    /// 空闲天数展示标签
    pub fn idle_label(&self) -> String {
        if self.idle_days >= NEVER_SERVED_IDLE_DAYS {
            "∞".to_string()
        } else {
            format!("{}d", self.idle_days)
        }
    }
}
