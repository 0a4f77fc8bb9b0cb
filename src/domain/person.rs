// ==========================================
// 军人勤务排班系统 - 人员领域模型
// ==========================================
// 红线: 人员目录由外部协作方维护,排班会话内只读
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Person - 军人主数据
// ==========================================
// 用途: 人员目录读取,可用性解析与展示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    // ===== 主键 =====
    pub person_id: String, // 人员唯一标识

    // ===== 基础信息 =====
    pub name: String,                  // 姓名
    pub rank: String,                  // 军衔
    pub qualification: Option<String>, // 资质/岗位资格
    pub entry_date: Option<NaiveDate>, // 入伍日期

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>, // 记录创建时间
    pub updated_at: DateTime<Utc>, // 记录更新时间
}

impl Person {
    /// 展示标签: 军衔 + 姓名
    pub fn display_label(&self) -> String {
        format!("{} {}", self.rank, self.name)
    }
}
