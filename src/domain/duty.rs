// ==========================================
// 军人勤务排班系统 - 勤务类型领域模型
// ==========================================
// 红线: 勤务类型由外部协作方维护,排班会话内只读,引擎只按 id 引用
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// DutyType - 勤务类型
// ==========================================
// 用途: 周视图的行维度 (岗哨/护卫/值班 等)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyType {
    // ===== 主键 =====
    pub duty_type_id: String, // 勤务类型唯一标识

    // ===== 基础信息 =====
    pub name: String,                // 名称
    pub description: Option<String>, // 说明
    pub display_order: i32,          // 展示序号

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>, // 记录创建时间
    pub updated_at: DateTime<Utc>, // 记录更新时间
}
