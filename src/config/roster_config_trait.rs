// ==========================================
// 军人勤务排班系统 - 排班配置读取 Trait
// ==========================================
// 职责: 定义排班引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use chrono::Weekday;
use std::error::Error;

// ==========================================
// RosterConfigReader Trait
// ==========================================
// 用途: 排班视图与建议引擎所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait RosterConfigReader: Send + Sync {
    /// 获取周起始日约定
    ///
    /// # 返回
    /// - Weekday: 周窗口首日落在的星期
    ///
    /// # 默认值
    /// - MONDAY
    async fn get_week_start(&self) -> Result<Weekday, Box<dyn Error>>;

    /// 获取每格建议条数上限
    ///
    /// # 返回
    /// - usize: 建议列表最大长度
    ///
    /// # 默认值
    /// - 3
    async fn get_suggestion_limit(&self) -> Result<usize, Box<dyn Error>>;
}
