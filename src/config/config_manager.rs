// ==========================================
// 军人勤务排班系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::roster_config_trait::RosterConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use chrono::{Utc, Weekday};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 周起始日配置键
pub const KEY_WEEK_START: &str = "roster/week_start";
/// 建议条数配置键
pub const KEY_SUGGESTION_LIMIT: &str = "roster/suggestion_limit";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }
        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值（scope_id='global'，UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"INSERT INTO config_kv (scope_id, key, value, updated_at)
               VALUES ('global', ?1, ?2, ?3)
               ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = ?3"#,
            params![key, value, Utc::now()],
        )?;
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 启动时记录生效配置,便于排查"配置不一致"类问题
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn
            .prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    /// 解析周起始日文本 (MONDAY..SUNDAY)
    fn parse_weekday(raw: &str) -> Option<Weekday> {
        match raw.trim().to_uppercase().as_str() {
            "MONDAY" => Some(Weekday::Mon),
            "TUESDAY" => Some(Weekday::Tue),
            "WEDNESDAY" => Some(Weekday::Wed),
            "THURSDAY" => Some(Weekday::Thu),
            "FRIDAY" => Some(Weekday::Fri),
            "SATURDAY" => Some(Weekday::Sat),
            "SUNDAY" => Some(Weekday::Sun),
            _ => None,
        }
    }
}

#[async_trait]
impl RosterConfigReader for ConfigManager {
    async fn get_week_start(&self) -> Result<Weekday, Box<dyn Error>> {
        let raw = self.get_config_or_default(KEY_WEEK_START, "MONDAY")?;
        match Self::parse_weekday(&raw) {
            Some(weekday) => Ok(weekday),
            None => {
                tracing::warn!(raw, "无法解析周起始日配置,回退默认 MONDAY");
                Ok(Weekday::Mon)
            }
        }
    }

    async fn get_suggestion_limit(&self) -> Result<usize, Box<dyn Error>> {
        let raw = self.get_config_or_default(KEY_SUGGESTION_LIMIT, "3")?;
        match raw.trim().parse::<usize>() {
            Ok(limit) if limit > 0 => Ok(limit),
            _ => {
                tracing::warn!(raw, "无法解析建议条数配置,回退默认 3");
                Ok(3)
            }
        }
    }
}
