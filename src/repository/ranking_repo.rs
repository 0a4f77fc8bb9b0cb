// ==========================================
// 军人勤务排班系统 - 排名协作方 (SQLite 参考实现)
// ==========================================
// 职责: 为 (勤务类型, 日期) 格子计算"最空闲优先"建议列表
// 排序口径: 空闲天数降序 (从未服勤视为最大) → 该类型历史次数升序 → 姓名升序
// 红线: 消费方不依赖此口径;生产部署可替换为任意 RankingProvider 实现
// ==========================================

use crate::domain::{Person, SuggestionEntry, NEVER_SERVED_IDLE_DAYS};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::traits::RankingProvider;
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// SqliteRankingRepository - 排名仓储
// ==========================================
pub struct SqliteRankingRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRankingRepository {
    /// 创建新的仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>, duty_date: NaiveDate) -> rusqlite::Result<SuggestionEntry> {
        let person = Person {
            person_id: row.get("person_id")?,
            name: row.get("name")?,
            rank: row.get("rank")?,
            qualification: row.get("qualification")?,
            entry_date: row.get("entry_date")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        };
        let last_duty_date: Option<NaiveDate> = row.get("last_duty_date")?;
        let total_in_duty_type: i64 = row.get("total_in_type")?;
        let idle_days = match last_duty_date {
            Some(last) => (duty_date - last).num_days(),
            None => NEVER_SERVED_IDLE_DAYS,
        };
        Ok(SuggestionEntry {
            person,
            last_duty_date,
            idle_days,
            total_in_duty_type,
        })
    }
}

#[async_trait]
impl RankingProvider for SqliteRankingRepository {
    async fn suggest(
        &self,
        duty_type_id: &str,
        duty_date: NaiveDate,
        limit: usize,
    ) -> RepositoryResult<Vec<SuggestionEntry>> {
        let conn = self.get_conn()?;
        let date_text = duty_date.format("%Y-%m-%d").to_string();

        // 候选 = 当日未被任何勤务占用的人员;
        // 历史口径均取查询日之前 (< duty_date),保证翻周时结果确定
        let mut stmt = conn.prepare(
            r#"SELECT p.person_id, p.name, p.rank, p.qualification, p.entry_date,
                      p.created_at, p.updated_at,
                      (SELECT MAX(a.duty_date) FROM assignment a
                        WHERE a.person_id = p.person_id
                          AND a.duty_type_id = ?1
                          AND a.duty_date < ?2) AS last_duty_date,
                      (SELECT COUNT(*) FROM assignment a
                        WHERE a.person_id = p.person_id
                          AND a.duty_type_id = ?1
                          AND a.duty_date < ?2) AS total_in_type
               FROM person p
               WHERE p.person_id NOT IN (
                     SELECT a.person_id FROM assignment a
                      WHERE a.duty_date = ?2 AND a.person_id IS NOT NULL)
               ORDER BY (CASE WHEN last_duty_date IS NULL THEN ?3
                              ELSE julianday(?2) - julianday(last_duty_date) END) DESC,
                        total_in_type ASC,
                        p.name ASC,
                        p.person_id ASC
               LIMIT ?4"#,
        )?;

        let entries = stmt
            .query_map(
                params![
                    duty_type_id,
                    date_text,
                    NEVER_SERVED_IDLE_DAYS,
                    limit as i64
                ],
                |row| Self::map_row(row, duty_date),
            )?
            .collect::<Result<Vec<SuggestionEntry>, _>>()?;
        Ok(entries)
    }
}
