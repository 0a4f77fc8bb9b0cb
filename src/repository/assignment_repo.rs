// ==========================================
// 军人勤务排班系统 - 勤务安排持久化仓储 (SQLite 参考实现)
// ==========================================
// 红线: assignment_id 由本层分配 (uuid v4),客户端草稿不落库
// 红线: duty_date 只有日期精度;携带时刻的输入一律截断到日历日,
//       避免跨日边界的偏移一天缺陷
// 占用约束由唯一索引兜底:
// - idx_assignment_cell: (duty_type_id, duty_date) 唯一
// - idx_assignment_person_day: (person_id, duty_date) 唯一
// ==========================================

use crate::domain::{Assignment, Person};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::traits::AssignmentPersistence;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 将协作方传来的日期文本规范化为日历日
///
/// 接受 `YYYY-MM-DD` 以及带时刻后缀的变体 (`YYYY-MM-DD HH:MM:SS`、RFC3339),
/// 一律截断到前 10 个字符再解析。
pub fn normalize_duty_date(raw: &str) -> RepositoryResult<NaiveDate> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
        RepositoryError::FieldValueError {
            field: "duty_date".to_string(),
            message: format!("无法解析日期 '{}': {}", raw, e),
        }
    })
}

// ==========================================
// SqliteAssignmentRepository - 勤务安排仓储
// ==========================================
pub struct SqliteAssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAssignmentRepository {
    /// 创建新的仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 行映射: assignment LEFT JOIN person,人员存在时补充快照
    fn map_row(row: &Row<'_>) -> rusqlite::Result<Assignment> {
        let raw_date: String = row.get("duty_date")?;
        // 行内无法返回仓储错误,解析失败交由调用方兜底列过滤;
        // 写入侧统一走 normalize_duty_date,正常数据不会走到 unwrap_or
        let duty_date = raw_date
            .get(..10)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .ok_or_else(|| {
                rusqlite::Error::InvalidColumnType(
                    0,
                    "duty_date".to_string(),
                    rusqlite::types::Type::Text,
                )
            })?;

        let embedded_person_id: Option<String> = row.get("p_person_id")?;
        let person = match embedded_person_id {
            Some(person_id) => Some(Person {
                person_id,
                name: row.get("p_name")?,
                rank: row.get("p_rank")?,
                qualification: row.get("p_qualification")?,
                entry_date: row.get("p_entry_date")?,
                created_at: row.get("p_created_at")?,
                updated_at: row.get("p_updated_at")?,
            }),
            None => None,
        };

        Ok(Assignment {
            assignment_id: row.get("assignment_id")?,
            duty_type_id: row.get("duty_type_id")?,
            person_id: row.get("person_id")?,
            person,
            duty_date,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    const SELECT_WITH_PERSON: &'static str = r#"
        SELECT a.assignment_id, a.duty_type_id, a.person_id, a.duty_date,
               a.created_at, a.updated_at,
               p.person_id AS p_person_id, p.name AS p_name, p.rank AS p_rank,
               p.qualification AS p_qualification, p.entry_date AS p_entry_date,
               p.created_at AS p_created_at, p.updated_at AS p_updated_at
        FROM assignment a
        LEFT JOIN person p ON p.person_id = a.person_id"#;

    /// 按 id 查询安排 (含人员快照)
    pub fn find_by_id(&self, assignment_id: &str) -> RepositoryResult<Assignment> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE a.assignment_id = ?", Self::SELECT_WITH_PERSON);
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![assignment_id], |row| Self::map_row(row))?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(RepositoryError::NotFound {
                entity: "Assignment".to_string(),
                id: assignment_id.to_string(),
            }),
        }
    }
}

#[async_trait]
impl AssignmentPersistence for SqliteAssignmentRepository {
    async fn list_assignments(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<Assignment>> {
        let conn = self.get_conn()?;
        // duty_date 为 YYYY-MM-DD 文本,ISO 格式支持字符串区间比较
        let sql = format!(
            "{} WHERE a.duty_date BETWEEN ? AND ? ORDER BY a.duty_date, a.duty_type_id",
            Self::SELECT_WITH_PERSON
        );
        let mut stmt = conn.prepare(&sql)?;
        let assignments = stmt
            .query_map(
                params![
                    start.format("%Y-%m-%d").to_string(),
                    end.format("%Y-%m-%d").to_string()
                ],
                |row| Self::map_row(row),
            )?
            .collect::<Result<Vec<Assignment>, _>>()?;
        Ok(assignments)
    }

    async fn create_assignment(
        &self,
        duty_type_id: &str,
        person_id: &str,
        duty_date: NaiveDate,
    ) -> RepositoryResult<Assignment> {
        if duty_type_id.trim().is_empty() {
            return Err(RepositoryError::ValidationError(
                "勤务类型ID不能为空".to_string(),
            ));
        }
        if person_id.trim().is_empty() {
            return Err(RepositoryError::ValidationError(
                "人员ID不能为空".to_string(),
            ));
        }

        let assignment_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        {
            let conn = self.get_conn()?;
            conn.execute(
                r#"INSERT INTO assignment (
                        assignment_id, duty_type_id, person_id, duty_date,
                        created_at, updated_at
                    ) VALUES (?, ?, ?, ?, ?, ?)"#,
                params![
                    &assignment_id,
                    duty_type_id,
                    person_id,
                    duty_date.format("%Y-%m-%d").to_string(),
                    now,
                    now,
                ],
            )?;
        }
        self.find_by_id(&assignment_id)
    }

    async fn update_assignment(
        &self,
        assignment_id: &str,
        person_id: &str,
    ) -> RepositoryResult<Assignment> {
        if person_id.trim().is_empty() {
            return Err(RepositoryError::ValidationError(
                "人员ID不能为空".to_string(),
            ));
        }

        let now = Utc::now();
        let affected = {
            let conn = self.get_conn()?;
            conn.execute(
                "UPDATE assignment SET person_id = ?, updated_at = ? WHERE assignment_id = ?",
                params![person_id, now, assignment_id],
            )?
        };
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Assignment".to_string(),
                id: assignment_id.to_string(),
            });
        }
        self.find_by_id(assignment_id)
    }

    async fn delete_assignment(&self, assignment_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM assignment WHERE assignment_id = ?",
            params![assignment_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Assignment".to_string(),
                id: assignment_id.to_string(),
            });
        }
        Ok(())
    }
}
