// ==========================================
// 军人勤务排班系统 - 人员目录仓储 (SQLite 参考实现)
// ==========================================
// 红线: Repository 不含业务逻辑;所有查询参数化,防止 SQL 注入
// ==========================================

use crate::domain::Person;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::traits::PersonnelDirectory;
use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// SqlitePersonnelRepository - 人员目录仓储
// ==========================================
pub struct SqlitePersonnelRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePersonnelRepository {
    /// 创建新的仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Person> {
        Ok(Person {
            person_id: row.get("person_id")?,
            name: row.get("name")?,
            rank: row.get("rank")?,
            qualification: row.get("qualification")?,
            entry_date: row.get("entry_date")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// 插入人员记录（测试与数据准备用）
    pub fn insert(&self, person: &Person) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO person (
                    person_id, name, rank, qualification, entry_date,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
            params![
                &person.person_id,
                &person.name,
                &person.rank,
                &person.qualification,
                &person.entry_date,
                &person.created_at,
                &person.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 按 id 查询人员
    pub fn find_by_id(&self, person_id: &str) -> RepositoryResult<Option<Person>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT person_id, name, rank, qualification, entry_date,
                      created_at, updated_at
               FROM person WHERE person_id = ?"#,
        )?;
        let mut rows = stmt.query_map(params![person_id], |row| Self::map_row(row))?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PersonnelDirectory for SqlitePersonnelRepository {
    async fn list_persons(&self) -> RepositoryResult<Vec<Person>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT person_id, name, rank, qualification, entry_date,
                      created_at, updated_at
               FROM person
               ORDER BY name, person_id"#,
        )?;
        let persons = stmt
            .query_map([], |row| Self::map_row(row))?
            .collect::<Result<Vec<Person>, _>>()?;
        Ok(persons)
    }
}
