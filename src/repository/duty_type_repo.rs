// ==========================================
// 军人勤务排班系统 - 勤务类型目录仓储 (SQLite 参考实现)
// ==========================================
// 红线: Repository 不含业务逻辑;所有查询参数化,防止 SQL 注入
// ==========================================

use crate::domain::DutyType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::traits::DutyTypeDirectory;
use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// SqliteDutyTypeRepository - 勤务类型目录仓储
// ==========================================
pub struct SqliteDutyTypeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDutyTypeRepository {
    /// 创建新的仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<DutyType> {
        Ok(DutyType {
            duty_type_id: row.get("duty_type_id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            display_order: row.get("display_order")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// 插入勤务类型记录（测试与数据准备用）
    pub fn insert(&self, duty_type: &DutyType) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"INSERT INTO duty_type (
                    duty_type_id, name, description, display_order,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?)"#,
            params![
                &duty_type.duty_type_id,
                &duty_type.name,
                &duty_type.description,
                &duty_type.display_order,
                &duty_type.created_at,
                &duty_type.updated_at,
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl DutyTypeDirectory for SqliteDutyTypeRepository {
    async fn list_duty_types(&self) -> RepositoryResult<Vec<DutyType>> {
        let conn = self.get_conn()?;
        // 契约要求按名称升序
        let mut stmt = conn.prepare(
            r#"SELECT duty_type_id, name, description, display_order,
                      created_at, updated_at
               FROM duty_type
               ORDER BY name, duty_type_id"#,
        )?;
        let duty_types = stmt
            .query_map([], |row| Self::map_row(row))?
            .collect::<Result<Vec<DutyType>, _>>()?;
        Ok(duty_types)
    }
}
