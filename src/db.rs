// ==========================================
// 军人勤务排班系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 参考实现的建表语句集中于此，保证唯一索引与引擎占用约束一致
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化参考实现所需的全部表与索引（幂等）
///
/// 占用约束与引擎不变量对齐：
/// - idx_assignment_cell: 一个 (勤务类型, 日期) 格子至多一条安排
/// - idx_assignment_person_day: 一人一天至多占用一个格子（跨所有勤务类型；
///   SQLite 唯一索引允许多个 NULL person_id，不影响"未指派"行）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS person (
            person_id     TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            rank          TEXT NOT NULL,
            qualification TEXT,
            entry_date    TEXT,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS duty_type (
            duty_type_id  TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            description   TEXT,
            display_order INTEGER NOT NULL DEFAULT 0,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS assignment (
            assignment_id TEXT PRIMARY KEY,
            duty_type_id  TEXT NOT NULL REFERENCES duty_type(duty_type_id),
            person_id     TEXT REFERENCES person(person_id),
            duty_date     TEXT NOT NULL,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_assignment_cell
            ON assignment(duty_type_id, duty_date);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_assignment_person_day
            ON assignment(person_id, duty_date);
        CREATE INDEX IF NOT EXISTS idx_assignment_date
            ON assignment(duty_date);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id   TEXT NOT NULL DEFAULT 'global',
            key        TEXT NOT NULL,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )
}

/// 打开连接、应用 PRAGMA 并确保 schema 存在（应用启动入口使用）
pub fn open_and_init(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = open_sqlite_connection(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}
