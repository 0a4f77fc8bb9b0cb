// ==========================================
// 军人勤务排班系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::RosterApi;
use crate::config::{ConfigManager, RosterConfigReader};
use crate::db::open_and_init;
use crate::repository::{
    SqliteAssignmentRepository, SqliteDutyTypeRepository, SqlitePersonnelRepository,
    SqliteRankingRepository,
};

/// 应用状态
///
/// 包含排班API实例和共享资源,由宿主 (CLI/桌面壳) 作为全局状态管理
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 排班API
    pub roster_api: Arc<RosterApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 人员目录仓储（数据准备用）
    pub person_repo: Arc<SqlitePersonnelRepository>,

    /// 勤务类型目录仓储（数据准备用）
    pub duty_type_repo: Arc<SqliteDutyTypeRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库连接并确保 schema 存在
    /// 2. 初始化所有Repository
    /// 3. 读取排班配置
    /// 4. 创建 RosterApi 实例
    pub async fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_and_init(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let person_repo = Arc::new(SqlitePersonnelRepository::new(conn.clone()));
        let duty_type_repo = Arc::new(SqliteDutyTypeRepository::new(conn.clone()));
        let assignment_repo = Arc::new(SqliteAssignmentRepository::new(conn.clone()));
        let ranking_repo = Arc::new(SqliteRankingRepository::new(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法初始化配置管理器: {}", e))?,
        );
        let week_start = config_manager
            .get_week_start()
            .await
            .map_err(|e| format!("无法读取周起始日配置: {}", e))?;
        let suggestion_limit = config_manager
            .get_suggestion_limit()
            .await
            .map_err(|e| format!("无法读取建议条数配置: {}", e))?;
        match config_manager.get_config_snapshot() {
            Ok(snapshot) => tracing::debug!(snapshot, "生效配置快照"),
            Err(e) => tracing::warn!("配置快照读取失败: {}", e),
        }

        let roster_api = Arc::new(RosterApi::new(
            person_repo.clone(),
            duty_type_repo.clone(),
            assignment_repo,
            ranking_repo,
            week_start,
            suggestion_limit,
        ));

        Ok(Self {
            db_path,
            roster_api,
            config_manager,
            person_repo,
            duty_type_repo,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先使用系统数据目录,不可用时回退到当前目录。
pub fn get_default_db_path() -> String {
    let base: PathBuf = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    let dir = base.join("duty-roster");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!("无法创建数据目录 {:?}: {},回退当前目录", dir, e);
        return "roster.db".to_string();
    }
    dir.join("roster.db").to_string_lossy().to_string()
}
