// ==========================================
// 产线人力平衡系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{LineApi, PlanApi};
use crate::config::ConfigManager;
use crate::db::open_and_init;
use crate::importer::{ActivityImporter, ActivityImporterImpl, UniversalFileParser};
use crate::perf::install_sqlite_tracing;
use crate::repository::{ActivityRepository, LineRepository};

/// 数据库路径环境变量
pub const ENV_DB_PATH: &str = "LAPS_DB_PATH";

const DB_FILE_NAME: &str = "laps.db";

/// 应用状态
///
/// 包含所有API实例和共享资源，所有仓储共用同一连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 产线与工序API
    pub line_api: Arc<LineApi>,

    /// 人力分配API
    pub plan_api: Arc<PlanApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 可用于测试）
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接，确保 schema 存在）
        let mut conn = open_and_init(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        install_sqlite_tracing(&mut conn);
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let line_repo = Arc::new(LineRepository::from_connection(conn.clone()));
        let activity_repo = Arc::new(ActivityRepository::from_connection(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化导入器与API层
        // ==========================================
        let importer: Arc<dyn ActivityImporter> = Arc::new(ActivityImporterImpl::new(
            line_repo.clone(),
            activity_repo.clone(),
            Box::new(UniversalFileParser),
        ));

        let line_api = Arc::new(LineApi::new(
            line_repo.clone(),
            activity_repo.clone(),
            importer,
        ));
        let plan_api = Arc::new(PlanApi::new(
            line_repo,
            activity_repo,
            config_manager.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            line_api,
            plan_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 LAPS_DB_PATH > 用户数据目录/laps/laps.db > ./laps.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(ENV_DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(".").join(DB_FILE_NAME);
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("laps");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}
