// ==========================================
// 产线人力平衡系统 - 配置层
// ==========================================
// 职责: 系统配置管理 (默认班次、平衡阈值)
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod planning_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DEFAULT_SHIFT_MINUTES};
pub use planning_config_trait::PlanningConfigReader;
