// ==========================================
// 产线人力平衡系统 - 排配配置读取 Trait
// ==========================================
// 职责: 定义排配计算所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::engine::BalanceThresholds;
use std::error::Error;

// ==========================================
// PlanningConfigReader Trait
// ==========================================
// 用途: 排配计算所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait PlanningConfigReader: Send + Sync {
    /// 获取默认班次时长（分钟）
    ///
    /// # 默认值
    /// - 480
    fn get_default_shift_minutes(&self) -> Result<u32, Box<dyn Error>>;

    /// 获取平衡阈值
    ///
    /// # 默认值
    /// - upper_tolerance_sec = 2.0
    /// - lower_tolerance_sec = 10.0
    /// - under_load_ratio = 0.6
    fn get_balance_thresholds(&self) -> Result<BalanceThresholds, Box<dyn Error>>;
}
