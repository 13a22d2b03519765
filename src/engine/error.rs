// ==========================================
// 产线人力平衡系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: "无工序" 不是错误，见 AllocationResult.issue
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 输入参数错误 =====
    #[error("参数无效 ({field}): {message}")]
    InvalidParameter { field: String, message: String },

    #[error("工序数据无效 (seq_no={seq_no}): {message}")]
    InvalidActivity { seq_no: i64, message: String },

    #[error("平衡阈值配置无效: {0}")]
    InvalidThresholds(String),

    // ===== 执行错误 =====
    #[error("计算任务失败: {0}")]
    TaskFailed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
