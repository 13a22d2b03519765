// ==========================================
// 产线人力平衡系统 - 引擎层
// ==========================================
// 职责: 实现线平衡分配规则,不拼 SQL
// 红线: Engine 不做 I/O, 输入为已物化的工序快照
// ==========================================

pub mod daily_planner;
pub mod error;
pub mod line_balancer;

// 重导出核心引擎
pub use daily_planner::{DailyPlanner, PlanJob, PlanJobOutcome};
pub use error::{EngineError, EngineResult};
pub use line_balancer::{
    BalanceThresholds, LineBalancer, DEFAULT_LOWER_TOLERANCE_SEC, DEFAULT_UPPER_TOLERANCE_SEC,
    UNDER_LOAD_RATIO,
};
