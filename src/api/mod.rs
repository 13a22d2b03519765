// ==========================================
// 产线人力平衡系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行入口调用
// ==========================================

pub mod error;
pub mod line_api;
pub mod plan_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use line_api::{LineActivities, LineApi, LineSummary};
pub use plan_api::{DailyPlanFailure, DailyPlanRequest, DailyPlanResult, PlanApi};
