// ==========================================
// 产线人力平衡系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod activity;
pub mod allocation;
pub mod line;
pub mod types;

// 重导出核心类型
pub use activity::{work_content_sec, Activity, NewActivity, RawActivityRecord};
pub use allocation::{AllocationRequest, AllocationResult, OperatorAssignment};
pub use line::Line;
pub use types::{AllocationIssue, OperatorStatus};
