// ==========================================
// 产线人力平衡系统 - 导出层
// ==========================================
// 职责: 分配结果导出（CSV）
// 红线: 只读消费 AllocationResult，不做计算
// ==========================================

pub mod allocation_exporter;
pub mod error;

pub use allocation_exporter::{AllocationExporter, EXPORT_HEADERS};
pub use error::{ExportError, ExportResult};
