// ==========================================
// 产线人力平衡系统 - 导入层
// ==========================================
// 职责: 外部工序表导入,生成内部工序数据
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod activity_importer_impl;
pub mod activity_importer_trait;
pub mod activity_validator;
pub mod error;
pub mod file_parser;

// 重导出核心类型
pub use activity_importer_impl::ActivityImporterImpl;
pub use activity_validator::{parse_integral, ActivityValidator, EXPECTED_COLUMNS};
pub use error::{ImportError, ImportResult, ImportViolation};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};

// 重导出 Trait 接口
pub use activity_importer_trait::{
    ActivityImportReport, ActivityImporter, FileParser, RawRow, RawSheet,
};
