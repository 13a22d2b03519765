// ==========================================
// 产线人力平衡系统 - 工序导入 Trait
// ==========================================
// 职责: 定义工序导入接口（不包含实现）
// ==========================================

use crate::importer::error::ImportResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 原始表格（表头 + 数据行，单元格已 TRIM）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// 原始数据行
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_number: usize, // 数据行号 (1-based, 不含表头)
    pub cells: Vec<String>,
}

/// 工序导入结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityImportReport {
    pub batch_id: String,
    pub line_id: i64,
    pub file_name: String,
    pub total_rows: usize,
    pub imported_rows: usize,
    pub work_content_sec: i64,
    pub elapsed_ms: u128,
}

// ==========================================
// ActivityImporter Trait
// ==========================================
// 用途: 工序导入主接口
// 实现者: ActivityImporterImpl
#[async_trait]
pub trait ActivityImporter: Send + Sync {
    /// 从表格文件导入产线工序（整体替换）
    ///
    /// # 参数
    /// - line_id: 目标产线
    /// - file_path: 文件路径（.csv / .xlsx / .xls）
    ///
    /// # 返回
    /// - Ok(ActivityImportReport): 导入成功
    /// - Err(ImportError::ValidationFailed): 任一行违规，整批拒绝，原工序不变
    /// - Err: 文件/数据库错误
    ///
    /// # 导入流程
    /// 1. 文件读取与解析
    /// 2. 列数校验 + 按列位置映射
    /// 3. 行级校验（缺失值、整数、正工时）
    /// 4. 批级校验（序号唯一、连续递增）
    /// 5. 事务化整体替换
    async fn import_file(&self, line_id: i64, file_path: &Path)
        -> ImportResult<ActivityImportReport>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表格
    ///
    /// # 返回
    /// - Ok(RawSheet): 表头 + 数据行（已跳过完全空白行）
    /// - Err: 文件读取错误、格式错误
    fn parse_to_raw_sheet(&self, file_path: &Path) -> ImportResult<RawSheet>;
}
