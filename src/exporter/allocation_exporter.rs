// ==========================================
// 产线人力平衡系统 - 分配结果 CSV 导出
// ==========================================
// 格式: Line,Operator,Activities,Total Time (s),Status
// - 每个作业员一行，工序描述以 ", " 连接
// - 无工序的产线输出一行，状态为 NO ACTIVITIES
// ==========================================

use crate::domain::AllocationResult;
use crate::exporter::error::ExportResult;
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// CSV 表头
pub const EXPORT_HEADERS: [&str; 5] = ["Line", "Operator", "Activities", "Total Time (s)", "Status"];

const ACTIVITY_SEPARATOR: &str = ", ";

pub struct AllocationExporter;

impl AllocationExporter {
    /// 写出分配结果到任意 Writer
    ///
    /// # 返回
    /// - Ok(usize): 写出的数据行数（不含表头）
    pub fn write_csv<W: Write>(&self, results: &[AllocationResult], writer: W) -> ExportResult<usize> {
        let mut wtr = Writer::from_writer(writer);
        wtr.write_record(EXPORT_HEADERS)?;

        let mut rows = 0;
        for result in results {
            if !result.has_activities() {
                let label = result
                    .issue
                    .map(|issue| issue.label())
                    .unwrap_or_default();
                wtr.write_record([result.line_name.as_str(), "", "", "0", label])?;
                rows += 1;
                continue;
            }

            for op in &result.operators {
                wtr.write_record([
                    result.line_name.clone(),
                    op.operator_name(),
                    op.joined_descriptions(ACTIVITY_SEPARATOR),
                    op.total_sec.to_string(),
                    op.status.label().to_string(),
                ])?;
                rows += 1;
            }
        }

        wtr.flush()?;
        Ok(rows)
    }

    /// 写出分配结果到文件（覆盖）
    pub fn write_csv_file(&self, results: &[AllocationResult], path: &Path) -> ExportResult<usize> {
        let file = File::create(path)?;
        let rows = self.write_csv(results, file)?;
        info!(path = %path.display(), rows = rows, lines = results.len(), "分配结果已导出");
        Ok(rows)
    }
}
