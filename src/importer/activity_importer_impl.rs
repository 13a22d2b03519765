// ==========================================
// 产线人力平衡系统 - 工序导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 映射 → 校验 → 整体替换
// 红线: 任一违规整批拒绝，不写入任何数据
// ==========================================

use crate::importer::activity_importer_trait::{
    ActivityImportReport, ActivityImporter, FileParser,
};
use crate::importer::activity_validator::ActivityValidator;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::{ActivityRepository, LineRepository};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ActivityImporterImpl - 工序导入器实现
// ==========================================
pub struct ActivityImporterImpl {
    // 数据访问层
    line_repo: Arc<LineRepository>,
    activity_repo: Arc<ActivityRepository>,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    validator: ActivityValidator,
}

impl ActivityImporterImpl {
    /// 创建新的 ActivityImporter 实例
    ///
    /// # 参数
    /// - line_repo: 产线仓储（校验产线存在）
    /// - activity_repo: 工序仓储（整体替换）
    /// - file_parser: 文件解析器
    pub fn new(
        line_repo: Arc<LineRepository>,
        activity_repo: Arc<ActivityRepository>,
        file_parser: Box<dyn FileParser>,
    ) -> Self {
        Self {
            line_repo,
            activity_repo,
            file_parser,
            validator: ActivityValidator,
        }
    }
}

#[async_trait::async_trait]
impl ActivityImporter for ActivityImporterImpl {
    #[instrument(skip(self, file_path))]
    async fn import_file(
        &self,
        line_id: i64,
        file_path: &Path,
    ) -> ImportResult<ActivityImportReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        info!(batch_id = %batch_id, file = %file_name, "开始导入工序数据");

        // === 前置: 产线存在性 ===
        if self.line_repo.find_by_id(line_id)?.is_none() {
            warn!(line_id = line_id, "导入目标产线不存在");
            return Err(ImportError::LineNotFound(line_id));
        }

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let sheet = self.file_parser.parse_to_raw_sheet(file_path)?;
        let total_rows = sheet.rows.len();
        info!(total_rows = total_rows, "文件解析完成");

        // === 步骤 2: 映射 + 行级/批级校验 ===
        debug!("步骤 2: 列映射与校验");
        let (activities, violations) = self.validator.validate_sheet(&sheet);
        if !violations.is_empty() {
            warn!(
                batch_id = %batch_id,
                violations = violations.len(),
                "工序数据校验失败，整批拒绝"
            );
            for v in &violations {
                debug!(violation = %v, "校验违规");
            }
            return Err(ImportError::ValidationFailed { violations });
        }

        // === 步骤 3: 事务化整体替换 ===
        debug!("步骤 3: 整体替换产线工序");
        let imported_rows = self.activity_repo.replace_for_line(line_id, &activities)?;
        let work_content_sec: i64 = activities.iter().map(|a| a.duration_sec).sum();

        let elapsed_ms = start_time.elapsed().as_millis();
        info!(
            batch_id = %batch_id,
            imported_rows = imported_rows,
            work_content_sec = work_content_sec,
            elapsed_ms = elapsed_ms as u64,
            "工序导入完成"
        );

        Ok(ActivityImportReport {
            batch_id,
            line_id,
            file_name,
            total_rows,
            imported_rows,
            work_content_sec,
            elapsed_ms,
        })
    }
}
