// ==========================================
// 产线人力平衡系统 - 产线与工序 API
// ==========================================
// 职责: 产线管理、工序录入、工序表导入
// ==========================================

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{work_content_sec, Activity, Line, NewActivity};
use crate::importer::{ActivityImportReport, ActivityImporter};
use crate::repository::{ActivityRepository, LineRepository, RepositoryError};

// ==========================================
// DTO
// ==========================================

/// 产线概要（列表展示用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSummary {
    pub line: Line,
    pub activity_count: usize,
    pub work_content_sec: i64,
}

/// 产线工序明细
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineActivities {
    pub line: Line,
    pub activities: Vec<Activity>,
    pub work_content_sec: i64,
}

// ==========================================
// LineApi - 产线 API
// ==========================================
pub struct LineApi {
    line_repo: Arc<LineRepository>,
    activity_repo: Arc<ActivityRepository>,
    importer: Arc<dyn ActivityImporter>,
}

impl LineApi {
    /// 创建新的LineApi实例
    pub fn new(
        line_repo: Arc<LineRepository>,
        activity_repo: Arc<ActivityRepository>,
        importer: Arc<dyn ActivityImporter>,
    ) -> Self {
        Self {
            line_repo,
            activity_repo,
            importer,
        }
    }

    fn require_line(&self, line_id: i64) -> ApiResult<Line> {
        self.line_repo
            .find_by_id(line_id)?
            .ok_or_else(|| ApiError::NotFound(format!("产线(id={})不存在", line_id)))
    }

    /// 创建产线
    ///
    /// # 参数
    /// - line_name: 产线名称（去除首尾空白后不能为空，且不能重复）
    #[instrument(skip(self))]
    pub fn create_line(&self, line_name: &str) -> ApiResult<Line> {
        let name = line_name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("产线名称不能为空".to_string()));
        }
        if self.line_repo.find_by_name(name)?.is_some() {
            return Err(ApiError::BusinessRuleViolation(format!(
                "产线名称已存在: {}",
                name
            )));
        }

        let line = self.line_repo.create(name)?;
        info!(line_id = line.line_id, line_name = %line.line_name, "产线已创建");
        Ok(line)
    }

    /// 查询全部产线（含工序数与工作量）
    pub fn list_lines(&self) -> ApiResult<Vec<LineSummary>> {
        self.line_repo
            .list_all()?
            .into_iter()
            .map(|line| {
                let activity_count = self.activity_repo.count_by_line(line.line_id)?;
                let work_content_sec = self.activity_repo.work_content_sec(line.line_id)?;
                Ok(LineSummary {
                    line,
                    activity_count,
                    work_content_sec,
                })
            })
            .collect()
    }

    /// 查询产线工序（按 seq_no 升序）
    pub fn get_line_activities(&self, line_id: i64) -> ApiResult<LineActivities> {
        let line = self.require_line(line_id)?;
        let activities = self.activity_repo.find_by_line_ordered(line_id)?;
        let work_content_sec = work_content_sec(&activities);
        Ok(LineActivities {
            line,
            activities,
            work_content_sec,
        })
    }

    /// 人工录入单条工序
    ///
    /// # 返回
    /// - Err(InvalidInput): 描述为空或工时 <= 0
    /// - Err(NotFound): 产线不存在
    /// - Err(BusinessRuleViolation): 序号在该产线已存在
    #[instrument(skip(self, description))]
    pub fn add_activity(
        &self,
        line_id: i64,
        seq_no: i64,
        description: &str,
        duration_sec: i64,
    ) -> ApiResult<Activity> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ApiError::InvalidInput("工序描述不能为空".to_string()));
        }
        if duration_sec <= 0 {
            return Err(ApiError::InvalidInput(format!(
                "工时必须为正整数: {}",
                duration_sec
            )));
        }
        self.require_line(line_id)?;

        let new_activity = NewActivity {
            seq_no,
            description: description.to_string(),
            duration_sec,
        };
        let activity_id = match self.activity_repo.insert(line_id, &new_activity) {
            Ok(id) => id,
            Err(RepositoryError::UniqueConstraintViolation(_)) => {
                return Err(ApiError::BusinessRuleViolation(format!(
                    "产线(id={})已存在序号 {} 的工序",
                    line_id, seq_no
                )));
            }
            Err(e) => return Err(e.into()),
        };

        info!(line_id = line_id, seq_no = seq_no, "工序已录入");
        Ok(Activity {
            activity_id,
            line_id,
            seq_no,
            description: new_activity.description,
            duration_sec,
        })
    }

    /// 从表格文件导入工序（整体替换，任一违规整批拒绝）
    pub async fn import_activities(
        &self,
        line_id: i64,
        file_path: &Path,
    ) -> ApiResult<ActivityImportReport> {
        Ok(self.importer.import_file(line_id, file_path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use crate::importer::{ActivityImporterImpl, UniversalFileParser};
    use rusqlite::Connection;
    use std::sync::Mutex;

    fn api() -> LineApi {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let line_repo = Arc::new(LineRepository::from_connection(conn.clone()));
        let activity_repo = Arc::new(ActivityRepository::from_connection(conn));
        let importer = Arc::new(ActivityImporterImpl::new(
            line_repo.clone(),
            activity_repo.clone(),
            Box::new(UniversalFileParser),
        ));
        LineApi::new(line_repo, activity_repo, importer)
    }

    #[test]
    fn test_create_line_validation() {
        let api = api();
        assert!(matches!(api.create_line("   "), Err(ApiError::InvalidInput(_))));

        let line = api.create_line("  装配一线 ").unwrap();
        assert_eq!(line.line_name, "装配一线");
        assert!(matches!(
            api.create_line("装配一线"),
            Err(ApiError::BusinessRuleViolation(_))
        ));
    }

    #[test]
    fn test_add_activity_rules() {
        let api = api();
        let line = api.create_line("L1").unwrap();

        assert!(matches!(
            api.add_activity(line.line_id, 1, "A", 0),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            api.add_activity(999, 1, "A", 10),
            Err(ApiError::NotFound(_))
        ));

        api.add_activity(line.line_id, 2, "B", 20).unwrap();
        api.add_activity(line.line_id, 1, "A", 10).unwrap();
        assert!(matches!(
            api.add_activity(line.line_id, 1, "A2", 10),
            Err(ApiError::BusinessRuleViolation(_))
        ));

        let detail = api.get_line_activities(line.line_id).unwrap();
        assert_eq!(detail.work_content_sec, 30);
        assert_eq!(detail.activities[0].seq_no, 1);
    }

    #[test]
    fn test_list_lines_summary() {
        let api = api();
        let l1 = api.create_line("L1").unwrap();
        api.create_line("L2").unwrap();
        api.add_activity(l1.line_id, 1, "A", 12).unwrap();

        let lines = api.list_lines().unwrap();
        assert_eq!(lines.len(), 2);
        let s1 = lines.iter().find(|s| s.line.line_id == l1.line_id).unwrap();
        assert_eq!(s1.activity_count, 1);
        assert_eq!(s1.work_content_sec, 12);
    }
}
