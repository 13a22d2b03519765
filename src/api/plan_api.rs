// ==========================================
// 产线人力平衡系统 - 人力分配 API
// ==========================================
// 职责: 单产线分配计算、日计划批量计算、结果导出
// 说明: 读取工序快照 → 调用纯引擎 → 返回只读结果
// ==========================================

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::PlanningConfigReader;
use crate::domain::{AllocationRequest, AllocationResult};
use crate::engine::{DailyPlanner, LineBalancer, PlanJob};
use crate::exporter::AllocationExporter;
use crate::perf::PerfGuard;
use crate::repository::{ActivityRepository, LineRepository};

// ==========================================
// DTO
// ==========================================

/// 日计划请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPlanRequest {
    pub plan_date: NaiveDate,
    pub shift_minutes: i64,
    /// line_id → 计划产量；缺失或 <= 0 的产线不参与计算
    pub quantities: BTreeMap<i64, i64>,
}

/// 单条产线计算失败记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPlanFailure {
    pub line_id: i64,
    pub line_name: String,
    pub reason: String,
}

/// 日计划结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPlanResult {
    pub plan_date: NaiveDate,
    pub shift_minutes: u32,
    pub allocations: Vec<AllocationResult>,
    pub failures: Vec<DailyPlanFailure>,
    pub skipped_line_ids: Vec<i64>,
}

impl DailyPlanResult {
    /// 全部产线合计人数
    pub fn total_manpower(&self) -> usize {
        self.allocations.iter().map(|a| a.manpower).sum()
    }
}

fn positive_u32(field: &str, value: i64) -> ApiResult<u32> {
    if value <= 0 {
        return Err(ApiError::InvalidInput(format!(
            "{} 必须大于 0，实际 {}",
            field, value
        )));
    }
    u32::try_from(value)
        .map_err(|_| ApiError::InvalidInput(format!("{} 超出范围: {}", field, value)))
}

// ==========================================
// PlanApi - 人力分配 API
// ==========================================
pub struct PlanApi {
    line_repo: Arc<LineRepository>,
    activity_repo: Arc<ActivityRepository>,
    config: Arc<dyn PlanningConfigReader>,
    exporter: AllocationExporter,
}

impl PlanApi {
    /// 创建新的PlanApi实例
    pub fn new(
        line_repo: Arc<LineRepository>,
        activity_repo: Arc<ActivityRepository>,
        config: Arc<dyn PlanningConfigReader>,
    ) -> Self {
        Self {
            line_repo,
            activity_repo,
            config,
            exporter: AllocationExporter,
        }
    }

    /// 按当前配置的阈值构造分配引擎
    fn balancer(&self) -> ApiResult<LineBalancer> {
        let thresholds = self
            .config
            .get_balance_thresholds()
            .map_err(|e| ApiError::InternalError(format!("读取平衡阈值失败: {}", e)))?;
        Ok(LineBalancer::with_thresholds(thresholds)?)
    }

    /// 配置的默认班次时长（分钟）
    pub fn default_shift_minutes(&self) -> ApiResult<u32> {
        self.config
            .get_default_shift_minutes()
            .map_err(|e| ApiError::InternalError(format!("读取默认班次失败: {}", e)))
    }

    // ==========================================
    // 单产线分配
    // ==========================================

    /// 计算单条产线的人力分配
    ///
    /// # 参数
    /// - line_id: 产线ID
    /// - planned_qty: 计划产量（> 0）
    /// - shift_minutes: 班次时长（分钟，> 0）
    ///
    /// # 返回
    /// - Ok(AllocationResult): 无工序时 issue = NoActivities
    /// - Err(InvalidInput): 参数非法
    /// - Err(NotFound): 产线不存在
    #[instrument(skip(self))]
    pub fn compute_allocation(
        &self,
        line_id: i64,
        planned_qty: i64,
        shift_minutes: i64,
    ) -> ApiResult<AllocationResult> {
        let _perf = PerfGuard::new("compute_allocation");

        let request = AllocationRequest::new(
            line_id,
            positive_u32("planned_qty", planned_qty)?,
            positive_u32("shift_minutes", shift_minutes)?,
        );
        self.run_request(&request)
    }

    fn run_request(&self, request: &AllocationRequest) -> ApiResult<AllocationResult> {
        let line = self
            .line_repo
            .find_by_id(request.line_id)?
            .ok_or_else(|| ApiError::NotFound(format!("产线(id={})不存在", request.line_id)))?;
        let activities = self.activity_repo.find_by_line_ordered(request.line_id)?;

        let result = self.balancer()?.allocate_for_line(
            &line.line_name,
            &activities,
            request.shift_minutes,
            request.planned_qty,
        )?;

        info!(
            line_id = request.line_id,
            manpower = result.manpower,
            takt_time_sec = result.takt_time_sec,
            "产线分配完成"
        );
        Ok(result)
    }

    // ==========================================
    // 日计划批量分配
    // ==========================================

    /// 计算日计划（多产线并发）
    ///
    /// # 说明
    /// - 按 line_id 升序遍历全部产线
    /// - 产量缺失或 <= 0 的产线跳过，记录在 skipped_line_ids
    /// - 请求中引用不存在的产线 → NotFound
    pub async fn compute_daily_plan(&self, request: DailyPlanRequest) -> ApiResult<DailyPlanResult> {
        let shift_minutes = positive_u32("shift_minutes", request.shift_minutes)?;

        let (jobs, skipped_line_ids) = {
            let _perf = PerfGuard::new("compute_daily_plan.load");
            self.build_plan_jobs(&request.quantities, shift_minutes)?
        };

        let planner = DailyPlanner::new(self.balancer()?);
        let outcomes = planner.allocate_all(jobs).await;

        let mut allocations = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome.result {
                Ok(result) => allocations.push(result),
                Err(e) => {
                    warn!(line_id = outcome.line_id, error = %e, "产线分配失败");
                    failures.push(DailyPlanFailure {
                        line_id: outcome.line_id,
                        line_name: outcome.line_name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            plan_date = %request.plan_date,
            lines = allocations.len(),
            skipped = skipped_line_ids.len(),
            failed = failures.len(),
            "日计划计算完成"
        );

        Ok(DailyPlanResult {
            plan_date: request.plan_date,
            shift_minutes,
            allocations,
            failures,
            skipped_line_ids,
        })
    }

    fn build_plan_jobs(
        &self,
        quantities: &BTreeMap<i64, i64>,
        shift_minutes: u32,
    ) -> ApiResult<(Vec<PlanJob>, Vec<i64>)> {
        let lines = self.line_repo.list_all()?;

        if let Some(unknown) = quantities
            .keys()
            .find(|id| !lines.iter().any(|l| l.line_id == **id))
        {
            return Err(ApiError::NotFound(format!("产线(id={})不存在", unknown)));
        }

        let mut jobs = Vec::new();
        let mut skipped = Vec::new();
        for line in lines {
            let qty = quantities.get(&line.line_id).copied().unwrap_or(0);
            if qty <= 0 {
                skipped.push(line.line_id);
                continue;
            }
            jobs.push(PlanJob {
                line_id: line.line_id,
                activities: self.activity_repo.find_by_line_ordered(line.line_id)?,
                line_name: line.line_name,
                planned_qty: positive_u32("planned_qty", qty)?,
                shift_minutes,
            });
        }
        Ok((jobs, skipped))
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 导出分配结果为 CSV
    ///
    /// # 返回
    /// - Ok(usize): 写出的数据行数
    pub fn export_allocations_csv(
        &self,
        results: &[AllocationResult],
        path: &Path,
    ) -> ApiResult<usize> {
        self.exporter
            .write_csv_file(results, path)
            .map_err(|e| ApiError::ExportError(e.to_string()))
    }
}
