// ==========================================
// 产线人力平衡系统 - 日计划批量计算
// ==========================================
// 职责: 多条产线的分配计算并发执行
// 说明: 各产线计算相互独立，无需加锁或协调
// ==========================================

use crate::domain::activity::Activity;
use crate::domain::allocation::AllocationResult;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::line_balancer::LineBalancer;
use futures::future::join_all;
use tracing::{error, info};

/// 单条产线的计算任务
#[derive(Debug, Clone)]
pub struct PlanJob {
    pub line_id: i64,
    pub line_name: String,
    pub activities: Vec<Activity>,
    pub planned_qty: u32,
    pub shift_minutes: u32,
}

/// 单条产线的计算结果
#[derive(Debug)]
pub struct PlanJobOutcome {
    pub line_id: i64,
    pub line_name: String,
    pub result: EngineResult<AllocationResult>,
}

// ==========================================
// DailyPlanner - 日计划批量计算器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyPlanner {
    balancer: LineBalancer,
}

impl DailyPlanner {
    pub fn new(balancer: LineBalancer) -> Self {
        Self { balancer }
    }

    /// 并发计算多条产线（结果顺序与输入一致）
    ///
    /// # 说明
    /// - 每条产线在 tokio 阻塞线程池中独立计算
    /// - 单条产线失败不影响其他产线
    pub async fn allocate_all(&self, jobs: Vec<PlanJob>) -> Vec<PlanJobOutcome> {
        info!(count = jobs.len(), "开始批量计算产线分配");

        let balancer = self.balancer;
        let tasks = jobs.into_iter().map(|job| async move {
            let line_id = job.line_id;
            let line_name = job.line_name.clone();
            let handle = tokio::task::spawn_blocking(move || {
                balancer.allocate_for_line(
                    &job.line_name,
                    &job.activities,
                    job.shift_minutes,
                    job.planned_qty,
                )
            });

            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!(line_id = line_id, error = %e, "产线分配任务异常退出");
                    Err(EngineError::TaskFailed(e.to_string()))
                }
            };

            PlanJobOutcome {
                line_id,
                line_name,
                result,
            }
        });

        let outcomes = join_all(tasks).await;

        info!(
            total = outcomes.len(),
            success = outcomes.iter().filter(|o| o.result.is_ok()).count(),
            failed = outcomes.iter().filter(|o| o.result.is_err()).count(),
            "批量计算完成"
        );

        outcomes
    }

    /// 顺序计算，作为并发结果的对照
    #[cfg(test)]
    fn allocate_all_blocking(&self, jobs: Vec<PlanJob>) -> Vec<PlanJobOutcome> {
        jobs.into_iter()
            .map(|job| PlanJobOutcome {
                line_id: job.line_id,
                result: self.balancer.allocate_for_line(
                    &job.line_name,
                    &job.activities,
                    job.shift_minutes,
                    job.planned_qty,
                ),
                line_name: job.line_name,
            })
            .collect()
    }
}
