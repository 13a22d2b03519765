// ==========================================
// 产线人力平衡系统 - 线平衡分配引擎
// ==========================================
// 依据: 线平衡规则 - 节拍驱动的顺序装箱
// 红线: 工序顺序不可改变，工序不可拆分
// ==========================================
// 职责: 计算节拍、最少作业员人数、每人连续工序段及负荷状态
// 输入: 按 seq_no 排序的工序快照 + 班次分钟 + 计划产量
// 输出: AllocationResult (纯函数，无 I/O，无共享状态)
// ==========================================

use crate::domain::activity::{work_content_sec, Activity};
use crate::domain::allocation::{AllocationResult, OperatorAssignment};
use crate::domain::types::OperatorStatus;
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// 装箱上限容差（秒）：节拍 + 2s 内视为可装入
pub const DEFAULT_UPPER_TOLERANCE_SEC: f64 = 2.0;

/// 下限容差（秒）：节拍 - 10s，仅用于展示，不参与装箱
pub const DEFAULT_LOWER_TOLERANCE_SEC: f64 = 10.0;

/// 负荷不足比例：低于 60% 节拍判定为 UNDER
pub const UNDER_LOAD_RATIO: f64 = 0.6;

// ==========================================
// BalanceThresholds - 平衡阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceThresholds {
    pub upper_tolerance_sec: f64,
    pub lower_tolerance_sec: f64,
    pub under_load_ratio: f64,
}

impl Default for BalanceThresholds {
    fn default() -> Self {
        Self {
            upper_tolerance_sec: DEFAULT_UPPER_TOLERANCE_SEC,
            lower_tolerance_sec: DEFAULT_LOWER_TOLERANCE_SEC,
            under_load_ratio: UNDER_LOAD_RATIO,
        }
    }
}

impl BalanceThresholds {
    /// 校验阈值合法性
    pub fn validate(&self) -> EngineResult<()> {
        if !self.upper_tolerance_sec.is_finite() || self.upper_tolerance_sec < 0.0 {
            return Err(EngineError::InvalidThresholds(format!(
                "upper_tolerance_sec 必须为非负有限值: {}",
                self.upper_tolerance_sec
            )));
        }
        if !self.lower_tolerance_sec.is_finite() || self.lower_tolerance_sec < 0.0 {
            return Err(EngineError::InvalidThresholds(format!(
                "lower_tolerance_sec 必须为非负有限值: {}",
                self.lower_tolerance_sec
            )));
        }
        if !self.under_load_ratio.is_finite()
            || self.under_load_ratio < 0.0
            || self.under_load_ratio > 1.0
        {
            return Err(EngineError::InvalidThresholds(format!(
                "under_load_ratio 必须位于 [0, 1]: {}",
                self.under_load_ratio
            )));
        }
        Ok(())
    }
}

/// 单轮装箱中的一个作业员槽位（连续区间）
#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    start: usize,
    len: usize,
    total_sec: i64,
}

// ==========================================
// LineBalancer - 线平衡分配引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct LineBalancer {
    thresholds: BalanceThresholds,
}

impl LineBalancer {
    /// 使用默认阈值构造
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自定义阈值构造
    pub fn with_thresholds(thresholds: BalanceThresholds) -> EngineResult<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &BalanceThresholds {
        &self.thresholds
    }

    /// 节拍时间（秒/件）= 班次分钟 * 60 / 计划产量
    pub fn takt_time_sec(shift_minutes: u32, planned_qty: u32) -> EngineResult<f64> {
        if planned_qty == 0 {
            return Err(EngineError::InvalidParameter {
                field: "planned_qty".to_string(),
                message: "计划产量必须大于 0".to_string(),
            });
        }
        if shift_minutes == 0 {
            return Err(EngineError::InvalidParameter {
                field: "shift_minutes".to_string(),
                message: "班次时长必须大于 0".to_string(),
            });
        }
        Ok(f64::from(shift_minutes) * 60.0 / f64::from(planned_qty))
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算人力分配
    ///
    /// 规则：
    /// 1) 初始人数 = ceil(工作量 / 节拍)，不超过工序数
    /// 2) 顺序装箱：当前作业员已有工序、加上该工序超过上限且不是最后一人时，换下一人
    /// 3) 最大负荷 <= 上限 或 人数已达工序数 → 接受；否则人数 +1 从头重排
    /// 4) 负荷为 0 的作业员不输出
    ///
    /// # 参数
    /// - `activities`: 按 seq_no 排序的工序
    /// - `shift_minutes`: 班次时长（分钟，> 0）
    /// - `planned_qty`: 计划产量（> 0）
    ///
    /// # 返回
    /// - Ok(AllocationResult): 分配结果（无工序时带 NoActivities 标记）
    /// - Err(EngineError): 参数或工序数据非法
    #[instrument(skip(self, activities), fields(activity_count = activities.len()))]
    pub fn allocate(
        &self,
        activities: &[Activity],
        shift_minutes: u32,
        planned_qty: u32,
    ) -> EngineResult<AllocationResult> {
        let takt = Self::takt_time_sec(shift_minutes, planned_qty)?;

        if activities.is_empty() {
            debug!("产线无工序，返回空结果标记");
            return Ok(AllocationResult::no_activities(planned_qty, shift_minutes));
        }

        if let Some(bad) = activities.iter().find(|a| a.duration_sec <= 0) {
            return Err(EngineError::InvalidActivity {
                seq_no: bad.seq_no,
                message: format!("工时必须大于 0，实际 {}", bad.duration_sec),
            });
        }

        let work_content = work_content_sec(activities);
        let upper_bound = takt + self.thresholds.upper_tolerance_sec;
        let lower_bound = takt - self.thresholds.lower_tolerance_sec;
        let activity_count = activities.len();

        let initial_manpower = Self::seed_manpower(work_content, takt, activity_count);
        let mut manpower = initial_manpower;
        let mut iterations = 0usize;

        let buckets = loop {
            iterations += 1;
            let buckets = Self::fill_pass(activities, manpower, upper_bound);
            let max_total = buckets.iter().map(|b| b.total_sec).max().unwrap_or(0);

            debug!(
                iteration = iterations,
                manpower = manpower,
                max_total_sec = max_total,
                upper_bound_sec = upper_bound,
                "装箱完成一轮"
            );

            if max_total as f64 <= upper_bound || manpower >= activity_count {
                break buckets;
            }
            manpower += 1;
        };

        let max_operator_sec = buckets.iter().map(|b| b.total_sec).max().unwrap_or(0);

        let operators: Vec<OperatorAssignment> = buckets
            .iter()
            .filter(|b| b.len > 0)
            .enumerate()
            .map(|(idx, b)| OperatorAssignment {
                operator_index: idx + 1,
                activities: activities[b.start..b.start + b.len].to_vec(),
                total_sec: b.total_sec,
                status: self.classify(b.total_sec, takt),
            })
            .collect();

        info!(
            takt_time_sec = takt,
            work_content_sec = work_content,
            initial_manpower = initial_manpower,
            manpower = operators.len(),
            iterations = iterations,
            "人力分配计算完成"
        );

        Ok(AllocationResult {
            line_name: String::new(),
            planned_qty,
            shift_minutes,
            takt_time_sec: takt,
            upper_bound_sec: upper_bound,
            lower_bound_sec: lower_bound,
            work_content_sec: work_content,
            manpower: operators.len(),
            max_operator_sec,
            search_iterations: iterations,
            operators,
            issue: None,
        })
    }

    /// 计算并附带产线名称
    pub fn allocate_for_line(
        &self,
        line_name: &str,
        activities: &[Activity],
        shift_minutes: u32,
        planned_qty: u32,
    ) -> EngineResult<AllocationResult> {
        Ok(self
            .allocate(activities, shift_minutes, planned_qty)?
            .with_line_name(line_name))
    }

    /// 负荷状态判定
    ///
    /// - total > 节拍 → OVER
    /// - total < 节拍 * 0.6 → UNDER
    /// - 其余 → OK（边界值均为 OK）
    pub fn classify(&self, total_sec: i64, takt_time_sec: f64) -> OperatorStatus {
        let total = total_sec as f64;
        if total > takt_time_sec {
            OperatorStatus::Over
        } else if total < self.thresholds.under_load_ratio * takt_time_sec {
            OperatorStatus::Under
        } else {
            OperatorStatus::Ok
        }
    }

    // ==========================================
    // 内部方法
    // ==========================================

    /// 初始人数 = ceil(工作量 / 节拍)，限定在 [1, 工序数]
    fn seed_manpower(work_content_sec: i64, takt_time_sec: f64, activity_count: usize) -> usize {
        let raw = (work_content_sec as f64 / takt_time_sec).ceil();
        let seeded = if raw.is_finite() && raw > 0.0 {
            raw as usize
        } else {
            1
        };
        seeded.clamp(1, activity_count.max(1))
    }

    /// 单轮顺序装箱（不回溯、不重排）
    ///
    /// 空槽位不换人：单个工序超过上限时由当前作业员独自承担，
    /// 因此空槽位只会出现在末尾。
    fn fill_pass(activities: &[Activity], manpower: usize, upper_bound_sec: f64) -> Vec<Bucket> {
        let mut buckets = vec![Bucket::default(); manpower];
        let mut op = 0usize;

        for (idx, activity) in activities.iter().enumerate() {
            let current = &buckets[op];
            let projected = current.total_sec + activity.duration_sec;
            if current.len > 0 && projected as f64 > upper_bound_sec && op + 1 < manpower {
                op += 1;
            }

            let bucket = &mut buckets[op];
            if bucket.len == 0 {
                bucket.start = idx;
            }
            bucket.len += 1;
            bucket.total_sec += activity.duration_sec;
        }

        buckets
    }
}
