// ==========================================
// 产线人力平衡系统 - 分配结果领域模型
// ==========================================
// 依据: 线平衡规则 - 节拍时间 = 班次秒数 / 计划产量
// 红线: 各作业员工序首尾相接 = 原始工序序列 (不重复、不遗漏、不重排)
// ==========================================

use crate::domain::activity::Activity;
use crate::domain::types::{AllocationIssue, OperatorStatus};
use serde::{Deserialize, Serialize};

// ==========================================
// AllocationRequest - 分配请求
// ==========================================
// 说明: 单次计算构造，不落库
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub line_id: i64,
    pub planned_qty: u32,   // 计划产量 (件)
    pub shift_minutes: u32, // 班次时长 (分钟)
}

impl AllocationRequest {
    pub fn new(line_id: i64, planned_qty: u32, shift_minutes: u32) -> Self {
        Self {
            line_id,
            planned_qty,
            shift_minutes,
        }
    }
}

// ==========================================
// OperatorAssignment - 单个作业员的工序分配
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorAssignment {
    pub operator_index: usize,    // 作业员序号 (1-based)
    pub activities: Vec<Activity>, // 连续工序段
    pub total_sec: i64,           // 负荷合计 (秒)
    pub status: OperatorStatus,   // 负荷状态
}

impl OperatorAssignment {
    /// 作业员名称 (OP1, OP2, ...)
    pub fn operator_name(&self) -> String {
        format!("OP{}", self.operator_index)
    }

    /// 工序描述拼接（导出用）
    pub fn joined_descriptions(&self, separator: &str) -> String {
        self.activities
            .iter()
            .map(|a| a.description.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

// ==========================================
// AllocationResult - 分配结果
// ==========================================
// 用途: 展示/导出适配器只读消费
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub line_name: String,
    pub planned_qty: u32,
    pub shift_minutes: u32,

    // ===== 节拍与工作量 =====
    pub takt_time_sec: f64,    // 节拍时间 (秒/件，未取整)
    pub upper_bound_sec: f64,  // 装箱上限 = 节拍 + 容差
    pub lower_bound_sec: f64,  // 下限 = 节拍 - 容差 (仅展示，不参与装箱)
    pub work_content_sec: i64, // 总工作量 (秒)

    // ===== 人力分配 =====
    pub manpower: usize,        // 实际输出的作业员人数 (非空)
    pub max_operator_sec: i64,  // 最大单人负荷 (秒)
    pub search_iterations: usize, // 装箱轮次
    pub operators: Vec<OperatorAssignment>,

    // ===== 软错误标记 =====
    pub issue: Option<AllocationIssue>,
}

impl AllocationResult {
    /// 无工序时的结果（不计算节拍与人数）
    pub fn no_activities(planned_qty: u32, shift_minutes: u32) -> Self {
        Self {
            line_name: String::new(),
            planned_qty,
            shift_minutes,
            takt_time_sec: 0.0,
            upper_bound_sec: 0.0,
            lower_bound_sec: 0.0,
            work_content_sec: 0,
            manpower: 0,
            max_operator_sec: 0,
            search_iterations: 0,
            operators: Vec::new(),
            issue: Some(AllocationIssue::NoActivities),
        }
    }

    /// 设置产线名称
    pub fn with_line_name(mut self, line_name: impl Into<String>) -> Self {
        self.line_name = line_name.into();
        self
    }

    /// 展示用节拍（保留两位小数）
    pub fn takt_time_display(&self) -> f64 {
        (self.takt_time_sec * 100.0).round() / 100.0
    }

    pub fn has_activities(&self) -> bool {
        self.issue != Some(AllocationIssue::NoActivities)
    }

    /// 按作业员顺序展开的工序序列
    pub fn flattened_activities(&self) -> Vec<&Activity> {
        self.operators
            .iter()
            .flat_map(|op| op.activities.iter())
            .collect()
    }

    /// 指定状态的作业员人数
    pub fn count_by_status(&self, status: OperatorStatus) -> usize {
        self.operators.iter().filter(|op| op.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takt_display_rounding() {
        let mut result = AllocationResult::no_activities(7, 480);
        result.takt_time_sec = 480.0 * 60.0 / 7.0; // 4114.2857...
        assert_eq!(result.takt_time_display(), 4114.29);
    }

    #[test]
    fn test_no_activities_marker() {
        let result = AllocationResult::no_activities(100, 480).with_line_name("L1");
        assert!(!result.has_activities());
        assert_eq!(result.line_name, "L1");
        assert_eq!(result.manpower, 0);
        assert!(result.operators.is_empty());
    }

    #[test]
    fn test_operator_name_and_join() {
        let op = OperatorAssignment {
            operator_index: 3,
            activities: vec![Activity::new(1, "上料", 10), Activity::new(2, "锁螺丝", 12)],
            total_sec: 22,
            status: OperatorStatus::Ok,
        };
        assert_eq!(op.operator_name(), "OP3");
        assert_eq!(op.joined_descriptions(", "), "上料, 锁螺丝");
    }
}
