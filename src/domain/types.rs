// ==========================================
// 产线人力平衡系统 - 领域类型定义
// ==========================================
// 依据: 线平衡规则 - 作业员负荷状态判定
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 作业员负荷状态 (Operator Status)
// ==========================================
// 红线: 阈值为固定业务规则 (OVER: > 节拍, UNDER: < 60% 节拍)
// 序列化格式: SCREAMING_SNAKE_CASE (与导出一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorStatus {
    Ok,    // 负荷正常
    Over,  // 超节拍
    Under, // 负荷不足
}

impl OperatorStatus {
    /// 导出/展示用的大写标签
    pub fn label(&self) -> &'static str {
        match self {
            OperatorStatus::Ok => "OK",
            OperatorStatus::Over => "OVER",
            OperatorStatus::Under => "UNDER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "OK" => Some(OperatorStatus::Ok),
            "OVER" => Some(OperatorStatus::Over),
            "UNDER" => Some(OperatorStatus::Under),
            _ => None,
        }
    }
}

impl fmt::Display for OperatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 分配结果标记 (Allocation Issue)
// ==========================================
// 软错误: 作为结果字段返回，不走 Err 分支
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationIssue {
    NoActivities, // 产线尚未定义工序
}

impl AllocationIssue {
    pub fn label(&self) -> &'static str {
        match self {
            AllocationIssue::NoActivities => "NO ACTIVITIES",
        }
    }
}

impl fmt::Display for AllocationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationIssue::NoActivities => write!(f, "产线未定义工序"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label_roundtrip() {
        for status in [OperatorStatus::Ok, OperatorStatus::Over, OperatorStatus::Under] {
            assert_eq!(OperatorStatus::from_str(status.label()), Some(status));
        }
        assert_eq!(OperatorStatus::from_str(" over "), Some(OperatorStatus::Over));
        assert_eq!(OperatorStatus::from_str("BUSY"), None);
    }

    #[test]
    fn test_status_serde_format() {
        let json = serde_json::to_string(&OperatorStatus::Under).unwrap();
        assert_eq!(json, "\"UNDER\"");
    }

    #[test]
    fn test_issue_display_and_label() {
        assert_eq!(AllocationIssue::NoActivities.to_string(), "产线未定义工序");
        assert_eq!(AllocationIssue::NoActivities.label(), "NO ACTIVITIES");
    }
}
