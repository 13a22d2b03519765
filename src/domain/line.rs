// ==========================================
// 产线人力平衡系统 - 产线领域模型
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Line - 产线主数据
// ==========================================
// 约束: line_name 全局唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub line_id: i64,              // 产线ID (自增主键)
    pub line_name: String,         // 产线名称
    pub created_at: DateTime<Utc>, // 创建时间
}
