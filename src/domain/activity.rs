// ==========================================
// 产线人力平衡系统 - 工序领域模型
// ==========================================
// 依据: 线平衡规则 - 工序按 seq_no 顺序执行，不可拆分、不可重排
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Activity - 工序 (固定工时的作业单元)
// ==========================================
// 约束: (line_id, seq_no) 唯一; duration_sec > 0
// 用途: 分配引擎的只读输入快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub activity_id: i64,  // 工序ID
    pub line_id: i64,      // 所属产线
    pub seq_no: i64,       // 工序序号
    pub description: String, // 工序描述
    pub duration_sec: i64, // 标准工时 (秒)
}

impl Activity {
    /// 构造未落库的工序（activity_id/line_id 为 0）
    ///
    /// 用途: 引擎直接计算、测试数据
    pub fn new(seq_no: i64, description: impl Into<String>, duration_sec: i64) -> Self {
        Self {
            activity_id: 0,
            line_id: 0,
            seq_no,
            description: description.into(),
            duration_sec,
        }
    }
}

// ==========================================
// NewActivity - 待写入的工序
// ==========================================
// 用途: 人工录入 / 表格导入的落库参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivity {
    pub seq_no: i64,
    pub description: String,
    pub duration_sec: i64,
}

// ==========================================
// RawActivityRecord - 导入中间结构
// ==========================================
// 说明: 表格行按列位置映射，缺失/无法解析的值保持 None，由校验器统一报告
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawActivityRecord {
    pub row_number: usize,            // 数据行号 (1-based, 不含表头)
    pub seq_no_raw: Option<String>,   // 序号原始文本
    pub description: Option<String>,  // 工序描述
    pub duration_raw: Option<String>, // 工时原始文本
    pub column_count: usize,          // 该行实际列数
}

/// 工作量合计（秒）
pub fn work_content_sec(activities: &[Activity]) -> i64 {
    activities.iter().map(|a| a.duration_sec).sum()
}
