// ==========================================
// 产线人力平衡系统 - 工序导入校验器
// ==========================================
// 职责: 列位置映射 + 行级校验 + 批级校验
// 规则:
// - 表格固定三列: 序号 / 工序描述 / 工时(秒)
// - 不允许缺失值；序号与工时必须为整数（整值浮点如 12.0 视为整数）
// - 工时 > 0
// - 序号同批次内唯一，且逐行连续递增（后一行 = 前一行 + 1）
// ==========================================

use crate::domain::{NewActivity, RawActivityRecord};
use crate::importer::activity_importer_trait::RawSheet;
use crate::importer::error::ImportViolation;
use std::collections::HashSet;

/// 导入表格要求的列数
pub const EXPECTED_COLUMNS: usize = 3;

const FIELD_FILE: &str = "file";
const FIELD_COLUMNS: &str = "columns";
const FIELD_SEQ_NO: &str = "seq_no";
const FIELD_DESCRIPTION: &str = "description";
const FIELD_DURATION: &str = "duration_sec";

fn violation(row_number: usize, field: &str, message: impl Into<String>) -> ImportViolation {
    ImportViolation {
        row_number,
        field: field.to_string(),
        message: message.into(),
    }
}

/// 解析整数（接受整值浮点，如 "12.0"）
pub fn parse_integral(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

pub struct ActivityValidator;

impl ActivityValidator {
    /// 校验表头列数
    pub fn validate_header(&self, headers: &[String]) -> Vec<ImportViolation> {
        if headers.len() != EXPECTED_COLUMNS {
            return vec![violation(
                0,
                FIELD_COLUMNS,
                format!(
                    "表头列数为 {}，要求恰好 {} 列（序号, 工序描述, 工时）",
                    headers.len(),
                    EXPECTED_COLUMNS
                ),
            )];
        }
        Vec::new()
    }

    /// 按列位置映射为 RawActivityRecord（空单元格视为缺失）
    pub fn map_rows(&self, sheet: &RawSheet) -> Vec<RawActivityRecord> {
        sheet
            .rows
            .iter()
            .map(|row| {
                let cell = |idx: usize| {
                    row.cells
                        .get(idx)
                        .map(|c| c.trim())
                        .filter(|c| !c.is_empty())
                        .map(str::to_string)
                };
                RawActivityRecord {
                    row_number: row.row_number,
                    seq_no_raw: cell(0),
                    description: cell(1),
                    duration_raw: cell(2),
                    column_count: row.cells.len(),
                }
            })
            .collect()
    }

    /// 行级校验
    ///
    /// # 返回
    /// - (Some(NewActivity), []): 该行合法
    /// - (None, violations): 该行存在违规
    pub fn validate_record(
        &self,
        record: &RawActivityRecord,
    ) -> (Option<NewActivity>, Vec<ImportViolation>) {
        let row = record.row_number;
        let mut violations = Vec::new();

        if record.column_count > EXPECTED_COLUMNS {
            violations.push(violation(
                row,
                FIELD_COLUMNS,
                format!("列数为 {}，超过 {} 列", record.column_count, EXPECTED_COLUMNS),
            ));
        }

        let seq_no = match record.seq_no_raw.as_deref() {
            None => {
                violations.push(violation(row, FIELD_SEQ_NO, "序号缺失"));
                None
            }
            Some(raw) => match parse_integral(raw) {
                Some(v) => Some(v),
                None => {
                    violations.push(violation(row, FIELD_SEQ_NO, format!("序号不是整数: {}", raw)));
                    None
                }
            },
        };

        if record.description.is_none() {
            violations.push(violation(row, FIELD_DESCRIPTION, "工序描述缺失"));
        }

        let duration_sec = match record.duration_raw.as_deref() {
            None => {
                violations.push(violation(row, FIELD_DURATION, "工时缺失"));
                None
            }
            Some(raw) => match parse_integral(raw) {
                Some(v) if v > 0 => Some(v),
                Some(v) => {
                    violations.push(violation(
                        row,
                        FIELD_DURATION,
                        format!("工时必须为正整数: {}", v),
                    ));
                    None
                }
                None => {
                    violations.push(violation(row, FIELD_DURATION, format!("工时不是整数: {}", raw)));
                    None
                }
            },
        };

        if !violations.is_empty() {
            return (None, violations);
        }

        match (seq_no, record.description.clone(), duration_sec) {
            (Some(seq_no), Some(description), Some(duration_sec)) => (
                Some(NewActivity {
                    seq_no,
                    description,
                    duration_sec,
                }),
                violations,
            ),
            _ => (None, violations),
        }
    }

    /// 批级校验: 序号唯一 + 连续递增
    ///
    /// 只比较成功解析出序号的行；行号用于定位。
    pub fn validate_sequence(&self, seqs: &[(usize, i64)]) -> Vec<ImportViolation> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();
        let mut prev: Option<i64> = None;

        for &(row, seq_no) in seqs {
            if !seen.insert(seq_no) {
                violations.push(violation(row, FIELD_SEQ_NO, format!("序号重复: {}", seq_no)));
            } else if let Some(p) = prev {
                if seq_no != p + 1 {
                    violations.push(violation(
                        row,
                        FIELD_SEQ_NO,
                        format!("序号不连续: 期望 {}，实际 {}", p + 1, seq_no),
                    ));
                }
            }
            prev = Some(seq_no);
        }

        violations
    }

    /// 整表校验
    ///
    /// # 返回
    /// - (合法工序, 全部违规)；违规非空时调用方应整批拒绝
    pub fn validate_sheet(&self, sheet: &RawSheet) -> (Vec<NewActivity>, Vec<ImportViolation>) {
        let mut violations = self.validate_header(&sheet.headers);

        if sheet.rows.is_empty() {
            violations.push(violation(0, FIELD_FILE, "文件中没有工序数据行"));
            return (Vec::new(), violations);
        }

        let records = self.map_rows(sheet);
        let mut activities = Vec::with_capacity(records.len());
        let mut seqs = Vec::with_capacity(records.len());

        for record in &records {
            // 序号可单独解析时参与批级校验，即使该行其他字段违规
            if let Some(seq) = record.seq_no_raw.as_deref().and_then(parse_integral) {
                seqs.push((record.row_number, seq));
            }

            let (activity, row_violations) = self.validate_record(record);
            violations.extend(row_violations);
            if let Some(a) = activity {
                activities.push(a);
            }
        }

        violations.extend(self.validate_sequence(&seqs));
        (activities, violations)
    }
}
