// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use laps::app::AppState;
use laps::db::open_and_init;
use laps::domain::{Activity, NewActivity};
use rusqlite::Connection;
use std::error::Error;
use std::io::Write;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    open_and_init(&db_path)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（已初始化 schema）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_and_init(db_path)?)
}

/// 创建基于临时数据库的 AppState
pub fn create_test_state() -> Result<(NamedTempFile, AppState), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let state = AppState::new(db_path)?;
    Ok((temp_file, state))
}

/// 按工时序列生成工序（seq_no 从 1 开始，描述为 A1..An）
pub fn activities(durations: &[i64]) -> Vec<Activity> {
    durations
        .iter()
        .enumerate()
        .map(|(i, d)| Activity::new(i as i64 + 1, format!("A{}", i + 1), *d))
        .collect()
}

/// 按工时序列生成待写入工序
pub fn new_activities(durations: &[i64]) -> Vec<NewActivity> {
    durations
        .iter()
        .enumerate()
        .map(|(i, d)| NewActivity {
            seq_no: i as i64 + 1,
            description: format!("A{}", i + 1),
            duration_sec: *d,
        })
        .collect()
}

/// 新建产线并录入工序
pub fn seed_line(state: &AppState, name: &str, durations: &[i64]) -> Result<i64, Box<dyn Error>> {
    let line = state.line_api.create_line(name)?;
    for a in new_activities(durations) {
        state
            .line_api
            .add_activity(line.line_id, a.seq_no, &a.description, a.duration_sec)?;
    }
    Ok(line.line_id)
}

/// 写入临时 CSV 文件（扩展名 .csv）
pub fn write_csv(content: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}
