// ==========================================
// 产线人力平衡系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::planning_config_trait::PlanningConfigReader;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::{
    BalanceThresholds, DEFAULT_LOWER_TOLERANCE_SEC, DEFAULT_UPPER_TOLERANCE_SEC, UNDER_LOAD_RATIO,
};
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// 默认班次时长（分钟）
pub const DEFAULT_SHIFT_MINUTES: u32 = 480;

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 读取数值配置，缺失或无法解析时回退默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        match self.get_config_value(key)? {
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    warn!(key = key, value = %raw, default = %default, "配置值无法解析，使用默认值");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }
}

impl PlanningConfigReader for ConfigManager {
    fn get_default_shift_minutes(&self) -> Result<u32, Box<dyn Error>> {
        let minutes = self.get_parsed_or_default(config_keys::DEFAULT_SHIFT_MINUTES, DEFAULT_SHIFT_MINUTES)?;
        if minutes == 0 {
            warn!("default_shift_minutes 配置为 0，使用默认值");
            return Ok(DEFAULT_SHIFT_MINUTES);
        }
        Ok(minutes)
    }

    fn get_balance_thresholds(&self) -> Result<BalanceThresholds, Box<dyn Error>> {
        let thresholds = BalanceThresholds {
            upper_tolerance_sec: self
                .get_parsed_or_default(config_keys::UPPER_TOLERANCE_SEC, DEFAULT_UPPER_TOLERANCE_SEC)?,
            lower_tolerance_sec: self
                .get_parsed_or_default(config_keys::LOWER_TOLERANCE_SEC, DEFAULT_LOWER_TOLERANCE_SEC)?,
            under_load_ratio: self
                .get_parsed_or_default(config_keys::UNDER_LOAD_RATIO, UNDER_LOAD_RATIO)?,
        };

        if let Err(e) = thresholds.validate() {
            warn!(error = %e, "平衡阈值配置非法，使用默认阈值");
            return Ok(BalanceThresholds::default());
        }
        Ok(thresholds)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 班次
    pub const DEFAULT_SHIFT_MINUTES: &str = "default_shift_minutes";

    // 平衡阈值
    pub const UPPER_TOLERANCE_SEC: &str = "upper_tolerance_sec";
    pub const LOWER_TOLERANCE_SEC: &str = "lower_tolerance_sec";
    pub const UNDER_LOAD_RATIO: &str = "under_load_ratio";
}
