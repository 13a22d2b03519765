// ==========================================
// 产线人力平衡系统 - 产线数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_and_init;
use crate::domain::line::Line;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// LineRepository - 产线仓储
// ==========================================
/// 产线仓储
/// 职责: 管理 line 表的 CRUD 操作
pub struct LineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LineRepository {
    /// 创建新的 LineRepository 实例（确保 schema 存在）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_and_init(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建产线
    ///
    /// # 返回
    /// - Ok(Line): 新建的产线
    /// - Err(UniqueConstraintViolation): 名称已存在
    pub fn create(&self, line_name: &str) -> RepositoryResult<Line> {
        let conn = self.get_conn()?;
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO line (line_name, created_at) VALUES (?1, ?2)",
            params![line_name, created_at.to_rfc3339()],
        )?;

        Ok(Line {
            line_id: conn.last_insert_rowid(),
            line_name: line_name.to_string(),
            created_at,
        })
    }

    /// 按主键查询
    pub fn find_by_id(&self, line_id: i64) -> RepositoryResult<Option<Line>> {
        let conn = self.get_conn()?;
        let line = conn
            .query_row(
                "SELECT line_id, line_name, created_at FROM line WHERE line_id = ?1",
                params![line_id],
                map_line_row,
            )
            .optional()?;
        Ok(line)
    }

    /// 按名称查询
    pub fn find_by_name(&self, line_name: &str) -> RepositoryResult<Option<Line>> {
        let conn = self.get_conn()?;
        let line = conn
            .query_row(
                "SELECT line_id, line_name, created_at FROM line WHERE line_name = ?1",
                params![line_name],
                map_line_row,
            )
            .optional()?;
        Ok(line)
    }

    /// 查询所有产线（按 line_id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Line>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT line_id, line_name, created_at FROM line ORDER BY line_id ASC")?;
        let lines = stmt
            .query_map([], map_line_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(lines)
    }
}

fn map_line_row(row: &Row<'_>) -> SqliteResult<Line> {
    let created_at_raw: String = row.get(2)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(Line {
        line_id: row.get(0)?,
        line_name: row.get(1)?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};

    fn repo() -> LineRepository {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        LineRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_create_and_find() {
        let repo = repo();
        let line = repo.create("ASSY-01").unwrap();

        let by_id = repo.find_by_id(line.line_id).unwrap().unwrap();
        assert_eq!(by_id.line_name, "ASSY-01");

        let by_name = repo.find_by_name("ASSY-01").unwrap().unwrap();
        assert_eq!(by_name.line_id, line.line_id);

        assert!(repo.find_by_id(9999).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let repo = repo();
        repo.create("ASSY-01").unwrap();
        let err = repo.create("ASSY-01").unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[test]
    fn test_list_all_ordered() {
        let repo = repo();
        repo.create("B").unwrap();
        repo.create("A").unwrap();
        let names: Vec<String> = repo.list_all().unwrap().into_iter().map(|l| l.line_name).collect();
        assert_eq!(names, vec!["B".to_string(), "A".to_string()]);
    }
}
