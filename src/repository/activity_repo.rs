// ==========================================
// 产线人力平衡系统 - 工序数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 工序集替换必须在单个事务内完成（整体成功或整体回滚）
// ==========================================

use crate::db::open_and_init;
use crate::domain::activity::{Activity, NewActivity};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};
use tracing::debug;

// ==========================================
// ActivityRepository - 工序仓储
// ==========================================
pub struct ActivityRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ActivityRepository {
    /// 创建新的 ActivityRepository 实例（确保 schema 存在）
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

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增单个工序
    ///
    /// # 返回
    /// - Ok(i64): 新工序 activity_id
    /// - Err(UniqueConstraintViolation): 同产线序号重复
    /// - Err(ForeignKeyViolation): 产线不存在
    pub fn insert(&self, line_id: i64, activity: &NewActivity) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO activity (line_id, seq_no, description, duration_sec)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                line_id,
                activity.seq_no,
                activity.description,
                activity.duration_sec
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 查询产线工序（按 seq_no 升序）
    pub fn find_by_line_ordered(&self, line_id: i64) -> RepositoryResult<Vec<Activity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT activity_id, line_id, seq_no, description, duration_sec
            FROM activity
            WHERE line_id = ?1
            ORDER BY seq_no ASC
            "#,
        )?;

        let activities = stmt
            .query_map(params![line_id], map_activity_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(activities)
    }

    /// 产线工序数量
    pub fn count_by_line(&self, line_id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM activity WHERE line_id = ?1",
            params![line_id],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as usize)
    }

    /// 产线总工作量（秒）
    pub fn work_content_sec(&self, line_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(duration_sec), 0) FROM activity WHERE line_id = ?1",
            params![line_id],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// 整体替换产线工序集（事务化）
    ///
    /// # 返回
    /// - Ok(usize): 写入的工序数
    /// - Err: 任一写入失败，事务回滚，原工序集保持不变
    pub fn replace_for_line(
        &self,
        line_id: i64,
        activities: &[NewActivity],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let removed = tx.execute("DELETE FROM activity WHERE line_id = ?1", params![line_id])?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO activity (line_id, seq_no, description, duration_sec)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;
            for activity in activities {
                inserted += stmt.execute(params![
                    line_id,
                    activity.seq_no,
                    activity.description,
                    activity.duration_sec
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        debug!(line_id = line_id, removed = removed, inserted = inserted, "工序集替换完成");
        Ok(inserted)
    }
}

fn map_activity_row(row: &Row<'_>) -> SqliteResult<Activity> {
    Ok(Activity {
        activity_id: row.get(0)?,
        line_id: row.get(1)?,
        seq_no: row.get(2)?,
        description: row.get(3)?,
        duration_sec: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use crate::repository::line_repo::LineRepository;

    fn setup() -> (LineRepository, ActivityRepository) {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        (
            LineRepository::from_connection(conn.clone()),
            ActivityRepository::from_connection(conn),
        )
    }

    fn new_act(seq_no: i64, duration_sec: i64) -> NewActivity {
        NewActivity {
            seq_no,
            description: format!("工序{}", seq_no),
            duration_sec,
        }
    }

    #[test]
    fn test_find_ordered_by_seq_no() {
        let (lines, acts) = setup();
        let line = lines.create("L1").unwrap();
        acts.insert(line.line_id, &new_act(3, 30)).unwrap();
        acts.insert(line.line_id, &new_act(1, 10)).unwrap();
        acts.insert(line.line_id, &new_act(2, 20)).unwrap();

        let seqs: Vec<i64> = acts
            .find_by_line_ordered(line.line_id)
            .unwrap()
            .iter()
            .map(|a| a.seq_no)
            .collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        assert_eq!(acts.work_content_sec(line.line_id).unwrap(), 60);
        assert_eq!(acts.count_by_line(line.line_id).unwrap(), 3);
    }

    #[test]
    fn test_work_content_empty_line() {
        let (lines, acts) = setup();
        let line = lines.create("L1").unwrap();
        assert_eq!(acts.work_content_sec(line.line_id).unwrap(), 0);
    }

    #[test]
    fn test_insert_rejects_duplicate_and_non_positive() {
        let (lines, acts) = setup();
        let line = lines.create("L1").unwrap();
        acts.insert(line.line_id, &new_act(1, 10)).unwrap();

        let dup = acts.insert(line.line_id, &new_act(1, 12)).unwrap_err();
        assert!(matches!(dup, RepositoryError::UniqueConstraintViolation(_)));

        let zero = acts.insert(line.line_id, &new_act(2, 0)).unwrap_err();
        assert!(matches!(zero, RepositoryError::CheckConstraintViolation(_)));

        let missing_line = acts.insert(777, &new_act(1, 5)).unwrap_err();
        assert!(matches!(missing_line, RepositoryError::ForeignKeyViolation(_)));
    }

    #[test]
    fn test_replace_is_atomic() {
        let (lines, acts) = setup();
        let line = lines.create("L1").unwrap();
        acts.replace_for_line(line.line_id, &[new_act(1, 10), new_act(2, 20)])
            .unwrap();

        // 第二批含重复序号 → 整体回滚
        let result = acts.replace_for_line(line.line_id, &[new_act(5, 1), new_act(5, 2)]);
        assert!(result.is_err());

        let kept = acts.find_by_line_ordered(line.line_id).unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].duration_sec, 20);

        // 正常替换
        let n = acts
            .replace_for_line(line.line_id, &[new_act(10, 7)])
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(acts.find_by_line_ordered(line.line_id).unwrap()[0].seq_no, 10);
    }
}
