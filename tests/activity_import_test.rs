// ==========================================
// 工序导入集成测试
// ==========================================
// 测试目标: 导入契约 + 整批拒绝（原工序不变）
// ==========================================

mod test_helpers;

use laps::api::ApiError;
use test_helpers::{create_test_state, seed_line, write_csv};

#[tokio::test]
async fn test_import_valid_csv_replaces_activities() {
    let (_db, state) = create_test_state().unwrap();
    let line_id = seed_line(&state, "L1", &[99]).unwrap();

    let file = write_csv("序号,工序描述,工时(秒)\n10,上料,12\n11,锁螺丝,30.0\n12,检验,8\n").unwrap();
    let report = state
        .line_api
        .import_activities(line_id, file.path())
        .await
        .unwrap();

    assert_eq!(report.line_id, line_id);
    assert_eq!(report.total_rows, 3);
    assert_eq!(report.imported_rows, 3);
    assert_eq!(report.work_content_sec, 50);

    let detail = state.line_api.get_line_activities(line_id).unwrap();
    let seqs: Vec<i64> = detail.activities.iter().map(|a| a.seq_no).collect();
    assert_eq!(seqs, vec![10, 11, 12]);
    assert_eq!(detail.work_content_sec, 50);
}

#[tokio::test]
async fn test_duplicate_sequence_rejects_whole_batch() {
    let (_db, state) = create_test_state().unwrap();
    let line_id = seed_line(&state, "L1", &[10, 20, 30]).unwrap();

    let file = write_csv("seq,text,time\n1,A,5\n2,B,5\n2,C,5\n3,D,5\n").unwrap();
    let err = state
        .line_api
        .import_activities(line_id, file.path())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ImportValidationFailed { .. }));
    assert!(err.violations().iter().any(|v| v.row_number == 3));

    // 原工序保持不变
    let detail = state.line_api.get_line_activities(line_id).unwrap();
    let durations: Vec<i64> = detail.activities.iter().map(|a| a.duration_sec).collect();
    assert_eq!(durations, vec![10, 20, 30]);
}

#[tokio::test]
async fn test_non_contiguous_sequence_rejected() {
    let (_db, state) = create_test_state().unwrap();
    let line_id = seed_line(&state, "L1", &[]).unwrap();

    let file = write_csv("seq,text,time\n1,A,5\n2,B,5\n4,C,5\n").unwrap();
    let err = state
        .line_api
        .import_activities(line_id, file.path())
        .await
        .unwrap_err();

    assert_eq!(err.violations().len(), 1);
    assert_eq!(err.violations()[0].row_number, 3);
    assert!(state
        .line_api
        .get_line_activities(line_id)
        .unwrap()
        .activities
        .is_empty());
}

#[tokio::test]
async fn test_invalid_values_all_reported() {
    let (_db, state) = create_test_state().unwrap();
    let line_id = seed_line(&state, "L1", &[]).unwrap();

    // 行1: 工时为 0；行2: 描述缺失；行3: 工时非整数
    let file = write_csv("seq,text,time\n1,A,0\n2,,5\n3,C,2.5\n").unwrap();
    let err = state
        .line_api
        .import_activities(line_id, file.path())
        .await
        .unwrap_err();

    let rows: Vec<usize> = err.violations().iter().map(|v| v.row_number).collect();
    assert_eq!(rows, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_wrong_column_count_rejected() {
    let (_db, state) = create_test_state().unwrap();
    let line_id = seed_line(&state, "L1", &[]).unwrap();

    let file = write_csv("seq,text\n1,A\n").unwrap();
    let err = state
        .line_api
        .import_activities(line_id, file.path())
        .await
        .unwrap_err();

    assert!(err.violations().iter().any(|v| v.row_number == 0 && v.field == "columns"));
}

#[tokio::test]
async fn test_import_unknown_line_and_format() {
    let (_db, state) = create_test_state().unwrap();

    let file = write_csv("seq,text,time\n1,A,5\n").unwrap();
    let err = state
        .line_api
        .import_activities(999, file.path())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let line_id = seed_line(&state, "L1", &[]).unwrap();
    let txt = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let err = state
        .line_api
        .import_activities(line_id, txt.path())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ImportError(_)));
}
