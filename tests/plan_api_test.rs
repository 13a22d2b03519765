// ==========================================
// PlanApi 集成测试
// ==========================================
// 测试目标: 单产线分配、日计划、CSV 导出、配置阈值生效
// ==========================================

mod test_helpers;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use laps::api::{ApiError, DailyPlanRequest};
use laps::config::config_keys;
use laps::domain::{AllocationIssue, OperatorStatus};
use test_helpers::{create_test_state, seed_line};

fn plan_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

#[test]
fn test_compute_allocation_end_to_end() {
    let (_db, state) = create_test_state().unwrap();
    let line_id = seed_line(&state, "总装线", &[10, 10, 10, 10, 10, 10]).unwrap();

    let result = state.plan_api.compute_allocation(line_id, 2, 1).unwrap();
    assert_eq!(result.line_name, "总装线");
    assert_eq!(result.manpower, 2);
    assert_eq!(result.count_by_status(OperatorStatus::Ok), 2);
    assert!(result.issue.is_none());
}

#[test]
fn test_compute_allocation_invalid_and_empty() {
    let (_db, state) = create_test_state().unwrap();
    let line_id = seed_line(&state, "EMPTY", &[]).unwrap();

    let err = state.plan_api.compute_allocation(line_id, 0, 480).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let result = state.plan_api.compute_allocation(line_id, 100, 480).unwrap();
    assert_eq!(result.issue, Some(AllocationIssue::NoActivities));
    assert_eq!(result.manpower, 0);
}

#[test]
fn test_configured_upper_tolerance_applies() {
    let (_db, state) = create_test_state().unwrap();
    let line_id = seed_line(&state, "L1", &[16, 16, 16, 16]).unwrap();

    // 默认上限 32：两人各 32 秒
    let result = state.plan_api.compute_allocation(line_id, 2, 1).unwrap();
    assert_eq!(result.manpower, 2);

    // 上限容差 0：16+16 > 30，需要 4 人
    state
        .config_manager
        .set_global_config_value(config_keys::UPPER_TOLERANCE_SEC, "0")
        .unwrap();
    let result = state.plan_api.compute_allocation(line_id, 2, 1).unwrap();
    assert_eq!(result.manpower, 4);
}

#[tokio::test]
async fn test_daily_plan_multiple_lines() {
    let (_db, state) = create_test_state().unwrap();
    let l1 = seed_line(&state, "L1", &[10, 10, 10, 10, 10, 10]).unwrap();
    let l2 = seed_line(&state, "L2", &[25, 25, 14]).unwrap();
    let l3 = seed_line(&state, "L3", &[40]).unwrap();
    let l4 = seed_line(&state, "L4", &[]).unwrap();

    let mut quantities = BTreeMap::new();
    quantities.insert(l1, 2);
    quantities.insert(l2, 2);
    quantities.insert(l3, -5);
    quantities.insert(l4, 3);

    let plan = state
        .plan_api
        .compute_daily_plan(DailyPlanRequest {
            plan_date: plan_date(),
            shift_minutes: 1,
            quantities,
        })
        .await
        .unwrap();

    let names: Vec<&str> = plan.allocations.iter().map(|a| a.line_name.as_str()).collect();
    assert_eq!(names, vec!["L1", "L2", "L4"]);
    assert_eq!(plan.skipped_line_ids, vec![l3]);
    assert_eq!(plan.allocations[1].manpower, 3);
    assert_eq!(plan.allocations[2].issue, Some(AllocationIssue::NoActivities));
    assert_eq!(plan.total_manpower(), 5);
}

#[tokio::test]
async fn test_daily_plan_rejects_bad_shift() {
    let (_db, state) = create_test_state().unwrap();
    let err = state
        .plan_api
        .compute_daily_plan(DailyPlanRequest {
            plan_date: plan_date(),
            shift_minutes: 0,
            quantities: BTreeMap::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_export_daily_plan_csv() {
    let (_db, state) = create_test_state().unwrap();
    let l1 = seed_line(&state, "L1", &[10, 10, 10, 10, 10, 10]).unwrap();
    let l2 = seed_line(&state, "L2", &[]).unwrap();

    let mut quantities = BTreeMap::new();
    quantities.insert(l1, 2);
    quantities.insert(l2, 5);
    let plan = state
        .plan_api
        .compute_daily_plan(DailyPlanRequest {
            plan_date: plan_date(),
            shift_minutes: 1,
            quantities,
        })
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daily_plan.csv");
    let rows = state
        .plan_api
        .export_allocations_csv(&plan.allocations, &path)
        .unwrap();
    assert_eq!(rows, 3);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "Line,Operator,Activities,Total Time (s),Status");
    assert_eq!(lines[1], "L1,OP1,\"A1, A2, A3\",30,OK");
    assert_eq!(lines[3], "L2,,,0,NO ACTIVITIES");
}
