// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证配置读取、覆写与回退
// ==========================================

mod test_helpers;

use laps::config::{config_keys, ConfigManager, PlanningConfigReader, DEFAULT_SHIFT_MINUTES};
use laps::engine::{BalanceThresholds, DEFAULT_LOWER_TOLERANCE_SEC};
use test_helpers::create_test_db;

#[test]
fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[test]
fn test_defaults_without_rows() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let cm = ConfigManager::new(&db_path).unwrap();

    assert_eq!(cm.get_default_shift_minutes().unwrap(), DEFAULT_SHIFT_MINUTES);
    assert_eq!(cm.get_balance_thresholds().unwrap(), BalanceThresholds::default());
    assert_eq!(cm.get_global_config_value("missing").unwrap(), None);
}

#[test]
fn test_values_persist_across_instances() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    {
        let cm = ConfigManager::new(&db_path).unwrap();
        cm.set_global_config_value(config_keys::DEFAULT_SHIFT_MINUTES, "420")
            .unwrap();
        cm.set_global_config_value(config_keys::LOWER_TOLERANCE_SEC, "5")
            .unwrap();
    }

    let cm = ConfigManager::new(&db_path).unwrap();
    assert_eq!(cm.get_default_shift_minutes().unwrap(), 420);
    let thresholds = cm.get_balance_thresholds().unwrap();
    assert_eq!(thresholds.lower_tolerance_sec, 5.0);
    assert_ne!(thresholds.lower_tolerance_sec, DEFAULT_LOWER_TOLERANCE_SEC);
}

#[test]
fn test_invalid_values_fall_back() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let cm = ConfigManager::new(&db_path).unwrap();

    cm.set_global_config_value(config_keys::DEFAULT_SHIFT_MINUTES, "0")
        .unwrap();
    cm.set_global_config_value(config_keys::UPPER_TOLERANCE_SEC, "-1")
        .unwrap();

    assert_eq!(cm.get_default_shift_minutes().unwrap(), DEFAULT_SHIFT_MINUTES);
    assert_eq!(cm.get_balance_thresholds().unwrap(), BalanceThresholds::default());
}

#[test]
fn test_config_snapshot_json() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let cm = ConfigManager::new(&db_path).unwrap();
    cm.set_global_config_value(config_keys::UNDER_LOAD_RATIO, "0.5")
        .unwrap();

    let snapshot: serde_json::Value =
        serde_json::from_str(&cm.get_config_snapshot().unwrap()).unwrap();
    assert_eq!(snapshot[config_keys::UNDER_LOAD_RATIO], "0.5");
}
