// ==========================================
// 产线人力平衡系统 (LAPS) - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 线平衡人力分配（节拍 → 顺序装箱 → 人数递增重试）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分配规则（纯计算）
pub mod engine;

// 导入层 - 工序表
pub mod importer;

// 导出层 - 分配结果
pub mod exporter;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{AllocationIssue, OperatorStatus};

// 领域实体
pub use domain::{Activity, AllocationResult, Line, NewActivity, OperatorAssignment};

// 引擎
pub use engine::{BalanceThresholds, DailyPlanner, LineBalancer};

// API
pub use api::{LineApi, PlanApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "产线人力平衡系统";
