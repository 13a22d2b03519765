// ==========================================
// 产线人力平衡系统 - 命令行入口
// ==========================================
// 用法: laps [--db PATH] <command> [args...]
// ==========================================

use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use laps::api::{ApiError, DailyPlanRequest};
use laps::app::{get_default_db_path, AppState};
use laps::{logging, AllocationResult};

/// 产线人力平衡系统
///
/// 按节拍计算每条产线的最少人数与工序分配。
#[derive(Parser, Debug, PartialEq)]
#[command(name = "laps")]
#[command(version, about, long_about = None)]
struct Cli {
    /// 数据库路径（默认 LAPS_DB_PATH 或系统数据目录）
    #[arg(long = "db", global = true, value_name = "PATH")]
    db_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// 列出产线及工作量
    Lines,

    /// 新建产线
    AddLine {
        /// 产线名称
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// 录入单条工序
    AddActivity {
        line_id: i64,
        seq_no: i64,
        /// 工时（秒）
        #[arg(value_name = "SECONDS")]
        duration_sec: i64,
        /// 工序描述
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },

    /// 从 .csv/.xlsx/.xls 导入工序（整体替换）
    Import { line_id: i64, file: PathBuf },

    /// 计算单条产线人力分配
    Allocate {
        line_id: i64,
        shift_minutes: i64,
        planned_qty: i64,
        /// 导出 CSV 路径
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },

    /// 计算日计划（多产线并发）
    DailyPlan {
        shift_minutes: i64,
        /// 各产线产量，格式 line_id=qty
        #[arg(value_name = "LINE_ID=QTY", value_parser = parse_line_quantity)]
        quantities: Vec<(i64, i64)>,
        /// 计划日期（默认今天）
        #[arg(long = "date", value_name = "YYYY-MM-DD", value_parser = parse_plan_date)]
        plan_date: Option<NaiveDate>,
        /// 导出 CSV 路径
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },
}

/// 解析 `line_id=qty`
fn parse_line_quantity(raw: &str) -> Result<(i64, i64), String> {
    let (id, qty) = raw
        .split_once('=')
        .ok_or_else(|| format!("产量参数格式应为 line_id=qty: {}", raw))?;
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("line_id 不是整数: {}", id))?;
    let qty = qty
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("产量不是整数: {}", qty))?;
    Ok((id, qty))
}

fn parse_plan_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("日期格式应为 YYYY-MM-DD: {}", raw))
}

fn print_allocation(result: &AllocationResult) {
    println!("产线: {}", result.line_name);
    if !result.has_activities() {
        if let Some(issue) = result.issue {
            println!("  {}", issue);
        }
        return;
    }

    println!(
        "  节拍: {:.2} 秒  上限: {:.2} 秒  下限: {:.2} 秒",
        result.takt_time_display(),
        result.upper_bound_sec,
        result.lower_bound_sec
    );
    println!(
        "  工作量: {} 秒  人数: {}  最大负荷: {} 秒  装箱轮次: {}",
        result.work_content_sec, result.manpower, result.max_operator_sec, result.search_iterations
    );
    for op in &result.operators {
        println!(
            "  {:<5} {:>6} 秒  {:<5}  {}",
            op.operator_name(),
            op.total_sec,
            op.status.label(),
            op.joined_descriptions(", ")
        );
    }
}

fn report_api_error(err: &ApiError) {
    eprintln!("错误: {}", err);
    for v in err.violations() {
        eprintln!("  - {}", v);
    }
}

async fn run(cli: Cli) -> Result<(), ApiError> {
    let db_path = cli.db_path.unwrap_or_else(get_default_db_path);
    let state = AppState::new(db_path).map_err(ApiError::InternalError)?;

    match cli.command {
        Command::Lines => {
            for s in state.line_api.list_lines()? {
                println!(
                    "{:>4}  {:<20} 工序 {:>3}  工作量 {:>6} 秒",
                    s.line.line_id, s.line.line_name, s.activity_count, s.work_content_sec
                );
            }
        }
        Command::AddLine { name } => {
            let line = state.line_api.create_line(&name.join(" "))?;
            println!("已创建产线 {} (id={})", line.line_name, line.line_id);
        }
        Command::AddActivity {
            line_id,
            seq_no,
            duration_sec,
            description,
        } => {
            let a = state
                .line_api
                .add_activity(line_id, seq_no, &description.join(" "), duration_sec)?;
            println!("已录入工序 #{} {} ({} 秒)", a.seq_no, a.description, a.duration_sec);
        }
        Command::Import { line_id, file } => {
            let report = state.line_api.import_activities(line_id, &file).await?;
            println!(
                "导入完成: {} 行，工作量 {} 秒 (batch_id={})",
                report.imported_rows, report.work_content_sec, report.batch_id
            );
        }
        Command::Allocate {
            line_id,
            shift_minutes,
            planned_qty,
            export,
        } => {
            let result = state
                .plan_api
                .compute_allocation(line_id, planned_qty, shift_minutes)?;
            print_allocation(&result);
            if let Some(path) = export {
                let rows = state
                    .plan_api
                    .export_allocations_csv(std::slice::from_ref(&result), &path)?;
                println!("已导出 {} 行到 {}", rows, path.display());
            }
        }
        Command::DailyPlan {
            shift_minutes,
            quantities,
            plan_date,
            export,
        } => {
            let plan = state
                .plan_api
                .compute_daily_plan(DailyPlanRequest {
                    plan_date: plan_date.unwrap_or_else(|| Local::now().date_naive()),
                    shift_minutes,
                    quantities: quantities.into_iter().collect::<BTreeMap<_, _>>(),
                })
                .await?;

            println!("日计划 {} (班次 {} 分钟)", plan.plan_date, plan.shift_minutes);
            for result in &plan.allocations {
                print_allocation(result);
            }
            for f in &plan.failures {
                eprintln!("产线 {} (id={}) 计算失败: {}", f.line_name, f.line_id, f.reason);
            }
            println!("合计人数: {}", plan.total_manpower());

            if let Some(path) = export {
                let rows = state
                    .plan_api
                    .export_allocations_csv(&plan.allocations, &path)?;
                println!("已导出 {} 行到 {}", rows, path.display());
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let cli = Cli::parse();

    tracing::debug!(version = laps::VERSION, "{} 启动", laps::APP_NAME);

    if let Err(e) = run(cli).await {
        report_api_error(&e);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(s: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("laps").chain(s.split_whitespace()))
    }

    #[test]
    fn test_parse_allocate_with_options() {
        let cli = parse("--db /tmp/x.db allocate 1 480 100 --export out.csv").unwrap();
        assert_eq!(cli.db_path.as_deref(), Some("/tmp/x.db"));
        assert_eq!(
            cli.command,
            Command::Allocate {
                line_id: 1,
                shift_minutes: 480,
                planned_qty: 100,
                export: Some(PathBuf::from("out.csv")),
            }
        );
    }

    #[test]
    fn test_db_flag_after_subcommand() {
        let cli = parse("lines --db /tmp/y.db").unwrap();
        assert_eq!(cli.db_path.as_deref(), Some("/tmp/y.db"));
        assert_eq!(cli.command, Command::Lines);
    }

    #[test]
    fn test_parse_add_activity_keeps_description_words() {
        let cli = parse("add-activity 2 3 45 锁 螺丝").unwrap();
        assert_eq!(
            cli.command,
            Command::AddActivity {
                line_id: 2,
                seq_no: 3,
                duration_sec: 45,
                description: vec!["锁".to_string(), "螺丝".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_daily_plan() {
        let cli = parse("daily-plan 480 1=100 2=0 --date 2026-10-18").unwrap();
        match cli.command {
            Command::DailyPlan {
                shift_minutes,
                quantities,
                plan_date,
                export,
            } => {
                assert_eq!(shift_minutes, 480);
                assert_eq!(quantities, vec![(1, 100), (2, 0)]);
                assert_eq!(plan_date, NaiveDate::from_ymd_opt(2026, 10, 18));
                assert!(export.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_line_quantity() {
        assert_eq!(parse_line_quantity("3=-5"), Ok((3, -5)));
        assert!(parse_line_quantity("3:5").is_err());
        assert!(parse_line_quantity("x=5").is_err());
        assert!(parse_plan_date("2026/10/18").is_err());
    }

    #[test]
    fn test_help_is_displayed() {
        let err = parse("--help").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("").is_err());
        assert!(parse("allocate 1 abc 10").is_err());
        assert!(parse("daily-plan 480 1:100").is_err());
        assert!(parse("allocate 1 480 10 --export").is_err());
        assert!(parse("frobnicate").is_err());
        assert!(parse("add-line").is_err());
    }

    #[test]
    fn test_flags_and_arguments_outside_command_rejected() {
        assert!(parse("lines --export x.csv").is_err());
        assert!(parse("import 1 f.csv --date 2026-01-01").is_err());
        assert!(parse("allocate 1 480 100 junk more").is_err());
    }
}
