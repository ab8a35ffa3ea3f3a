//! xresconv - xresloader 배치 변환 CLI
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

use xresconv::{
    cli::Args,
    plan::ConvPlan,
    runner::{CommandExecutor, DryRunExecutor, JobQueue, ShellExecutor, WorkerPool},
    stats::RunStats,
    XresconvError,
};

fn main() {
    let args = Args::parse();

    if args.show_version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "[ERROR]".bright_red(), e);
            let error = e.downcast_ref::<XresconvError>();
            if error.is_some_and(XresconvError::shows_usage) {
                // 도움말 출력 실패는 종료 코드에 영향 없음
                Args::command().print_help().ok();
            }
            process::exit(error.map(XresconvError::exit_code).unwrap_or(1));
        }
    }
}

/// 로그 초기화 (RUST_LOG, `--verbose`이면 debug)
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 변환 실행, 전체 종료 코드 반환
fn run(args: &Args) -> Result<i32> {
    let conv_list = args.conv_list().ok_or(XresconvError::MissingInput)?;

    print_header(args, &conv_list);

    // 변환 목록 읽기 + 전역 설정 병합
    let plan = ConvPlan::load(&conv_list)
        .with_context(|| format!("변환 목록 로드 실패: {}", conv_list.display()))?;

    for unknown in &plan.unknown_tags {
        eprintln!(
            "{} 알 수 없는 global 설정: {}",
            "[WARN]".bright_yellow(),
            unknown.tag
        );
    }

    // 작업 디렉토리 이동
    let work_dir = plan.enter_work_dir(&conv_list)?;
    println!(
        "{} 변환 명령 실행 디렉토리: {}",
        "[NOTICE]".bright_yellow(),
        work_dir.display()
    );

    plan.check_tool()?;

    // 변환 명령 생성
    let commands = plan.commands(&args.scheme_filter(), args.tool_args())?;
    println!(
        "  {} 변환 작업 수: {}",
        "📋".bright_white(),
        commands.len().to_string().bright_green()
    );

    let stats = RunStats::new(commands.len());
    let queue = JobQueue::new(commands);
    let pb = create_progress_bar(stats.total_jobs);

    let executor: &dyn CommandExecutor = if args.dry_run {
        &DryRunExecutor
    } else {
        &ShellExecutor
    };

    println!("\n{}", "⚡ 변환 실행 중...".bright_cyan());
    WorkerPool::new(args.worker_count()).run(&queue, executor, &stats, &pb)?;
    pb.finish_with_message("완료!");

    stats.print_summary(args.dry_run);
    println!("\n{}", "[INFO] 모든 작업이 끝났습니다.".bright_magenta());

    Ok(stats.exit_code())
}

/// 헤더 출력
fn print_header(args: &Args, conv_list: &Path) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🚀 XRESLOADER BATCH CONVERTER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 변환 목록: {:?}", "📄".bright_cyan(), conv_list);
    println!(
        "  {} 병렬 작업 수: {}",
        "⚙️".bright_yellow(),
        args.worker_count()
    );

    let filter = args.scheme_filter();
    if filter.is_active() {
        println!(
            "  {} scheme 필터: {}",
            "🔍".bright_magenta(),
            filter.schemes().join(", ")
        );
    }

    if !args.tool_args().is_empty() {
        println!(
            "  {} 추가 인자: {}",
            "➕".bright_white(),
            args.tool_args().join(" ")
        );
    }

    if args.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "테스트 실행 (명령을 실행하지 않음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
}

/// 진행률 바 생성
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░"));
    }
    pb
}
