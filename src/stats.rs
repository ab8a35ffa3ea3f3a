//! 실행 통계 모듈
//!
//! 작업 성공/실패 수와 전체 종료 코드를 워커 스레드 사이에서 안전하게 집계합니다.

use colored::Colorize;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// 실행 통계 구조체
#[derive(Debug, Default)]
pub struct RunStats {
    /// 큐에 들어간 총 명령 수
    pub total_jobs: usize,
    success_count: AtomicUsize,
    failed_count: AtomicUsize,
    /// 지금까지 관찰된 가장 심각한 종료 코드 (0이면 성공)
    exit_code: AtomicI32,
    start_time: Option<Instant>,
}

impl RunStats {
    /// 새 통계 인스턴스 생성
    pub fn new(total_jobs: usize) -> Self {
        Self {
            total_jobs,
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// 성공한 작업 기록
    pub fn record_success(&self) {
        self.success_count.fetch_add(1, Ordering::Relaxed);
    }

    /// 실패한 작업 기록
    ///
    /// 전체 종료 코드는 절댓값이 가장 큰 실패 코드로 갱신됩니다.
    /// 0이 넘어오면 1로 취급하므로, 실패가 한 번이라도 기록되면 종료 코드는 0이 아닙니다.
    pub fn record_failure(&self, code: i32) {
        let code = if code == 0 { 1 } else { code };
        self.failed_count.fetch_add(1, Ordering::Relaxed);
        let mut current = self.exit_code.load(Ordering::SeqCst);
        while current == 0 || code.unsigned_abs() > current.unsigned_abs() {
            match self.exit_code.compare_exchange_weak(
                current,
                code,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }

    /// 성공 수 반환
    pub fn get_success_count(&self) -> usize {
        self.success_count.load(Ordering::Relaxed)
    }

    /// 실패 수 반환
    pub fn get_failed_count(&self) -> usize {
        self.failed_count.load(Ordering::Relaxed)
    }

    /// 전체 종료 코드
    pub fn exit_code(&self) -> i32 {
        self.exit_code.load(Ordering::SeqCst)
    }

    /// 모든 작업이 성공했는지 여부
    pub fn is_success(&self) -> bool {
        self.exit_code() == 0
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// 실행 통계 요약 출력
    pub fn print_summary(&self, dry_run: bool) {
        let success = self.get_success_count();
        let failed = self.get_failed_count();

        println!("\n{}", "═".repeat(50).bright_blue());
        if dry_run {
            println!("{}", " 📊 실행 통계 (테스트 실행)".bright_white().bold());
        } else {
            println!("{}", " 📊 실행 통계".bright_white().bold());
        }
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 전체 작업:    {}",
            "📋".bright_cyan(),
            self.total_jobs
        );
        println!(
            "  {} 성공:         {}",
            "✅".bright_green(),
            success.to_string().green()
        );

        if failed > 0 {
            println!(
                "  {} 실패:         {}",
                "❌".bright_red(),
                failed.to_string().red()
            );
            println!(
                "  {} 종료 코드:    {}",
                "⚠️".bright_yellow(),
                self.exit_code().to_string().red()
            );
        } else {
            println!("  {} 실패:         {}", "✅".bright_green(), "0".green());
        }

        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_duration(self.elapsed())
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}시간 {}분", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}분 {}초", mins, remaining_secs)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}
