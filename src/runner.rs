//! 병렬 실행 모듈
//!
//! 명령 큐를 고정 크기의 워커 풀이 나눠 가져가며 실행합니다.
//!
//! 각 워커는 큐 잠금을 잡은 상태에서 명령 하나를 꺼내고, 잠금을 푼 뒤 명령을 실행합니다.
//! 큐가 비면 워커는 종료하며, 모든 워커가 종료해야 실행이 끝납니다.
//! 명령에는 시간 제한이 없으므로 멈춘 프로세스가 있으면 풀도 끝나지 않습니다.

use colored::Colorize;
use indicatif::ProgressBar;
use std::collections::VecDeque;
use std::process::Command;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Result, XresconvError};
use crate::stats::RunStats;

/// 종료 코드를 알 수 없는 실패 (시그널 종료, 실행 불가 등)
pub const JOB_FAILURE: i32 = 1;

/// 실행 대기 중인 명령 큐
#[derive(Debug, Default)]
pub struct JobQueue {
    commands: Mutex<VecDeque<String>>,
}

impl JobQueue {
    /// 명령 목록으로 큐 생성 (앞쪽 명령부터 꺼내짐)
    pub fn new(commands: Vec<String>) -> Self {
        Self {
            commands: Mutex::new(commands.into()),
        }
    }

    /// 명령 하나를 꺼냄 (비어 있으면 None)
    ///
    /// 비었는지 확인하는 것과 꺼내는 것이 한 번의 잠금 안에서 일어납니다.
    pub fn pop(&self) -> Option<String> {
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }

    /// 남은 명령 수
    pub fn len(&self) -> usize {
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// 큐가 비었는지 확인
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 명령 하나의 실행 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Success,
    Failed(i32),
}

/// 명령 실행기
pub trait CommandExecutor: Sync {
    /// 명령을 끝까지 실행하고 결과를 반환
    fn execute(&self, command: &str) -> JobStatus;
}

/// 플랫폼 셸로 명령을 실행
///
/// 작업 디렉토리와 표준 입출력은 현재 프로세스의 것을 그대로 물려받습니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn execute(&self, command: &str) -> JobStatus {
        match shell_command(command).status() {
            Ok(status) if status.success() => JobStatus::Success,
            Ok(status) => JobStatus::Failed(status.code().unwrap_or(JOB_FAILURE)),
            Err(e) => {
                warn!(error = %e, "failed to spawn shell");
                JobStatus::Failed(JOB_FAILURE)
            }
        }
    }
}

/// cmd.exe는 따옴표를 스스로 해석하므로 명령 문자열을 이스케이프 없이 그대로 넘김
#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    use std::os::windows::process::CommandExt;

    let mut cmd = Command::new("cmd");
    cmd.arg("/C").raw_arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

/// 명령을 실행하지 않고 성공으로 처리 (테스트 실행)
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunExecutor;

impl CommandExecutor for DryRunExecutor {
    fn execute(&self, _command: &str) -> JobStatus {
        JobStatus::Success
    }
}

/// 고정 크기 워커 풀
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    parallelism: usize,
}

impl WorkerPool {
    /// 새 워커 풀 (최소 1개 워커)
    pub fn new(parallelism: usize) -> Self {
        Self {
            parallelism: parallelism.max(1),
        }
    }

    /// 워커 수
    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// 큐가 빌 때까지 명령을 실행
    ///
    /// # Arguments
    /// * `queue` - 실행할 명령 큐
    /// * `executor` - 명령 실행기
    /// * `stats` - 성공/실패와 전체 종료 코드를 집계할 통계
    /// * `progress` - 작업이 끝날 때마다 증가하는 진행률 바
    ///
    /// 모든 워커가 종료한 뒤에 반환합니다.
    pub fn run(
        &self,
        queue: &JobQueue,
        executor: &dyn CommandExecutor,
        stats: &RunStats,
        progress: &ProgressBar,
    ) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.parallelism)
            .thread_name(|i| format!("xresconv-worker-{}", i))
            .build()
            .map_err(|e| XresconvError::ThreadPool {
                reason: e.to_string(),
            })?;

        pool.scope(|scope| {
            for worker_id in 0..self.parallelism {
                scope.spawn(move |_| worker_loop(worker_id, queue, executor, stats, progress));
            }
        });

        Ok(())
    }
}

fn worker_loop(
    worker_id: usize,
    queue: &JobQueue,
    executor: &dyn CommandExecutor,
    stats: &RunStats,
    progress: &ProgressBar,
) {
    while let Some(command) = queue.pop() {
        progress.suspend(|| println!("{}", format!("[INFO] {}", command).green()));

        match executor.execute(&command) {
            JobStatus::Success => stats.record_success(),
            JobStatus::Failed(code) => {
                debug!(worker_id, code, "job failed");
                stats.record_failure(code);
            }
        }

        progress.inc(1);
    }

    debug!(worker_id, "queue drained");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    /// 실행 횟수를 명령별로 기록하는 실행기
    #[derive(Default)]
    struct RecordingExecutor {
        runs: Mutex<HashMap<String, usize>>,
        running: AtomicUsize,
        max_running: AtomicUsize,
        fail_marker: Option<&'static str>,
    }

    impl CommandExecutor for RecordingExecutor {
        fn execute(&self, command: &str) -> JobStatus {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_running.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(2));
            *self
                .runs
                .lock()
                .unwrap()
                .entry(command.to_string())
                .or_default() += 1;
            self.running.fetch_sub(1, Ordering::SeqCst);

            match self.fail_marker {
                Some(marker) if command.contains(marker) => JobStatus::Failed(3),
                _ => JobStatus::Success,
            }
        }
    }

    fn commands(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("job-{}", i)).collect()
    }

    #[test]
    fn test_queue_is_fifo() {
        let queue = JobQueue::new(commands(3));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop().as_deref(), Some("job-0"));
        assert_eq!(queue.pop().as_deref(), Some("job-1"));
        assert_eq!(queue.pop().as_deref(), Some("job-2"));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_each_command_runs_exactly_once() {
        for parallelism in [1, 2, 4, 16] {
            let queue = JobQueue::new(commands(40));
            let executor = RecordingExecutor::default();
            let stats = RunStats::new(40);

            WorkerPool::new(parallelism)
                .run(&queue, &executor, &stats, &ProgressBar::hidden())
                .unwrap();

            let runs = executor.runs.lock().unwrap();
            assert_eq!(runs.len(), 40, "parallelism {}", parallelism);
            assert!(runs.values().all(|&count| count == 1));
            assert_eq!(stats.get_success_count(), 40);
            assert!(queue.is_empty());
            assert!(executor.max_running.load(Ordering::SeqCst) <= parallelism);
        }
    }

    #[test]
    fn test_zero_parallelism_means_one_worker() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.parallelism(), 1);

        let queue = JobQueue::new(commands(5));
        let executor = RecordingExecutor::default();
        let stats = RunStats::new(5);
        pool.run(&queue, &executor, &stats, &ProgressBar::hidden())
            .unwrap();

        assert_eq!(executor.runs.lock().unwrap().len(), 5);
        assert_eq!(executor.max_running.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_does_not_stop_other_jobs() {
        let queue = JobQueue::new(commands(10));
        let executor = RecordingExecutor {
            fail_marker: Some("job-3"),
            ..Default::default()
        };
        let stats = RunStats::new(10);

        WorkerPool::new(3)
            .run(&queue, &executor, &stats, &ProgressBar::hidden())
            .unwrap();

        assert_eq!(executor.runs.lock().unwrap().len(), 10);
        assert_eq!(stats.get_success_count(), 9);
        assert_eq!(stats.get_failed_count(), 1);
        assert_eq!(stats.exit_code(), 3);
    }

    #[test]
    fn test_dry_run_always_succeeds() {
        let queue = JobQueue::new(vec!["exit 9".to_string(), "false".to_string()]);
        let stats = RunStats::new(2);

        WorkerPool::new(2)
            .run(&queue, &DryRunExecutor, &stats, &ProgressBar::hidden())
            .unwrap();

        assert!(stats.is_success());
        assert_eq!(stats.get_success_count(), 2);
    }

    #[test]
    fn test_empty_queue_finishes() {
        let queue = JobQueue::new(Vec::new());
        let stats = RunStats::new(0);

        WorkerPool::new(4)
            .run(&queue, &DryRunExecutor, &stats, &ProgressBar::hidden())
            .unwrap();

        assert!(stats.is_success());
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_executor_reports_exit_status() {
        assert_eq!(ShellExecutor.execute("exit 0"), JobStatus::Success);
        assert_eq!(ShellExecutor.execute("exit 7"), JobStatus::Failed(7));
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_executor_keeps_quotes() {
        assert_eq!(
            ShellExecutor.execute(r#"test "a b" = "a b""#),
            JobStatus::Success
        );
    }

    #[cfg(windows)]
    #[test]
    fn test_shell_executor_reports_exit_status() {
        assert_eq!(ShellExecutor.execute("exit 0"), JobStatus::Success);
        assert_eq!(ShellExecutor.execute("exit 7"), JobStatus::Failed(7));
    }

    #[cfg(windows)]
    #[test]
    fn test_shell_executor_keeps_quotes() {
        // 따옴표가 이스케이프되면 비교가 달라져 5로 종료됨
        assert_eq!(
            ShellExecutor.execute(r#"if "a b"=="a b" (exit 0) else (exit 5)"#),
            JobStatus::Success
        );
    }
}
