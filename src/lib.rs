//! xresconv - xresloader 배치 변환 CLI
//!
//! 변환 목록 XML을 읽어 변환 항목마다 xresloader 명령을 만들고,
//! 고정 크기 워커 풀로 병렬 실행한 뒤 하나의 종료 코드로 결과를 알려줍니다.
//!
//! # 주요 기능
//!
//! - 📂 **include 병합**: 변환 목록이 include 하는 문서를 깊이 우선으로 모두 읽음
//! - ⚙️ **전역 설정 병합**: 같은 설정은 나중 값이 이기고, `option`은 누적
//! - 🔍 **scheme 필터**: 지정한 scheme만 변환
//! - 🚀 **병렬 실행**: 공유 큐를 여러 워커가 나눠 가져가며 실행
//! - 🧪 **테스트 실행**: 명령을 실행하지 않고 출력만 확인
//! - ❌ **실패 집계**: 한 작업이 실패해도 나머지는 계속 실행되고, 종료 코드에 반영
//!
//! # 예제
//!
//! ```bash
//! # 기본 사용법
//! xresconv conv.xml
//!
//! # 특정 scheme만, 4개 워커로
//! xresconv -p 4 -s item_cfg conv.xml
//!
//! # 모든 명령 끝에 xresloader 옵션 추가
//! xresconv conv.xml --enable-string-macro
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod job;
pub mod plan;
pub mod runner;
pub mod settings;
pub mod stats;
pub mod xml;

// Re-exports for convenient access
pub use cli::Args;
pub use command::CommandBuilder;
pub use config::{ConfigTree, ItemNode};
pub use error::{Result, XresconvError};
pub use job::{resolve_jobs, JobDescriptor, SchemeFilter};
pub use plan::ConvPlan;
pub use runner::{CommandExecutor, DryRunExecutor, JobQueue, JobStatus, ShellExecutor, WorkerPool};
pub use settings::GlobalSettings;
pub use stats::RunStats;
