//! 에러 타입 정의 모듈
//!
//! xresconv에서 발생할 수 있는 모든 에러 타입과 프로세스 종료 코드를 정의합니다.

use std::path::PathBuf;
use thiserror::Error;

/// 변환 목록 파일 인자가 없을 때의 종료 코드
pub const EXIT_MISSING_INPUT: i32 = -1;
/// 변환 목록 XML이 잘못되었을 때의 종료 코드
pub const EXIT_CONFIG_LOAD: i32 = -2;
/// XML 루트 노드가 없을 때의 종료 코드
pub const EXIT_MISSING_ROOT: i32 = -3;
/// xresloader를 찾을 수 없을 때의 종료 코드
pub const EXIT_TOOL_NOT_FOUND: i32 = -4;
/// 작업 디렉토리 변경 실패 시의 종료 코드
pub const EXIT_WORK_DIR: i32 = -5;
/// 워커 풀 생성 실패 시의 종료 코드
pub const EXIT_THREAD_POOL: i32 = -6;

/// xresconv에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum XresconvError {
    /// 변환 목록 파일이 지정되지 않음
    #[error("변환 목록 파일이 지정되지 않았습니다")]
    MissingInput,

    /// XML 파일 읽기 또는 파싱 실패
    #[error("변환 목록을 읽을 수 없습니다 ({file}): {reason}")]
    ConfigLoad { file: PathBuf, reason: String },

    /// XML에 루트 노드가 없음
    #[error("XML에서 루트 노드를 찾을 수 없습니다: {file}")]
    MissingRoot { file: PathBuf },

    /// include가 자기 자신으로 되돌아옴
    #[error("순환 include가 감지되었습니다: {file}")]
    IncludeCycle { file: PathBuf },

    /// item 노드에 필수 속성이 없음
    #[error("item 노드에 '{attribute}' 속성이 없습니다 ({file})")]
    MissingAttribute { file: PathBuf, attribute: String },

    /// xresloader 실행 파일이 없음
    #[error("xresloader를 찾을 수 없습니다: {path}")]
    ToolNotFound { path: PathBuf },

    /// 작업 디렉토리 변경 실패
    #[error("작업 디렉토리로 이동할 수 없습니다 ({path}): {reason}")]
    WorkDir { path: PathBuf, reason: String },

    /// 스레드 풀 초기화 실패
    #[error("스레드 풀 초기화 실패: {reason}")]
    ThreadPool { reason: String },
}

impl XresconvError {
    /// 에러 종류별 프로세스 종료 코드
    pub fn exit_code(&self) -> i32 {
        match self {
            XresconvError::MissingInput => EXIT_MISSING_INPUT,
            XresconvError::ConfigLoad { .. }
            | XresconvError::IncludeCycle { .. }
            | XresconvError::MissingAttribute { .. } => EXIT_CONFIG_LOAD,
            XresconvError::MissingRoot { .. } => EXIT_MISSING_ROOT,
            XresconvError::ToolNotFound { .. } => EXIT_TOOL_NOT_FOUND,
            XresconvError::WorkDir { .. } => EXIT_WORK_DIR,
            XresconvError::ThreadPool { .. } => EXIT_THREAD_POOL,
        }
    }

    /// 사용법을 함께 출력해야 하는 에러인지 여부 (입력 누락, 루트 노드 없음)
    pub fn shows_usage(&self) -> bool {
        matches!(
            self,
            XresconvError::MissingInput | XresconvError::MissingRoot { .. }
        )
    }
}

/// xresconv 결과 타입 별칭
pub type Result<T> = std::result::Result<T, XresconvError>;
