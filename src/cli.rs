//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::Parser;
use std::path::PathBuf;

use crate::job::SchemeFilter;

/// 기본 병렬 작업 수: (CPU 수 - 1) / 2 + 1
pub fn default_parallelism() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    (cpus - 1) / 2 + 1
}

/// xresconv CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "xresconv",
    author = "YourName <your@email.com>",
    version,
    disable_version_flag = true,
    override_usage = "xresconv [options...] <convert list file> [xresloader options...]",
    about = "xresloader 배치 변환 CLI - XML 변환 목록으로 변환 명령을 생성하고 병렬 실행",
    long_about = r#"
XRESLOADER BATCH CONVERTER
==========================

변환 목록 XML(include 포함)을 읽어 항목마다 xresloader 명령을 만들고
지정된 수의 워커로 병렬 실행합니다.

변환 목록 파일 뒤에 오는 인자는 모든 xresloader 명령 끝에 그대로 붙습니다.

예제:
  xresconv conv.xml
  xresconv -s item_cfg -s skill_cfg conv.xml
  xresconv -p 4 conv.xml --stdin
  xresconv -t conv.xml
"#
)]
pub struct Args {
    /// 버전 출력 후 종료
    #[arg(short = 'v', long = "version")]
    pub show_version: bool,

    /// 지정한 scheme만 변환 (여러 번 지정 가능)
    #[arg(short = 's', long = "scheme-name", value_name = "scheme")]
    pub schemes: Vec<String>,

    /// 명령을 실행하지 않고 출력만 함
    #[arg(short = 't', long = "test")]
    pub dry_run: bool,

    /// 병렬 작업 수 (기본값: (CPU 수 - 1) / 2 + 1)
    #[arg(short = 'p', long, value_name = "number", default_value_t = default_parallelism())]
    pub parallelism: usize,

    /// 상세 로그 출력
    #[arg(long)]
    pub verbose: bool,

    /// 변환 목록 XML 파일과, 모든 xresloader 명령 끝에 붙일 인자
    ///
    /// 변환 목록 파일 이후의 인자는 옵션처럼 보여도 그대로 전달됩니다.
    #[arg(value_name = "ARGS", trailing_var_arg = true)]
    pub inputs: Vec<String>,
}

impl Args {
    /// 변환 목록 파일 경로
    pub fn conv_list(&self) -> Option<PathBuf> {
        self.inputs.first().map(PathBuf::from)
    }

    /// xresloader에 그대로 넘길 인자
    pub fn tool_args(&self) -> &[String] {
        self.inputs.get(1..).unwrap_or_default()
    }

    /// scheme 허용 목록 생성
    pub fn scheme_filter(&self) -> SchemeFilter {
        SchemeFilter::new(self.schemes.clone())
    }

    /// 실제 사용할 워커 수 (최소 1)
    pub fn worker_count(&self) -> usize {
        self.parallelism.max(1)
    }
}
