//! 변환 명령 생성 모듈
//!
//! 전역 설정, 작업 목록, 사용자가 넘긴 추가 인자를 합쳐 작업마다 하나의 셸 명령을 만듭니다.

use crate::job::JobDescriptor;
use crate::settings::GlobalSettings;

/// 변환 명령 생성기
///
/// 모든 작업에 공통인 앞부분과 뒷부분은 한 번만 조립해 둡니다.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    prefix: String,
    suffix: String,
}

impl CommandBuilder {
    /// 새 명령 생성기
    ///
    /// # Arguments
    /// * `settings` - 병합된 전역 설정
    /// * `pass_through` - 명령줄 끝에 그대로 붙일 사용자 인자
    pub fn new(settings: &GlobalSettings, pass_through: &[String]) -> Self {
        let mut prefix = format!(
            "java -client -jar \"{}\"",
            settings.xresloader_path.display()
        );
        for (key, value) in settings.named_args.iter() {
            prefix.push(' ');
            prefix.push_str(key);
            prefix.push(' ');
            prefix.push_str(value);
        }
        push_tokens(&mut prefix, &settings.extra_args);

        let mut suffix = String::new();
        push_tokens(&mut suffix, pass_through);

        Self { prefix, suffix }
    }

    /// 작업 하나의 명령 생성 (비활성 작업이면 None)
    pub fn build(&self, job: &JobDescriptor) -> Option<String> {
        if !job.enabled {
            return None;
        }

        let mut command = self.prefix.clone();
        push_tokens(&mut command, &job.local_options);
        command.push_str(&format!(
            " -s \"{}\" -m \"{}\"",
            job.source_file, job.scheme_name
        ));
        command.push_str(&self.suffix);

        Some(command)
    }

    /// 활성 작업의 명령을 작업 순서대로 생성
    pub fn build_all(&self, jobs: &[JobDescriptor]) -> Vec<String> {
        jobs.iter().filter_map(|job| self.build(job)).collect()
    }
}

fn push_tokens(target: &mut String, tokens: &[String]) {
    for token in tokens {
        target.push(' ');
        target.push_str(token);
    }
}
