//! 변환 항목 해석 모듈
//!
//! `list/item` 노드를 [`JobDescriptor`]로 바꾸고 scheme 필터로 활성화 여부를 결정합니다.

use crate::config::ItemNode;
use crate::error::{Result, XresconvError};

/// scheme 이름 허용 목록
///
/// 비어 있으면 모든 scheme을 허용합니다.
#[derive(Debug, Clone, Default)]
pub struct SchemeFilter {
    schemes: Vec<String>,
}

impl SchemeFilter {
    /// 새 필터 생성
    pub fn new(schemes: Vec<String>) -> Self {
        Self { schemes }
    }

    /// scheme 이름이 허용되는지 확인
    pub fn allows(&self, scheme: &str) -> bool {
        self.schemes.is_empty() || self.schemes.iter().any(|s| s == scheme)
    }

    /// 필터가 설정되어 있는지 확인
    pub fn is_active(&self) -> bool {
        !self.schemes.is_empty()
    }

    /// 허용된 scheme 이름 목록
    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }
}

/// 변환 작업 하나
#[derive(Debug, Clone, PartialEq)]
pub struct JobDescriptor {
    /// 원본 데이터 파일 (`file` 속성)
    pub source_file: String,
    /// 변환 scheme 이름 (`scheme` 속성)
    pub scheme_name: String,
    /// 항목별 추가 인자
    pub local_options: Vec<String>,
    /// 이번 실행에서 변환할지 여부
    pub enabled: bool,
}

/// item 노드 목록을 작업 목록으로 변환
///
/// # Arguments
/// * `items` - include 깊이 우선 순서의 item 노드
/// * `filter` - scheme 허용 목록
///
/// # Returns
/// 입력 순서를 유지한 작업 목록. `file` 또는 `scheme` 속성이 없으면 에러
pub fn resolve_jobs(items: &[ItemNode], filter: &SchemeFilter) -> Result<Vec<JobDescriptor>> {
    items.iter().map(|item| resolve_job(item, filter)).collect()
}

fn resolve_job(item: &ItemNode, filter: &SchemeFilter) -> Result<JobDescriptor> {
    let required = |attribute: &str| {
        item.element
            .attr(attribute)
            .map(str::to_string)
            .ok_or_else(|| XresconvError::MissingAttribute {
                file: item.source.clone(),
                attribute: attribute.to_string(),
            })
    };

    let source_file = required("file")?;
    let scheme_name = required("scheme")?;

    let local_options = item
        .element
        .children_named("option")
        .filter_map(|option| option.trimmed_text())
        .map(str::to_string)
        .collect();

    let enabled = filter.allows(&scheme_name);

    Ok(JobDescriptor {
        source_file,
        scheme_name,
        local_options,
        enabled,
    })
}
