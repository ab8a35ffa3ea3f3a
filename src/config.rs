//! 변환 목록 로더 모듈
//!
//! 변환 목록 XML과 그 안에서 include 된 문서들을 재귀적으로 읽어
//! global 노드와 item 노드를 순서대로 모읍니다.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, XresconvError};
use crate::xml::{parse_document, Element};

/// item 노드와 그 노드가 선언된 문서
#[derive(Debug, Clone)]
pub struct ItemNode {
    /// 노드가 들어 있던 문서 경로
    pub source: PathBuf,
    /// `list/item` 요소
    pub element: Element,
}

/// include를 모두 펼친 변환 목록
#[derive(Debug, Default)]
pub struct ConfigTree {
    /// `global` 노드 (include 깊이 우선 순서)
    pub global_nodes: Vec<Element>,
    /// `list/item` 노드 (include 깊이 우선 순서)
    pub item_nodes: Vec<ItemNode>,
}

impl ConfigTree {
    /// 루트 문서부터 include 트리 전체를 읽음
    ///
    /// include 된 문서의 노드는 include 한 문서의 노드보다 앞에 옵니다.
    /// 이미 include 경로 위에 있는 문서를 다시 include 하면 `IncludeCycle` 에러입니다.
    pub fn load(path: &Path) -> Result<Self> {
        let mut tree = ConfigTree::default();
        let mut include_stack = Vec::new();
        tree.load_document(path, &mut include_stack)?;
        Ok(tree)
    }

    fn load_document(&mut self, path: &Path, include_stack: &mut Vec<PathBuf>) -> Result<()> {
        let identity = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if include_stack.contains(&identity) {
            return Err(XresconvError::IncludeCycle {
                file: path.to_path_buf(),
            });
        }

        debug!(file = %path.display(), depth = include_stack.len(), "loading convert list");
        let root = read_root(path)?;

        include_stack.push(identity);
        let dir_prefix = path.parent().unwrap_or_else(|| Path::new(""));
        for include in root.children_named("include") {
            if let Some(include_path) = include.trimmed_text() {
                self.load_document(&resolve_include(dir_prefix, include_path), include_stack)?;
            }
        }
        include_stack.pop();

        self.global_nodes.extend(root.children_named("global").cloned());

        for list in root.children_named("list") {
            self.item_nodes.extend(list.children_named("item").map(|item| ItemNode {
                source: path.to_path_buf(),
                element: item.clone(),
            }));
        }

        Ok(())
    }
}

/// 문서를 읽고 루트 요소를 반환
fn read_root(path: &Path) -> Result<Element> {
    let content = fs::read(path).map_err(|e| XresconvError::ConfigLoad {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    parse_document(&content)
        .map_err(|reason| XresconvError::ConfigLoad {
            file: path.to_path_buf(),
            reason,
        })?
        .ok_or_else(|| XresconvError::MissingRoot {
            file: path.to_path_buf(),
        })
}

/// include 경로 해석
///
/// `/`로 시작하거나 두 번째 글자가 `:`인 경로(드라이브 문자)는 그대로 사용하고,
/// 그 외에는 include를 선언한 문서의 디렉토리를 기준으로 합니다.
pub fn resolve_include(dir_prefix: &Path, include_path: &str) -> PathBuf {
    let is_rooted = include_path.starts_with('/') || include_path.chars().nth(1) == Some(':');
    if is_rooted {
        PathBuf::from(include_path)
    } else {
        dir_prefix.join(include_path)
    }
}
