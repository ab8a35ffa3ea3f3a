//! 전역 설정 병합 모듈
//!
//! 모든 `global` 노드를 순서대로 훑으며 하나의 [`GlobalSettings`]로 합칩니다.
//! 같은 키가 여러 번 나오면 마지막 값이 이깁니다.

use std::path::PathBuf;

use tracing::debug;

use crate::xml::Element;

/// 기본 작업 디렉토리
pub const DEFAULT_WORK_DIR: &str = ".";
/// 기본 xresloader 경로
pub const DEFAULT_XRESLOADER_PATH: &str = "xresloader.jar";

/// 이름이 있는 xresloader 인자 목록
///
/// 키는 유일하며, 순회 순서는 키가 처음 등록된 순서입니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedArgs {
    entries: Vec<(String, String)>,
}

impl NamedArgs {
    /// 값 설정 (이미 있는 키면 자리를 유지한 채 값만 교체)
    pub fn set(&mut self, key: &str, value: String) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// 값 조회
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// (키, 값) 순회
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 등록된 키 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 등록된 키가 없는지 확인
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 모든 변환 작업에 공통으로 적용되는 설정
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSettings {
    /// 변환 명령을 실행할 작업 디렉토리
    pub work_dir: PathBuf,
    /// xresloader jar 경로
    pub xresloader_path: PathBuf,
    /// `-p`, `-t`, `-f`, `-o`, `-d`, `-n` 인자
    pub named_args: NamedArgs,
    /// `option` 태그로 추가된 공통 인자
    pub extra_args: Vec<String>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            xresloader_path: PathBuf::from(DEFAULT_XRESLOADER_PATH),
            named_args: NamedArgs::default(),
            extra_args: Vec::new(),
        }
    }
}

/// 알 수 없는 전역 설정 태그
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownGlobalTag {
    pub tag: String,
}

impl GlobalSettings {
    /// global 노드 목록을 병합
    ///
    /// # Arguments
    /// * `nodes` - include 깊이 우선 순서로 모인 `global` 노드
    ///
    /// # Returns
    /// 병합된 설정과 무시된 태그 목록
    pub fn merge(nodes: &[Element]) -> (Self, Vec<UnknownGlobalTag>) {
        let mut settings = GlobalSettings::default();
        let mut unknown = Vec::new();

        for option in nodes.iter().flat_map(|node| node.children.iter()) {
            if !settings.apply(option) {
                unknown.push(UnknownGlobalTag {
                    tag: option.tag.to_lowercase(),
                });
            }
        }

        debug!(
            named_args = settings.named_args.len(),
            extra_args = settings.extra_args.len(),
            "merged global settings"
        );

        (settings, unknown)
    }

    /// 설정 요소 하나를 적용 (알 수 없는 태그면 false)
    fn apply(&mut self, option: &Element) -> bool {
        let Some(trimmed) = option.trimmed_text() else {
            return true;
        };
        let raw = option.text.as_str();

        match option.tag.to_lowercase().as_str() {
            "work_dir" => self.work_dir = PathBuf::from(raw),
            "xresloader_path" => self.xresloader_path = PathBuf::from(raw),
            "proto" => self.named_args.set("-p", trimmed.to_string()),
            "output_type" => self.named_args.set("-t", trimmed.to_string()),
            "proto_file" => self.named_args.set("-f", quote(raw)),
            "output_dir" => self.named_args.set("-o", quote(raw)),
            "data_src_dir" => self.named_args.set("-d", quote(raw)),
            "rename" => self.named_args.set("-n", quote(trimmed)),
            "option" => self.extra_args.push(trimmed.to_string()),
            _ => return false,
        }

        true
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    fn globals(xml: &str) -> Vec<Element> {
        parse_document(xml)
            .unwrap()
            .unwrap()
            .children_named("global")
            .cloned()
            .collect()
    }

    #[test]
    fn test_defaults() {
        let (settings, unknown) = GlobalSettings::merge(&[]);
        assert_eq!(settings, GlobalSettings::default());
        assert_eq!(settings.work_dir, PathBuf::from("."));
        assert_eq!(settings.xresloader_path, PathBuf::from("xresloader.jar"));
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_recognized_tags() {
        let nodes = globals(
            r#"<r><global>
                <work_dir> ../out </work_dir>
                <xresloader_path>tools/xresloader.jar</xresloader_path>
                <proto> protobuf </proto>
                <output_type>bin</output_type>
                <proto_file>proto/kind.pb</proto_file>
                <output_dir>res</output_dir>
                <data_src_dir>xlsx</data_src_dir>
                <rename> /(?i)\.bin$/\.bytes/ </rename>
                <option> --enable-excel-formular </option>
                <option>--pretty 2</option>
            </global></r>"#,
        );

        let (settings, unknown) = GlobalSettings::merge(&nodes);

        assert!(unknown.is_empty());
        assert_eq!(settings.work_dir, PathBuf::from(" ../out "));
        assert_eq!(settings.xresloader_path, PathBuf::from("tools/xresloader.jar"));
        assert_eq!(settings.named_args.get("-p"), Some("protobuf"));
        assert_eq!(settings.named_args.get("-t"), Some("bin"));
        assert_eq!(settings.named_args.get("-f"), Some("\"proto/kind.pb\""));
        assert_eq!(settings.named_args.get("-o"), Some("\"res\""));
        assert_eq!(settings.named_args.get("-d"), Some("\"xlsx\""));
        assert_eq!(settings.named_args.get("-n"), Some(r#""/(?i)\.bin$/\.bytes/""#));
        assert_eq!(
            settings.extra_args,
            vec!["--enable-excel-formular", "--pretty 2"]
        );
    }

    #[test]
    fn test_last_write_wins() {
        let nodes = globals(
            r#"<r>
                <global><output_dir>x</output_dir><proto>a</proto></global>
                <global><output_dir>y</output_dir></global>
            </r>"#,
        );

        let (settings, _) = GlobalSettings::merge(&nodes);

        assert_eq!(settings.named_args.get("-o"), Some("\"y\""));
        // 키 순서는 처음 등록된 순서 유지
        let keys: Vec<_> = settings.named_args.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["-o", "-p"]);
    }

    #[test]
    fn test_options_accumulate_across_nodes() {
        let nodes = globals(
            r#"<r>
                <global><option>--a</option></global>
                <global><option>--b</option><option>--a</option></global>
            </r>"#,
        );

        let (settings, _) = GlobalSettings::merge(&nodes);
        assert_eq!(settings.extra_args, vec!["--a", "--b", "--a"]);
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let nodes = globals(
            r#"<r>
                <global><proto>keep</proto></global>
                <global><proto>   </proto><work_dir/><unknown_tag/></global>
            </r>"#,
        );

        let (settings, unknown) = GlobalSettings::merge(&nodes);

        assert_eq!(settings.named_args.get("-p"), Some("keep"));
        assert_eq!(settings.work_dir, PathBuf::from("."));
        // 값이 없는 태그는 태그 종류를 보기 전에 건너뜀
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_tags_are_case_insensitive_and_unknown_reported() {
        let nodes = globals(
            r#"<r><global>
                <PROTO>upper</PROTO>
                <Output_Type>json</Output_Type>
                <Mystery>value</Mystery>
            </global></r>"#,
        );

        let (settings, unknown) = GlobalSettings::merge(&nodes);

        assert_eq!(settings.named_args.get("-p"), Some("upper"));
        assert_eq!(settings.named_args.get("-t"), Some("json"));
        assert_eq!(
            unknown,
            vec![UnknownGlobalTag {
                tag: "mystery".to_string()
            }]
        );
    }
}
