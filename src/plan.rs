//! 변환 계획 모듈
//!
//! 변환 목록을 읽고 전역 설정을 병합한 뒤, 작업 디렉토리 이동과 명령 생성을 담당합니다.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::command::CommandBuilder;
use crate::config::{ConfigTree, ItemNode};
use crate::error::{Result, XresconvError};
use crate::job::{resolve_jobs, SchemeFilter};
use crate::settings::{GlobalSettings, UnknownGlobalTag};

/// 변환 목록을 읽어 얻은 실행 계획
#[derive(Debug)]
pub struct ConvPlan {
    /// 병합된 전역 설정
    pub settings: GlobalSettings,
    /// 무시된 전역 설정 태그
    pub unknown_tags: Vec<UnknownGlobalTag>,
    /// 아직 해석하지 않은 item 노드
    pub item_nodes: Vec<ItemNode>,
}

impl ConvPlan {
    /// 변환 목록을 읽고 전역 설정을 병합
    pub fn load(conv_list: &Path) -> Result<Self> {
        let tree = ConfigTree::load(conv_list)?;
        let (settings, unknown_tags) = GlobalSettings::merge(&tree.global_nodes);

        debug!(
            globals = tree.global_nodes.len(),
            items = tree.item_nodes.len(),
            "convert list loaded"
        );

        Ok(Self {
            settings,
            unknown_tags,
            item_nodes: tree.item_nodes,
        })
    }

    /// 변환 목록 파일의 디렉토리로, 다시 설정된 작업 디렉토리로 이동
    ///
    /// 이후 실행되는 모든 변환 명령은 이 디렉토리를 물려받습니다.
    ///
    /// # Returns
    /// 이동한 뒤의 현재 디렉토리
    pub fn enter_work_dir(&self, conv_list: &Path) -> Result<PathBuf> {
        if let Some(list_dir) = conv_list.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            change_dir(list_dir)?;
        }
        change_dir(&self.settings.work_dir)?;

        env::current_dir().map_err(|e| XresconvError::WorkDir {
            path: self.settings.work_dir.clone(),
            reason: e.to_string(),
        })
    }

    /// xresloader가 현재 디렉토리 기준으로 존재하는지 확인
    pub fn check_tool(&self) -> Result<()> {
        if self.settings.xresloader_path.exists() {
            Ok(())
        } else {
            Err(XresconvError::ToolNotFound {
                path: self.settings.xresloader_path.clone(),
            })
        }
    }

    /// 활성 작업마다 변환 명령 생성 (작업 순서 유지)
    pub fn commands(&self, filter: &SchemeFilter, tool_args: &[String]) -> Result<Vec<String>> {
        let jobs = resolve_jobs(&self.item_nodes, filter)?;
        let commands = CommandBuilder::new(&self.settings, tool_args).build_all(&jobs);

        debug!(
            jobs = jobs.len(),
            enabled = commands.len(),
            "commands generated"
        );

        Ok(commands)
    }
}

fn change_dir(path: &Path) -> Result<()> {
    env::set_current_dir(path).map_err(|e| XresconvError::WorkDir {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_and_generate_commands() {
        let temp_dir = TempDir::new().unwrap();
        let conv_list = temp_dir.path().join("conv.xml");
        fs::write(
            &conv_list,
            r#"<root>
                <global>
                    <work_dir>./out</work_dir>
                    <proto>myproto</proto>
                    <strange>1</strange>
                </global>
                <list>
                    <item file="a.xlsx" scheme="S1"><option>--foo</option></item>
                    <item file="b.xlsx" scheme="S2"/>
                </list>
            </root>"#,
        )
        .unwrap();

        let plan = ConvPlan::load(&conv_list).unwrap();

        assert_eq!(plan.settings.work_dir, PathBuf::from("./out"));
        assert_eq!(plan.unknown_tags.len(), 1);

        let all = plan.commands(&SchemeFilter::default(), &[]).unwrap();
        assert_eq!(all.len(), 2);

        let only_s1 = plan
            .commands(
                &SchemeFilter::new(vec!["S1".to_string()]),
                &["--stdin".to_string()],
            )
            .unwrap();
        assert_eq!(
            only_s1,
            vec![
                "java -client -jar \"xresloader.jar\" -p myproto --foo -s \"a.xlsx\" -m \"S1\" --stdin"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_check_tool_missing() {
        let plan = ConvPlan {
            settings: GlobalSettings {
                xresloader_path: PathBuf::from("/nonexistent/xresloader.jar"),
                ..Default::default()
            },
            unknown_tags: Vec::new(),
            item_nodes: Vec::new(),
        };

        assert!(matches!(
            plan.check_tool(),
            Err(XresconvError::ToolNotFound { .. })
        ));
    }
}
