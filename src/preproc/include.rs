// `include 解析
//
// 先找包含檔所在目錄，再找設定的 incdirs。
// 被包含的檔案只為了收集巨集名稱而掃描（求值模式用），不產生高亮輸出。
// 遞迴深度有上限，循環包含不會卡死

use std::path::{Path, PathBuf};

use crate::dialect::Dialect;
use crate::lexer::{LexState, Lexer};
use crate::preproc::defines::DefineTable;
use crate::token::{Scope, Token};
use crate::utils;

const MAX_INCLUDE_DEPTH: usize = 16;

pub struct IncludeResolver {
    incdirs: Vec<PathBuf>,
}

impl IncludeResolver {
    pub fn new(incdirs: Vec<PathBuf>) -> Self {
        Self { incdirs }
    }

    /// 解析包含目標的實際路徑
    pub fn resolve(&self, from_dir: Option<&Path>, target: &str) -> Option<PathBuf> {
        if let Some(dir) = from_dir {
            let candidate = dir.join(target);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        for dir in &self.incdirs {
            let candidate = dir.join(target);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }

    /// 遞迴掃描檔案，把遇到的 `define 名稱收進 table
    ///
    /// 掃描是條件感知的：disabled 區域內的 define/include 不生效。
    /// 打不開或找不到的檔案記警告後跳過，不報錯
    pub fn harvest(&self, path: &Path, table: &mut DefineTable) {
        self.harvest_inner(path, table, 0);
    }

    fn harvest_inner(&self, path: &Path, table: &mut DefineTable, depth: usize) {
        if depth > MAX_INCLUDE_DEPTH {
            log::warn!(
                "`include depth limit ({}) reached at `{}`",
                MAX_INCLUDE_DEPTH,
                path.display()
            );
            return;
        }
        let content = match utils::read_to_string_lossy(path) {
            Ok(content) => content,
            Err(err) => {
                log::warn!("can't open `{}`: {err:#}", path.display());
                return;
            }
        };

        let parent = path.parent().map(PathBuf::from);
        let lexer = Lexer::new(Dialect::from_path(path));
        // 巨集表暫時移進詞法狀態，掃描完再放回
        let mut state = LexState::with_defines(std::mem::take(table));

        for line in content.lines() {
            let tokens = lexer.lex_line(line, &mut state);
            if let Some(target) = include_target(line, &tokens) {
                if state.is_active() {
                    match self.resolve(parent.as_deref(), &target) {
                        Some(sub) => {
                            if let Some(inner) = state.defines_mut() {
                                self.harvest_inner(&sub, inner, depth + 1);
                            }
                        }
                        None => log::warn!("can't resolve `include \"{target}\""),
                    }
                }
            }
        }

        *table = state.into_defines().unwrap_or_default();
    }
}

/// 從 token 流找出 `include 的目標檔名
fn include_target(line: &str, tokens: &[Token]) -> Option<String> {
    let mut iter = tokens.iter();
    while let Some(tok) = iter.next() {
        if tok.scope == Scope::Directive && tok.text(line) == "`include" {
            let next = iter.next()?;
            if next.scope == Scope::String {
                let quoted = next.text(line);
                return Some(quoted.trim_matches('"').to_string());
            }
            return None;
        }
    }
    None
}
