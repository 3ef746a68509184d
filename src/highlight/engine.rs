//! 語法高亮引擎
//!
//! 逐行高亮：LineHighlighter 內部維護詞法狀態
//! （塊註解旗標 + 條件編譯區域堆疊），必須循序處理行
//! 才能正確處理跨行語法與 `ifdef 區域。
//!
//! 實現特點：
//! - Token 層級過濾換行符（避免 Linux 終端殘影問題）
//! - 優化 ANSI 碼生成（只在顏色變化時輸出，減少輸出大小）
//! - 被排除區域的 token 以 disabled 色輸出（指令本身除外）

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::dialect::Dialect;
use crate::highlight::theme::{Rgb, Theme};
use crate::lexer::{LexState, Lexer};
use crate::preproc::DefineTable;
use crate::token::Token;

/// 語法高亮引擎
pub struct HighlightEngine {
    theme: Theme,
    dialect: Dialect,
    true_color: bool,
    defines: Option<DefineTable>,
}

impl HighlightEngine {
    /// 建立新的高亮引擎
    pub fn new(theme_name: Option<&str>, true_color: bool) -> Result<Self> {
        let theme_name = theme_name.unwrap_or("eighties");
        let theme = Theme::by_name(theme_name)
            .with_context(|| format!("Theme '{}' not found", theme_name))?;

        Ok(Self {
            theme,
            dialect: Dialect::SystemVerilog,
            true_color,
            defines: None,
        })
    }

    /// 設定當前檔案（從副檔名檢測方言）
    pub fn set_file(&mut self, file_path: Option<&Path>) {
        if let Some(path) = file_path {
            self.dialect = Dialect::from_path(path);
        }
    }

    pub fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
    }

    /// 啟用求值模式：以巨集表求 `ifdef/`ifndef 的真值
    ///
    /// 不啟用時為結構模式（不追蹤巨集，只反映巢狀關係）
    pub fn enable_preprocessor(&mut self, table: DefineTable) {
        self.defines = Some(table);
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// 取得當前主題名稱
    pub fn theme_name(&self) -> &'static str {
        self.theme.name
    }

    /// 取得可用主題清單
    pub fn available_themes() -> Vec<&'static str> {
        Theme::available()
    }

    /// 建立新的高亮器（用於逐行高亮），從檔案開頭的狀態起算
    pub fn create_highlighter(&self) -> LineHighlighter {
        let state = match &self.defines {
            Some(table) => LexState::with_defines(table.clone()),
            None => LexState::new(),
        };
        self.resume_highlighter(state)
    }

    /// 從既有狀態還原高亮器（快取的安全重啟點）
    pub fn resume_highlighter(&self, state: LexState) -> LineHighlighter {
        LineHighlighter {
            lexer: Lexer::new(self.dialect),
            state,
            theme: self.theme.clone(),
            true_color: self.true_color,
        }
    }
}

/// 逐行高亮器（維護內部詞法狀態）
///
/// ⚠️ 行必須依序餵入；修改某行後，該行之後都要重算
/// （或由 HighlightCache 提供最近的還原點）
pub struct LineHighlighter {
    lexer: Lexer,
    state: LexState,
    theme: Theme,
    true_color: bool,
}

impl LineHighlighter {
    /// 高亮單行，返回 ANSI 色碼字串
    ///
    /// 不會失敗：最壞情況是分類不理想，輸出仍是合法的純文字加色碼
    pub fn highlight_line(&mut self, line: &str) -> String {
        let tokens = self.lexer.lex_line(line, &mut self.state);
        self.tokens_to_ansi(line, &tokens)
    }

    /// 只分類不上色（給需要自行渲染的 host 用）
    pub fn tokenize_line(&mut self, line: &str) -> Vec<Token> {
        self.lexer.lex_line(line, &mut self.state)
    }

    /// 此刻的詞法狀態（行邊界快照可做快取還原點）
    pub fn state(&self) -> &LexState {
        &self.state
    }

    /// 優化的 ANSI 碼生成
    ///
    /// 1. Token 層級過濾換行符（修復 Linux 殘影問題）
    /// 2. 只在顏色變化時輸出色碼（減少輸出大小）
    /// 3. 統一處理真彩色和 256 色模式
    fn tokens_to_ansi(&self, line: &str, tokens: &[Token]) -> String {
        let mut output = String::with_capacity(line.len() + 64);
        let mut last_color: Option<Rgb> = None;
        let mut pos = 0;

        for tok in tokens {
            // token 之間只有空白，原樣輸出
            if tok.start > pos {
                push_clean(&mut output, &line[pos..tok.start]);
            }
            pos = tok.end;

            let fg = self.theme.color_for(tok.scope, tok.disabled);
            if last_color != Some(fg) {
                if self.true_color {
                    let _ = write!(output, "\x1b[38;2;{};{};{}m", fg.r, fg.g, fg.b);
                } else {
                    let code = ansi_colours::ansi256_from_rgb((fg.r, fg.g, fg.b));
                    let _ = write!(output, "\x1b[38;5;{}m", code);
                }
                last_color = Some(fg);
            }
            push_clean(&mut output, &line[tok.start..tok.end]);
        }
        if pos < line.len() {
            push_clean(&mut output, &line[pos..]);
        }

        // 只在有輸出色碼時才需要 reset
        if last_color.is_some() && !output.is_empty() {
            output.push_str("\x1b[0m");
        }

        output
    }
}

/// 過濾換行符後附加文字
#[inline]
fn push_clean(output: &mut String, text: &str) {
    for c in text.chars() {
        if c != '\n' && c != '\r' {
            output.push(c);
        }
    }
}

/// 檢測終端是否支援 24-bit 真彩色
///
/// 檢測策略：
/// 1. 檢查 COLORTERM 環境變數
/// 2. 檢查 TERM 環境變數
/// 3. Windows 特殊處理（Windows Terminal, Windows 11）
pub fn supports_true_color() -> bool {
    // 1. 檢查 COLORTERM（最可靠的方式）
    if let Ok(colorterm) = std::env::var("COLORTERM") {
        if colorterm == "truecolor" || colorterm == "24bit" {
            return true;
        }
    }

    // 2. 檢查 TERM
    if let Ok(term) = std::env::var("TERM") {
        if term.contains("24bit") || term.contains("truecolor") {
            return true;
        }
        if term.contains("iterm") || term.contains("konsole") {
            return true;
        }
    }

    // 3. Windows 特殊處理
    #[cfg(windows)]
    {
        // Windows Terminal 支援真彩色
        if std::env::var("WT_SESSION").is_ok() {
            return true;
        }

        if is_windows_virtual_terminal_enabled() {
            return true;
        }
    }

    // 預設：降級為 256 色
    false
}

#[cfg(windows)]
fn is_windows_virtual_terminal_enabled() -> bool {
    // 檢查是否啟用 ENABLE_VIRTUAL_TERMINAL_PROCESSING
    unsafe {
        use winapi::um::consoleapi::GetConsoleMode;
        use winapi::um::handleapi::INVALID_HANDLE_VALUE;
        use winapi::um::processenv::GetStdHandle;
        use winapi::um::winbase::STD_OUTPUT_HANDLE;
        use winapi::um::wincon::ENABLE_VIRTUAL_TERMINAL_PROCESSING;

        let handle = GetStdHandle(STD_OUTPUT_HANDLE);
        if handle == INVALID_HANDLE_VALUE {
            return false;
        }

        let mut mode = 0;
        if GetConsoleMode(handle, &mut mode) == 0 {
            return false;
        }

        (mode & ENABLE_VIRTUAL_TERMINAL_PROCESSING) != 0
    }
}
