// Verilog/SystemVerilog 行級掃描器
//
// 逐行產生分類後的 token，跨行狀態（塊註解、條件編譯區域堆疊）
// 由呼叫端以 LexState 傳遞。行必須依序餵入；
// 任何一行被修改後，該行之後的狀態都要從頭（或最近的快取點）重算。
//
// 註解與字串內的反引號不是指令（先比對註解／字串，再比對指令）

use crate::dialect::Dialect;
use crate::keywords::is_keyword;
use crate::preproc::directive::{parse_directive, Directive};
use crate::preproc::{ConditionalTracker, DefineTable};
use crate::token::{Scope, Token};

/// 跨行詞法狀態
///
/// 每個檔案掃描各持一份；掃描結束即丟棄，不跨檔案共用
#[derive(Debug, Clone, PartialEq)]
pub struct LexState {
    in_block_comment: bool,
    tracker: ConditionalTracker,
}

impl LexState {
    /// 結構模式（預設）：不求巨集真值
    pub fn new() -> Self {
        Self {
            in_block_comment: false,
            tracker: ConditionalTracker::structural(),
        }
    }

    /// 求值模式：以巨集表求 `ifdef/`ifndef 真值
    pub fn with_defines(table: DefineTable) -> Self {
        Self {
            in_block_comment: false,
            tracker: ConditionalTracker::evaluated(table),
        }
    }

    /// 目前位置是否在 active 區域（檔案根層永遠 active）
    pub fn is_active(&self) -> bool {
        self.tracker.is_active()
    }

    /// 條件編譯巢狀深度
    pub fn depth(&self) -> usize {
        self.tracker.depth()
    }

    pub fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }

    pub fn defines(&self) -> Option<&DefineTable> {
        self.tracker.defines()
    }

    pub fn defines_mut(&mut self) -> Option<&mut DefineTable> {
        self.tracker.defines_mut()
    }

    pub fn into_defines(self) -> Option<DefineTable> {
        self.tracker.into_defines()
    }
}

impl Default for LexState {
    fn default() -> Self {
        Self::new()
    }
}

/// 行級 lexer
pub struct Lexer {
    dialect: Dialect,
}

impl Lexer {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// 掃描一行，回傳分類後的 token（空白不產生 token）
    pub fn lex_line(&self, line: &str, state: &mut LexState) -> Vec<Token> {
        let mut tokens = Vec::new();
        let n = line.len();
        let mut i = 0;

        // 接續上一行未結束的塊註解
        if state.in_block_comment {
            match line.find("*/") {
                Some(end) => {
                    push(&mut tokens, 0, end + 2, Scope::Comment, state);
                    state.in_block_comment = false;
                    i = end + 2;
                }
                None => {
                    if !line.is_empty() {
                        push(&mut tokens, 0, n, Scope::Comment, state);
                    }
                    return tokens;
                }
            }
        }

        while i < n {
            let c = match line[i..].chars().next() {
                Some(c) => c,
                None => break,
            };
            if c.is_whitespace() {
                i += c.len_utf8();
                continue;
            }
            let rest = &line[i..];

            // 單行註解
            if rest.starts_with("//") {
                push(&mut tokens, i, n, Scope::Comment, state);
                break;
            }
            // 塊註解（可能跨行）
            if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(e) => {
                        let end = i + 2 + e + 2;
                        push(&mut tokens, i, end, Scope::Comment, state);
                        i = end;
                    }
                    None => {
                        push(&mut tokens, i, n, Scope::Comment, state);
                        state.in_block_comment = true;
                        i = n;
                    }
                }
                continue;
            }
            // 字串（不跨行；沒結尾就吃到行尾，不報錯）
            if c == '"' {
                let end = scan_string(line, i);
                push(&mut tokens, i, end, Scope::String, state);
                i = end;
                continue;
            }
            // 編譯指令
            if c == '`' {
                i = self.lex_directive(line, i, state, &mut tokens);
                continue;
            }
            // 系統任務／函式
            if c == '$' {
                let end = scan_ident(line, i + 1);
                if end > i + 1 {
                    push(&mut tokens, i, end, Scope::SystemTask, state);
                    i = end;
                } else {
                    push(&mut tokens, i, i + 1, Scope::Default, state);
                    i += 1;
                }
                continue;
            }
            // 跳脫識別字：反斜線到下一個空白為止
            if c == '\\' {
                let end = line[i + 1..]
                    .find(char::is_whitespace)
                    .map(|e| i + 1 + e)
                    .unwrap_or(n);
                push(&mut tokens, i, end.max(i + 1), Scope::Identifier, state);
                i = end.max(i + 1);
                continue;
            }
            // 數值（含 based literal 與 '0/'1/'x/'z）
            if c.is_ascii_digit() || c == '\'' {
                let end = scan_number(line, i);
                if end > i {
                    push(&mut tokens, i, end, Scope::Number, state);
                    i = end;
                } else {
                    // 單獨的撇號（如 SV 的 '{）
                    push(&mut tokens, i, i + 1, Scope::Punctuation, state);
                    i += 1;
                }
                continue;
            }
            // 識別字或關鍵字
            if c.is_ascii_alphabetic() || c == '_' {
                let end = scan_ident(line, i);
                let scope = if is_keyword(&line[i..end], self.dialect) {
                    Scope::Keyword
                } else {
                    Scope::Identifier
                };
                push(&mut tokens, i, end, scope, state);
                i = end;
                continue;
            }
            // 運算子（先比長的）
            if let Some(len) = match_operator(rest) {
                push(&mut tokens, i, i + len, Scope::Operator, state);
                i += len;
                continue;
            }
            if matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | ',' | ';' | '.' | '#' | '@') {
                push(&mut tokens, i, i + 1, Scope::Punctuation, state);
                i += 1;
                continue;
            }
            push(&mut tokens, i, i + c.len_utf8(), Scope::Default, state);
            i += c.len_utf8();
        }

        tokens
    }

    /// 掃描反引號開頭的指令並更新區域狀態
    ///
    /// 回傳掃描後的位置。`define 的整行剩餘部分視為一個指令 span
    fn lex_directive(
        &self,
        line: &str,
        at: usize,
        state: &mut LexState,
        tokens: &mut Vec<Token>,
    ) -> usize {
        let word_start = at + 1;
        let word_end = scan_ident(line, word_start);
        if word_end == word_start {
            // 孤立的反引號
            push(tokens, at, at + 1, Scope::Default, state);
            return at + 1;
        }

        let word = &line[word_start..word_end];
        let directive = parse_directive(word, &line[word_end..]);
        state.tracker.apply(&directive);

        if matches!(directive, Directive::Define(_)) {
            // 本體不做細部著色：整行剩餘部分是一個扁平的指令 span
            tokens.push(Token::new(at, line.len(), Scope::Directive, false));
            return line.len();
        }

        tokens.push(Token::new(at, word_end, Scope::Directive, false));
        word_end
    }
}

/// 指令以外的 token 依目前區域狀態決定 disabled；指令 token 永遠不標 disabled
fn push(tokens: &mut Vec<Token>, start: usize, end: usize, scope: Scope, state: &LexState) {
    let disabled = scope != Scope::Directive && !state.is_active();
    tokens.push(Token::new(start, end, scope, disabled));
}

fn scan_ident(line: &str, from: usize) -> usize {
    let mut end = from;
    for c in line[from..].chars() {
        let ok = if end == from {
            c.is_ascii_alphabetic() || c == '_'
        } else {
            c.is_ascii_alphanumeric() || c == '_' || c == '$'
        };
        if !ok {
            break;
        }
        end += c.len_utf8();
    }
    end
}

/// 掃描字串，回傳結尾（含引號）的位置；支援反斜線跳脫
fn scan_string(line: &str, at: usize) -> usize {
    let mut escaped = false;
    for (off, c) in line[at + 1..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => return at + 1 + off + 1,
            _ => {}
        }
    }
    line.len()
}

fn is_base_char(c: char) -> bool {
    matches!(c, 'b' | 'B' | 'o' | 'O' | 'd' | 'D' | 'h' | 'H')
}

fn is_base_digit(c: char) -> bool {
    c.is_ascii_hexdigit() || matches!(c, 'x' | 'X' | 'z' | 'Z' | '?' | '_')
}

/// 掃描數值字面量；回傳結尾位置，非數值時回傳原位置
///
/// 支援：十進位、實數（3.14、1e9）、based literal（4'b1010、'hFF）、
/// 單引號常量（'0 '1 'x 'z）
fn scan_number(line: &str, at: usize) -> usize {
    let mut i = at;
    let rest = &line[at..];

    if rest.starts_with('\'') {
        return scan_based_tail(line, at);
    }

    // 整數部分
    for c in rest.chars() {
        if c.is_ascii_digit() || c == '_' {
            i += 1;
        } else {
            break;
        }
    }
    if i == at {
        return at;
    }

    // 小數與指數
    let mut j = i;
    if line[j..].starts_with('.') {
        let frac_start = j + 1;
        let mut k = frac_start;
        for c in line[frac_start..].chars() {
            if c.is_ascii_digit() || c == '_' {
                k += 1;
            } else {
                break;
            }
        }
        if k > frac_start {
            j = k;
        }
    }
    if let Some(c) = line[j..].chars().next() {
        if c == 'e' || c == 'E' {
            let mut k = j + 1;
            if let Some(s) = line[k..].chars().next() {
                if s == '+' || s == '-' {
                    k += 1;
                }
            }
            let exp_start = k;
            for c in line[exp_start..].chars() {
                if c.is_ascii_digit() || c == '_' {
                    k += 1;
                } else {
                    break;
                }
            }
            if k > exp_start {
                j = k;
            }
        }
    }

    // 大小接 based literal：4'b1010
    if line[j..].starts_with('\'') {
        let tail = scan_based_tail(line, j);
        if tail > j {
            return tail;
        }
    }
    j
}

/// 從撇號位置掃描 'b1010／'sd42／'x 之類的尾端
fn scan_based_tail(line: &str, at: usize) -> usize {
    let mut chars = line[at + 1..].chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return at,
    };

    let digits_from = if is_base_char(first) {
        at + 2
    } else if (first == 's' || first == 'S') && chars.next().map(is_base_char).unwrap_or(false) {
        at + 3
    } else if matches!(first, '0' | '1' | 'x' | 'X' | 'z' | 'Z') {
        // 單一位元常量；後面不可緊接識別字字元
        let end = at + 1 + first.len_utf8();
        let next_is_ident = line[end..]
            .chars()
            .next()
            .map(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
            .unwrap_or(false);
        return if next_is_ident { at } else { end };
    } else {
        return at;
    };

    let mut end = digits_from;
    for c in line[digits_from..].chars() {
        if is_base_digit(c) {
            end += 1;
        } else {
            break;
        }
    }
    if end > digits_from {
        end
    } else {
        at
    }
}

/// 比對多字元運算子，長的優先
fn match_operator(rest: &str) -> Option<usize> {
    const OPS: &[&str] = &[
        "<<<=", ">>>=", "===", "!==", "==?", "!=?", "<<<", ">>>", "<<=", ">>=", "|->", "|=>",
        "->>", "==", "!=", "<=", ">=", "&&", "||", "**", "<<", ">>", "+=", "-=", "*=", "/=",
        "%=", "&=", "|=", "^=", "++", "--", "->", "::", "~&", "~|", "~^", "^~", ".*",
    ];
    for op in OPS {
        if rest.starts_with(op) {
            return Some(op.len());
        }
    }
    let c = rest.chars().next()?;
    if matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '<' | '>' | '!' | '&' | '|' | '^' | '~' | '?' | '=' | ':'
    ) {
        Some(1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(lexer: &Lexer, state: &mut LexState, lines: &[&str]) -> Vec<Vec<Token>> {
        lines.iter().map(|l| lexer.lex_line(l, state)).collect()
    }

    fn scopes(line: &str, tokens: &[Token]) -> Vec<(String, Scope, bool)> {
        tokens
            .iter()
            .map(|t| (t.text(line).to_string(), t.scope, t.disabled))
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        let lexer = Lexer::new(Dialect::SystemVerilog);
        let mut state = LexState::new();
        let line = "assign out = in1 & in2; // and gate";
        let toks = scopes(line, &lexer.lex_line(line, &mut state));
        assert_eq!(toks[0], ("assign".to_string(), Scope::Keyword, false));
        assert_eq!(toks[1], ("out".to_string(), Scope::Identifier, false));
        assert_eq!(toks[2], ("=".to_string(), Scope::Operator, false));
        assert_eq!(
            toks.last().unwrap(),
            &("// and gate".to_string(), Scope::Comment, false)
        );
    }

    #[test]
    fn test_numbers() {
        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::new();
        for (input, expect) in [
            ("4'b1010", "4'b1010"),
            ("8'hFF", "8'hFF"),
            ("'d42", "'d42"),
            ("16'sd255", "16'sd255"),
            ("3.14", "3.14"),
            ("1_000", "1_000"),
            ("1e9", "1e9"),
            ("'x", "'x"),
        ] {
            let tokens = lexer.lex_line(input, &mut state);
            assert_eq!(tokens[0].scope, Scope::Number, "input: {input}");
            assert_eq!(tokens[0].text(input), expect, "input: {input}");
        }
    }

    #[test]
    fn test_system_task() {
        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::new();
        let line = "$display(\"%d\", x);";
        let tokens = lexer.lex_line(line, &mut state);
        assert_eq!(tokens[0].scope, Scope::SystemTask);
        assert_eq!(tokens[0].text(line), "$display");
        assert_eq!(tokens[2].scope, Scope::String);
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::new();
        let out = lex_all(&lexer, &mut state, &["/* start", "middle", "end */ wire w;"]);
        assert_eq!(out[0][0].scope, Scope::Comment);
        assert_eq!(out[1][0].scope, Scope::Comment);
        assert_eq!(out[2][0].scope, Scope::Comment);
        // 註解結束後回到正常分類
        assert_eq!(out[2][1].scope, Scope::Keyword);
        assert!(!state.in_block_comment());
    }

    #[test]
    fn test_directive_inside_comment_is_inert() {
        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::new();
        lexer.lex_line("// `ifdef NEVER", &mut state);
        lexer.lex_line("/* `ifdef NEVER */", &mut state);
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_directive_inside_string_is_inert() {
        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::new();
        let line = "msg = \"`ifdef NEVER\";";
        let tokens = lexer.lex_line(line, &mut state);
        assert_eq!(state.depth(), 0);
        assert!(tokens.iter().any(|t| t.scope == Scope::String));
    }

    #[test]
    fn test_ifdef_else_endif_split() {
        // `ifdef A / code1 / `else / code2 / `endif，根層 active：
        // code1 為 Active，code2 為 Disabled
        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::new();
        let out = lex_all(
            &lexer,
            &mut state,
            &["`ifdef A", "code1", "`else", "code2", "`endif"],
        );
        assert!(!out[1][0].disabled, "code1 should be active");
        assert!(out[3][0].disabled, "code2 should be disabled");
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_block_without_else_is_uniform() {
        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::new();
        let out = lex_all(
            &lexer,
            &mut state,
            &["`ifdef A", "wire a;", "reg b;", "`endif"],
        );
        let flags: Vec<bool> = out[1]
            .iter()
            .chain(out[2].iter())
            .map(|t| t.disabled)
            .collect();
        assert!(flags.iter().all(|&d| !d));
    }

    #[test]
    fn test_nested_inside_disabled_is_disabled() {
        // 外層 disabled（求值模式、巨集未定義）時，
        // 內層區域不管自己的條件為何都 disabled
        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::with_defines(DefineTable::new());
        let out = lex_all(
            &lexer,
            &mut state,
            &["`ifdef A", "`ifdef B", "code3", "`endif", "`endif"],
        );
        assert!(out[2][0].disabled, "code3 should inherit disabled");
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_directive_token_never_disabled() {
        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::with_defines(DefineTable::new());
        let out = lex_all(&lexer, &mut state, &["`ifdef A", "code", "`endif"]);
        for line_tokens in &out {
            for t in line_tokens {
                if t.scope == Scope::Directive {
                    assert!(!t.disabled);
                }
            }
        }
        // 而被排除的程式碼有標記
        assert!(out[1][0].disabled);
    }

    #[test]
    fn test_elsif_degraded_behavior() {
        // 已知限制：`elsif 不延續條件鏈；其後的 token 沿用目前分類。
        // 這裡明確斷言降級行為
        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::with_defines(DefineTable::with_names(["A"]));
        let out = lex_all(
            &lexer,
            &mut state,
            &["`ifdef A", "code1", "`elsif B", "code2", "`endif"],
        );
        assert!(!out[1][0].disabled);
        // code2 沒有因 elsif 改變分類，仍然 active
        assert!(!out[3][0].disabled);
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_define_line_is_flat_directive_span() {
        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::new();
        let line = "`define WIDTH (8 + 2)";
        let tokens = lexer.lex_line(line, &mut state);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].scope, Scope::Directive);
        assert_eq!(tokens[0].text(line), line);
    }

    #[test]
    fn test_define_registers_macro_in_evaluated_mode() {
        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::with_defines(DefineTable::new());
        let out = lex_all(
            &lexer,
            &mut state,
            &["`define FEATURE", "`ifdef FEATURE", "code", "`endif"],
        );
        assert!(!out[2][0].disabled);
        assert!(state.defines().unwrap().contains("FEATURE"));
    }

    #[test]
    fn test_escaped_identifier() {
        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::new();
        let line = "\\bus+index wire";
        let tokens = lexer.lex_line(line, &mut state);
        assert_eq!(tokens[0].scope, Scope::Identifier);
        assert_eq!(tokens[0].text(line), "\\bus+index");
    }

    #[test]
    fn test_unterminated_string_stops_at_eol() {
        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::new();
        let line = "msg = \"oops";
        let tokens = lexer.lex_line(line, &mut state);
        assert_eq!(tokens.last().unwrap().scope, Scope::String);
        // 下一行不受影響
        let next = lexer.lex_line("wire w;", &mut state);
        assert_eq!(next[0].scope, Scope::Keyword);
    }

    #[test]
    fn test_operators() {
        let lexer = Lexer::new(Dialect::SystemVerilog);
        let mut state = LexState::new();
        let line = "a <= b === c >>> 2;";
        let toks = scopes(line, &lexer.lex_line(line, &mut state));
        assert!(toks.contains(&("<=".to_string(), Scope::Operator, false)));
        assert!(toks.contains(&("===".to_string(), Scope::Operator, false)));
        assert!(toks.contains(&(">>>".to_string(), Scope::Operator, false)));
    }
}
