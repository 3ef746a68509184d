// 編譯指令解析
//
// 把反引號後的指令字與該行剩餘文字解析成 Directive

/// 一條已解析的編譯指令
///
/// ⚠️ 已知限制：`elsif 雖然會被解析出來，但區域追蹤器不處理它，
/// 之後的 token 沿用目前區域的分類（不視為條件鏈的延續）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `define NAME ...（本體整行視為一個指令 span，不再細分）
    Define(String),
    /// `undef NAME
    Undef(String),
    /// `resetall
    Resetall,
    /// `ifdef NAME
    Ifdef(String),
    /// `ifndef NAME
    Ifndef(String),
    /// `elsif NAME（不支援，見上）
    Elsif(String),
    /// `else
    Else,
    /// `endif
    Endif,
    /// `include "file"
    Include(String),
    /// 其他指令（`timescale、`default_nettype、巨集使用等），不影響區域狀態
    Other(String),
}

/// 解析巨集名稱：[A-Za-z_][A-Za-z0-9_$]*，允許前導空白
fn macro_name(rest: &str) -> Option<String> {
    let rest = rest.trim_start_matches([' ', '\t']);
    let mut chars = rest.char_indices();
    let (_, first) = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let mut end = first.len_utf8();
    for (i, c) in chars {
        if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    Some(rest[..end].to_string())
}

/// 從剩餘文字取出 "file" 形式的包含目標
fn include_path(rest: &str) -> Option<String> {
    let rest = rest.trim_start_matches([' ', '\t']);
    let rest = rest.strip_prefix('"')?;
    let end = rest.find('"')?;
    if end == 0 {
        return None;
    }
    Some(rest[..end].to_string())
}

/// 解析一條指令
///
/// `word` 是反引號後的指令字，`rest` 是同一行指令字之後的文字。
/// 缺少必要參數時降級為 Other（不影響區域狀態，不報錯）
pub fn parse_directive(word: &str, rest: &str) -> Directive {
    match word {
        "define" => match macro_name(rest) {
            Some(name) => Directive::Define(name),
            None => Directive::Other(word.to_string()),
        },
        "undef" => match macro_name(rest) {
            Some(name) => Directive::Undef(name),
            None => Directive::Other(word.to_string()),
        },
        "resetall" => Directive::Resetall,
        "ifdef" => match macro_name(rest) {
            Some(name) => Directive::Ifdef(name),
            None => Directive::Other(word.to_string()),
        },
        "ifndef" => match macro_name(rest) {
            Some(name) => Directive::Ifndef(name),
            None => Directive::Other(word.to_string()),
        },
        "elsif" => Directive::Elsif(macro_name(rest).unwrap_or_default()),
        "else" => Directive::Else,
        "endif" => Directive::Endif,
        "include" => match include_path(rest) {
            Some(path) => Directive::Include(path),
            None => Directive::Other(word.to_string()),
        },
        _ => Directive::Other(word.to_string()),
    }
}
