// 配色主題
//
// Scope → 前景色的對應表。disabled 區域一律用 disabled 色
// （視覺上同註解的灰色，對應「會被排除的程式碼」）。
// 實際畫面顏色屬於主題，不屬於分類邏輯

use crate::token::Scope;

/// 24-bit 前景色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// 一套配色
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub directive: Rgb,
    pub keyword: Rgb,
    pub system_task: Rgb,
    pub identifier: Rgb,
    pub number: Rgb,
    pub string: Rgb,
    pub comment: Rgb,
    pub operator: Rgb,
    pub punctuation: Rgb,
    pub default: Rgb,
    /// 被條件編譯排除的 token 用這個顏色（不分原本的類別）
    pub disabled: Rgb,
}

/// base16-eighties 風格（預設）
const EIGHTIES: Theme = Theme {
    name: "eighties",
    directive: Rgb::new(0xf2, 0x77, 0x7a),
    keyword: Rgb::new(0xcc, 0x99, 0xcc),
    system_task: Rgb::new(0x66, 0xcc, 0xcc),
    identifier: Rgb::new(0xd3, 0xd0, 0xc8),
    number: Rgb::new(0xf9, 0x91, 0x57),
    string: Rgb::new(0x99, 0xcc, 0x99),
    comment: Rgb::new(0x74, 0x73, 0x69),
    operator: Rgb::new(0xd3, 0xd0, 0xc8),
    punctuation: Rgb::new(0xd3, 0xd0, 0xc8),
    default: Rgb::new(0xd3, 0xd0, 0xc8),
    disabled: Rgb::new(0x74, 0x73, 0x69),
};

/// base16-ocean 風格
const OCEAN: Theme = Theme {
    name: "ocean",
    directive: Rgb::new(0xbf, 0x61, 0x6a),
    keyword: Rgb::new(0xb4, 0x8e, 0xad),
    system_task: Rgb::new(0x96, 0xb5, 0xb4),
    identifier: Rgb::new(0xc0, 0xc5, 0xce),
    number: Rgb::new(0xd0, 0x87, 0x70),
    string: Rgb::new(0xa3, 0xbe, 0x8c),
    comment: Rgb::new(0x65, 0x73, 0x7e),
    operator: Rgb::new(0xc0, 0xc5, 0xce),
    punctuation: Rgb::new(0xc0, 0xc5, 0xce),
    default: Rgb::new(0xc0, 0xc5, 0xce),
    disabled: Rgb::new(0x65, 0x73, 0x7e),
};

const BUILTIN: &[&Theme] = &[&EIGHTIES, &OCEAN];

impl Theme {
    /// 依名稱找內建主題
    pub fn by_name(name: &str) -> Option<Theme> {
        BUILTIN.iter().find(|t| t.name == name).map(|t| (*t).clone())
    }

    /// 內建主題清單
    pub fn available() -> Vec<&'static str> {
        BUILTIN.iter().map(|t| t.name).collect()
    }

    /// 取得某個 token 的前景色
    pub fn color_for(&self, scope: Scope, disabled: bool) -> Rgb {
        if disabled {
            return self.disabled;
        }
        match scope {
            Scope::Directive => self.directive,
            Scope::Keyword => self.keyword,
            Scope::SystemTask => self.system_task,
            Scope::Identifier => self.identifier,
            Scope::Number => self.number,
            Scope::String => self.string,
            Scope::Comment => self.comment,
            Scope::Operator => self.operator,
            Scope::Punctuation => self.punctuation,
            Scope::Default => self.default,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        EIGHTIES.clone()
    }
}
