// 語法高亮主模組

mod cache;
mod engine;
mod theme;

// 導出公開 API
pub use cache::{CachedLine, EditType, HighlightCache};
pub use engine::{supports_true_color, HighlightEngine, LineHighlighter};
pub use theme::{Rgb, Theme};

/// 語法高亮設定
#[derive(Clone, Debug)]
pub struct HighlightConfig {
    /// 是否啟用語法高亮
    pub enabled: bool,
    /// 主題名稱
    pub theme: String,
    /// 是否使用真彩色
    pub true_color: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            theme: "eighties".to_string(),
            true_color: supports_true_color(),
        }
    }
}
