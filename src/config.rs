// 配置管理

use std::path::PathBuf;

/// 一次執行的完整設定
#[derive(Debug, Clone)]
pub struct Config {
    /// 主題名稱
    pub theme: String,
    /// 是否使用真彩色（false 則降級 256 色）
    pub true_color: bool,
    /// 是否顯示行號
    pub line_numbers: bool,
    /// 是否啟用求值模式（追蹤巨集表、解析 `include）
    pub preprocess: bool,
    /// 預定義的巨集名稱（-D）
    pub defines: Vec<String>,
    /// `include 搜尋目錄（-I）
    pub incdirs: Vec<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            theme: "eighties".to_string(),
            true_color: crate::highlight::supports_true_color(),
            line_numbers: false,
            preprocess: false,
            defines: Vec::new(),
            incdirs: Vec::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
