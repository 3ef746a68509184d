//! hdlight - 輕量級 Verilog/SystemVerilog 終端語法高亮工具
//!
//! 逐行分類 token 並追蹤條件編譯區域：
//! 被 `ifdef/`ifndef/`else/`endif 排除的程式碼以 disabled 色輸出

// 導出公開模組
pub mod config;
pub mod dialect;
pub mod highlight;
pub mod keywords;
pub mod lexer;
pub mod preproc;
pub mod token;
pub mod utils;

// 機器可讀輸出（可選功能）
#[cfg(feature = "json-spans")]
pub mod spans;

// 重新導出常用類型
pub use dialect::Dialect;
pub use highlight::{HighlightEngine, LineHighlighter};
pub use lexer::{LexState, Lexer};
pub use token::{Scope, Token};
