// 方言檢測
//
// 依副檔名決定關鍵字表：.v/.vh 為 Verilog，.sv/.svh 為 SystemVerilog

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Verilog,
    SystemVerilog,
}

impl Dialect {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase());

        match extension.as_deref() {
            Some("v") | Some("vh") => Dialect::Verilog,
            Some("sv") | Some("svh") => Dialect::SystemVerilog,
            // 未知副檔名：SystemVerilog 是超集，誤判代價最小
            _ => Dialect::SystemVerilog,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Verilog => "Verilog",
            Dialect::SystemVerilog => "SystemVerilog",
        }
    }
}
