// 關鍵字表
//
// Verilog-2001 與 SystemVerilog 的保留字集合，
// SystemVerilog 為 Verilog 的超集（依方言選表）

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::dialect::Dialect;

/// Verilog-2001（IEEE 1364-2001）保留字
static VERILOG_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "always",
        "and",
        "assign",
        "automatic",
        "begin",
        "buf",
        "bufif0",
        "bufif1",
        "case",
        "casex",
        "casez",
        "cell",
        "cmos",
        "config",
        "deassign",
        "default",
        "defparam",
        "design",
        "disable",
        "edge",
        "else",
        "end",
        "endcase",
        "endconfig",
        "endfunction",
        "endgenerate",
        "endmodule",
        "endprimitive",
        "endspecify",
        "endtable",
        "endtask",
        "event",
        "for",
        "force",
        "forever",
        "fork",
        "function",
        "generate",
        "genvar",
        "highz0",
        "highz1",
        "if",
        "ifnone",
        "incdir",
        "initial",
        "inout",
        "input",
        "instance",
        "integer",
        "join",
        "large",
        "liblist",
        "library",
        "localparam",
        "macromodule",
        "medium",
        "module",
        "nand",
        "negedge",
        "nmos",
        "nor",
        "noshowcancelled",
        "not",
        "notif0",
        "notif1",
        "or",
        "output",
        "parameter",
        "pmos",
        "posedge",
        "primitive",
        "pull0",
        "pull1",
        "pulldown",
        "pullup",
        "pulsestyle_ondetect",
        "pulsestyle_onevent",
        "rcmos",
        "real",
        "realtime",
        "reg",
        "release",
        "repeat",
        "rnmos",
        "rpmos",
        "rtran",
        "rtranif0",
        "rtranif1",
        "scalared",
        "showcancelled",
        "signed",
        "small",
        "specify",
        "specparam",
        "strong0",
        "strong1",
        "supply0",
        "supply1",
        "table",
        "task",
        "time",
        "tran",
        "tranif0",
        "tranif1",
        "tri",
        "tri0",
        "tri1",
        "triand",
        "trior",
        "trireg",
        "unsigned",
        "use",
        "uwire",
        "vectored",
        "wait",
        "wand",
        "weak0",
        "weak1",
        "while",
        "wire",
        "wor",
        "xnor",
        "xor",
    ]
    .into_iter()
    .collect()
});

/// SystemVerilog（IEEE 1800）新增的保留字
static SV_EXTRA_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "accept_on",
        "alias",
        "always_comb",
        "always_ff",
        "always_latch",
        "assert",
        "assume",
        "before",
        "bind",
        "bins",
        "binsof",
        "bit",
        "break",
        "byte",
        "chandle",
        "checker",
        "class",
        "clocking",
        "const",
        "constraint",
        "context",
        "continue",
        "cover",
        "covergroup",
        "coverpoint",
        "cross",
        "dist",
        "do",
        "endchecker",
        "endclass",
        "endclocking",
        "endgroup",
        "endinterface",
        "endpackage",
        "endprogram",
        "endproperty",
        "endsequence",
        "enum",
        "expect",
        "export",
        "extends",
        "extern",
        "final",
        "first_match",
        "foreach",
        "forkjoin",
        "global",
        "iff",
        "ignore_bins",
        "illegal_bins",
        "implements",
        "implies",
        "import",
        "inside",
        "int",
        "interconnect",
        "interface",
        "intersect",
        "join_any",
        "join_none",
        "let",
        "local",
        "logic",
        "longint",
        "matches",
        "modport",
        "nettype",
        "new",
        "nexttime",
        "null",
        "package",
        "packed",
        "priority",
        "program",
        "property",
        "protected",
        "pure",
        "rand",
        "randc",
        "randcase",
        "randsequence",
        "ref",
        "reject_on",
        "restrict",
        "return",
        "s_always",
        "s_eventually",
        "s_nexttime",
        "s_until",
        "s_until_with",
        "sequence",
        "shortint",
        "shortreal",
        "soft",
        "solve",
        "static",
        "string",
        "struct",
        "super",
        "sync_accept_on",
        "sync_reject_on",
        "tagged",
        "this",
        "throughout",
        "timeprecision",
        "timeunit",
        "type",
        "typedef",
        "union",
        "unique",
        "unique0",
        "until",
        "until_with",
        "untyped",
        "var",
        "virtual",
        "void",
        "wait_order",
        "weak",
        "wildcard",
        "with",
        "within",
    ]
    .into_iter()
    .collect()
});

/// 依方言判斷是否為保留字
pub fn is_keyword(word: &str, dialect: Dialect) -> bool {
    match dialect {
        Dialect::Verilog => VERILOG_KEYWORDS.contains(word),
        Dialect::SystemVerilog => {
            VERILOG_KEYWORDS.contains(word) || SV_EXTRA_KEYWORDS.contains(word)
        }
    }
}
