// 機器可讀輸出（json-spans 功能）
//
// 把分類後的 span 序列化成 JSON，給自行渲染的 host 整合用

use anyhow::Result;
use serde::Serialize;

use crate::highlight::HighlightEngine;
use crate::token::Scope;

/// 一個已分類的 span（行號從 1 起算，start/end 為行內 byte 偏移）
#[derive(Debug, Serialize)]
pub struct SpanRecord {
    pub line: usize,
    pub start: usize,
    pub end: usize,
    pub scope: Scope,
    pub disabled: bool,
    pub text: String,
}

/// 掃描整份內容，收集所有 span
pub fn collect(engine: &HighlightEngine, content: &str) -> Vec<SpanRecord> {
    let mut highlighter = engine.create_highlighter();
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        for tok in highlighter.tokenize_line(line) {
            records.push(SpanRecord {
                line: idx + 1,
                start: tok.start,
                end: tok.end,
                scope: tok.scope,
                disabled: tok.disabled,
                text: tok.text(line).to_string(),
            });
        }
    }
    records
}

pub fn to_json(records: &[SpanRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
