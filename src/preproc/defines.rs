// 巨集表
//
// 只記名稱，不展開本體（`define 本體不做細部著色，見已知限制）

use std::collections::HashSet;

/// 已定義巨集名稱的集合
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DefineTable {
    names: HashSet<String>,
}

impl DefineTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以預定義名稱建表（對應 CLI 的 -D）
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn define(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    pub fn undef(&mut self, name: &str) {
        self.names.remove(name);
    }

    /// `resetall
    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
