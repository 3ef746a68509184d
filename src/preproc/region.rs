// 條件編譯區域追蹤
//
// 把宣告式的 grammar 規則改寫成顯式的有限狀態機：
// `ifdef/`ifndef 推入區域，`else 翻轉，`endif 彈出。
// 狀態 = 巢狀深度 + 各層 active 旗標

use crate::preproc::defines::DefineTable;
use crate::preproc::directive::Directive;

/// 一個由條件編譯指令界定的區域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// 推入時外層是否 active（巢狀在 disabled 祖先之下的區域永遠 disabled）
    pub parent_active: bool,
    /// 此區域的 token 是否視為會被編譯
    pub active: bool,
}

/// 區域堆疊
///
/// 每次檔案掃描建立一份，掃描結束即丟棄；不跨檔案、不跨 session。
/// 堆疊永不 underflow：多出來的 `endif/`else 會被忽略並記一條警告
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegionStack {
    regions: Vec<Region>,
}

impl RegionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// 目前位置是否 active（空堆疊 = 檔案根層，永遠 active）
    pub fn is_active(&self) -> bool {
        self.regions.last().map(|r| r.active).unwrap_or(true)
    }

    /// 巢狀深度
    pub fn depth(&self) -> usize {
        self.regions.len()
    }

    /// 推入新區域；cond 為此區域自身條件的結果
    pub fn push(&mut self, cond: bool) {
        let parent_active = self.is_active();
        self.regions.push(Region {
            parent_active,
            active: parent_active && cond,
        });
    }

    /// `else：翻轉頂端區域，除非外層已 disabled（此時兩側都維持 disabled）
    pub fn flip_else(&mut self) {
        match self.regions.last_mut() {
            Some(top) => top.active = top.parent_active && !top.active,
            None => log::warn!("`else without matching `ifdef/`ifndef, ignored"),
        }
    }

    /// `endif：彈出頂端區域
    pub fn pop(&mut self) {
        if self.regions.pop().is_none() {
            log::warn!("`endif without matching `ifdef/`ifndef, ignored");
        }
    }
}

/// 指令驅動的條件編譯追蹤器
///
/// 兩種模式：
/// - 結構模式（預設）：不查巨集表，條件一律視為成立；
///   「disabled」只反映巢狀在 disabled 祖先或 `else 另一側之下
/// - 求值模式：以 DefineTable 求 `ifdef/`ifndef 的真值，
///   並在掃描過程中處理 `define/`undef/`resetall
///
/// ⚠️ `elsif 在兩種模式下都不改變狀態（已知限制）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalTracker {
    stack: RegionStack,
    defines: Option<DefineTable>,
}

impl ConditionalTracker {
    /// 結構模式
    pub fn structural() -> Self {
        Self {
            stack: RegionStack::new(),
            defines: None,
        }
    }

    /// 求值模式，table 可預先種入 -D 名稱
    pub fn evaluated(table: DefineTable) -> Self {
        Self {
            stack: RegionStack::new(),
            defines: Some(table),
        }
    }

    pub fn is_active(&self) -> bool {
        self.stack.is_active()
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn defines(&self) -> Option<&DefineTable> {
        self.defines.as_ref()
    }

    pub fn defines_mut(&mut self) -> Option<&mut DefineTable> {
        self.defines.as_mut()
    }

    pub fn into_defines(self) -> Option<DefineTable> {
        self.defines
    }

    /// 套用一條指令
    pub fn apply(&mut self, directive: &Directive) {
        match directive {
            Directive::Ifdef(name) => {
                let cond = self
                    .defines
                    .as_ref()
                    .map(|t| t.contains(name))
                    .unwrap_or(true);
                self.stack.push(cond);
            }
            Directive::Ifndef(name) => {
                let cond = self
                    .defines
                    .as_ref()
                    .map(|t| !t.contains(name))
                    .unwrap_or(true);
                self.stack.push(cond);
            }
            Directive::Else => self.stack.flip_else(),
            Directive::Endif => self.stack.pop(),
            // 求值模式下，disabled 區域內的 define/undef 不改巨集表
            Directive::Define(name) => {
                if self.stack.is_active() {
                    if let Some(table) = self.defines.as_mut() {
                        table.define(name);
                    }
                }
            }
            Directive::Undef(name) => {
                if self.stack.is_active() {
                    if let Some(table) = self.defines.as_mut() {
                        table.undef(name);
                    }
                }
            }
            Directive::Resetall => {
                if self.stack.is_active() {
                    if let Some(table) = self.defines.as_mut() {
                        table.clear();
                    }
                }
            }
            // elsif 不支援：狀態不變，後續 token 沿用目前分類
            Directive::Elsif(_) => {}
            Directive::Include(_) | Directive::Other(_) => {}
        }
    }
}

impl Default for ConditionalTracker {
    fn default() -> Self {
        Self::structural()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_all(tracker: &mut ConditionalTracker, directives: &[Directive]) {
        for d in directives {
            tracker.apply(d);
        }
    }

    #[test]
    fn test_structural_ifdef_stays_active() {
        // 結構模式不求值：區域跟隨外層的 active 狀態
        let mut t = ConditionalTracker::structural();
        t.apply(&Directive::Ifdef("ANY".to_string()));
        assert!(t.is_active());
        assert_eq!(t.depth(), 1);
        t.apply(&Directive::Endif);
        assert_eq!(t.depth(), 0);
        assert!(t.is_active());
    }

    #[test]
    fn test_else_flips_under_active_parent() {
        let mut t = ConditionalTracker::structural();
        t.apply(&Directive::Ifdef("A".to_string()));
        assert!(t.is_active());
        t.apply(&Directive::Else);
        assert!(!t.is_active());
        t.apply(&Directive::Endif);
        assert!(t.is_active());
    }

    #[test]
    fn test_nested_under_disabled_ancestor_stays_disabled() {
        // 巢狀具遞移性：disabled 祖先之下的區域永遠 disabled，
        // 連它自己的 else 也翻不回來
        let mut t = ConditionalTracker::structural();
        apply_all(
            &mut t,
            &[
                Directive::Ifdef("A".to_string()),
                Directive::Else, // 進入 disabled 側
            ],
        );
        assert!(!t.is_active());
        t.apply(&Directive::Ifdef("B".to_string()));
        assert!(!t.is_active());
        t.apply(&Directive::Else);
        assert!(!t.is_active());
        t.apply(&Directive::Endif);
        assert!(!t.is_active());
        t.apply(&Directive::Endif);
        assert!(t.is_active());
    }

    #[test]
    fn test_balanced_file_returns_to_depth_zero() {
        let mut t = ConditionalTracker::structural();
        apply_all(
            &mut t,
            &[
                Directive::Ifdef("A".to_string()),
                Directive::Ifndef("B".to_string()),
                Directive::Endif,
                Directive::Ifdef("C".to_string()),
                Directive::Else,
                Directive::Endif,
                Directive::Endif,
            ],
        );
        assert_eq!(t.depth(), 0);
        assert!(t.is_active());
    }

    #[test]
    fn test_mismatched_endif_is_ignored() {
        // 開放問題的決定：多餘的 `endif 忽略、不 panic
        let mut t = ConditionalTracker::structural();
        t.apply(&Directive::Endif);
        t.apply(&Directive::Endif);
        assert_eq!(t.depth(), 0);
        assert!(t.is_active());
        t.apply(&Directive::Else);
        assert!(t.is_active());
    }

    #[test]
    fn test_evaluated_ifdef() {
        let mut table = DefineTable::new();
        table.define("SYNTHESIS");
        let mut t = ConditionalTracker::evaluated(table);

        t.apply(&Directive::Ifdef("SYNTHESIS".to_string()));
        assert!(t.is_active());
        t.apply(&Directive::Endif);

        t.apply(&Directive::Ifdef("SIMULATION".to_string()));
        assert!(!t.is_active());
        t.apply(&Directive::Else);
        assert!(t.is_active());
        t.apply(&Directive::Endif);
    }

    #[test]
    fn test_evaluated_ifndef() {
        let mut t = ConditionalTracker::evaluated(DefineTable::new());
        t.apply(&Directive::Ifndef("UNDEFINED".to_string()));
        assert!(t.is_active());
        t.apply(&Directive::Endif);
    }

    #[test]
    fn test_evaluated_define_in_disabled_region_is_inert() {
        let mut t = ConditionalTracker::evaluated(DefineTable::new());
        t.apply(&Directive::Ifdef("NOPE".to_string()));
        assert!(!t.is_active());
        t.apply(&Directive::Define("GHOST".to_string()));
        t.apply(&Directive::Endif);
        assert!(!t.defines().unwrap().contains("GHOST"));
    }

    #[test]
    fn test_evaluated_undef_and_resetall() {
        let mut table = DefineTable::new();
        table.define("A");
        table.define("B");
        let mut t = ConditionalTracker::evaluated(table);

        t.apply(&Directive::Undef("A".to_string()));
        assert!(!t.defines().unwrap().contains("A"));
        assert!(t.defines().unwrap().contains("B"));

        t.apply(&Directive::Resetall);
        assert!(!t.defines().unwrap().contains("B"));
    }

    #[test]
    fn test_elsif_does_not_change_state() {
        // 已知限制：`elsif 不被視為條件鏈的延續。
        // 這裡斷言目前的降級行為，而不是假設正確的鏈結語意
        let mut t = ConditionalTracker::structural();
        t.apply(&Directive::Ifdef("A".to_string()));
        let before_depth = t.depth();
        let before_active = t.is_active();
        t.apply(&Directive::Elsif("B".to_string()));
        assert_eq!(t.depth(), before_depth);
        assert_eq!(t.is_active(), before_active);
        t.apply(&Directive::Endif);
        assert_eq!(t.depth(), 0);
    }
}
