//! 語法高亮快取系統
//!
//! 除了高亮後的字串，每行還快取行尾的詞法狀態（LexState），
//! 作為增量重掃的安全還原點：修改第 n 行時，用第 n-1 行的
//! 行尾狀態續掃即可，不必回到檔案開頭。
//!
//! 快取失效策略：修改任何一行時，使該行及之後所有行失效
//! （區域堆疊與塊註解狀態都可能影響後續所有行）

use std::collections::HashMap;

use crate::lexer::LexState;

/// 單行的高亮快取項目
#[derive(Clone, Debug)]
pub struct CachedLine {
    /// 原始文字內容（用於驗證快取是否有效）
    pub text: String,
    /// 高亮後的 ANSI 字串
    pub highlighted: String,
    /// 掃完這一行之後的詞法狀態
    pub end_state: LexState,
}

/// 語法狀態快取（用於優化效能）
pub struct HighlightCache {
    /// 快取的行（行號 -> 快取項目）
    lines: HashMap<usize, CachedLine>,
    /// 快取大小限制
    max_size: usize,
}

impl HighlightCache {
    /// 建立新的快取（預設快取 1000 行）
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    /// 建立指定容量的快取
    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            lines: HashMap::with_capacity(max_size.min(1000)),
            max_size,
        }
    }

    /// 取得快取的行
    pub fn get(&self, line_idx: usize) -> Option<&CachedLine> {
        self.lines.get(&line_idx)
    }

    /// 檢查行是否已快取且內容相同
    pub fn is_valid(&self, line_idx: usize, text: &str) -> bool {
        self.lines
            .get(&line_idx)
            .map(|cached| cached.text == text)
            .unwrap_or(false)
    }

    /// 進入第 line_idx 行之前的詞法狀態（最近的安全還原點）
    ///
    /// 第 0 行沒有還原點（從檔案開頭的新狀態起算）；
    /// 其餘行需要第 line_idx-1 行仍在快取中
    pub fn state_before(&self, line_idx: usize) -> Option<LexState> {
        if line_idx == 0 {
            return None;
        }
        self.lines
            .get(&(line_idx - 1))
            .map(|cached| cached.end_state.clone())
    }

    /// 插入快取項目
    pub fn insert(&mut self, line_idx: usize, cached: CachedLine) {
        // 如果超過容量，清除舊的快取
        if self.lines.len() >= self.max_size {
            // 簡單策略：清除所有快取（更複雜的可以用 LRU）
            self.lines.clear();
        }

        self.lines.insert(line_idx, cached);
    }

    /// 使從指定行開始的所有行失效
    ///
    /// ⚠️ 後續行的詞法狀態都依賴前面的行，必須整段失效
    pub fn invalidate_from(&mut self, line_idx: usize) {
        self.lines.retain(|&idx, _| idx < line_idx);
    }

    /// 智慧失效：根據編輯操作類型決定失效範圍
    pub fn invalidate_from_edit(&mut self, line_idx: usize, edit_type: EditType) {
        match edit_type {
            EditType::CharInsert | EditType::CharDelete => {
                // 字元級編輯：使當前行及之後所有行失效
                // （可能開始/結束塊註解，或改動條件編譯指令）
                self.invalidate_from(line_idx);
            }
            EditType::LineInsert | EditType::LineDelete | EditType::MultiLineEdit => {
                // 行級編輯：清除所有快取（行號改變）
                self.clear();
            }
        }
    }

    /// 清除所有快取
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// 取得快取統計資訊
    #[allow(dead_code)]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cached_lines: self.lines.len(),
            capacity: self.max_size,
        }
    }

    /// 取得快取的行數
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// 快取是否為空
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for HighlightCache {
    fn default() -> Self {
        Self::new()
    }
}

/// 快取統計資訊
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    pub cached_lines: usize,
    pub capacity: usize,
}

/// 編輯操作類型（用於智慧快取失效）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditType {
    /// 插入單個字元
    CharInsert,
    /// 刪除單個字元
    CharDelete,
    /// 插入新行
    LineInsert,
    /// 刪除整行
    LineDelete,
    /// 多行編輯（複製/貼上等）
    MultiLineEdit,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cached(text: &str) -> CachedLine {
        CachedLine {
            text: text.to_string(),
            highlighted: String::new(),
            end_state: LexState::new(),
        }
    }

    #[test]
    fn test_cache_basic() {
        let mut cache = HighlightCache::new();
        cache.insert(0, cached("test"));
        assert!(cache.is_valid(0, "test"));
        assert!(!cache.is_valid(0, "different"));
    }

    #[test]
    fn test_cache_invalidation() {
        let mut cache = HighlightCache::new();
        cache.insert(0, cached("a"));
        cache.insert(1, cached("b"));
        cache.insert(2, cached("c"));
        assert_eq!(cache.len(), 3);

        // 使第 1 行及之後所有行失效
        cache.invalidate_from(1);

        assert_eq!(cache.len(), 1);
        assert!(cache.get(0).is_some());
        assert!(cache.get(1).is_none());
        assert!(cache.get(2).is_none());
    }

    #[test]
    fn test_smart_invalidation() {
        let mut cache = HighlightCache::new();
        for i in 0..10 {
            cache.insert(i, cached("x"));
        }

        // 字元編輯：使第 5 行及之後失效
        cache.invalidate_from_edit(5, EditType::CharInsert);
        assert_eq!(cache.len(), 5);
        assert!(cache.get(4).is_some());
        assert!(cache.get(5).is_none());

        // 插入行：清除所有快取
        cache.invalidate_from_edit(2, EditType::LineInsert);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_state_before() {
        use crate::dialect::Dialect;
        use crate::lexer::Lexer;

        let lexer = Lexer::new(Dialect::Verilog);
        let mut state = LexState::new();
        let mut cache = HighlightCache::new();

        let lines = ["`ifdef A", "wire w;"];
        for (idx, line) in lines.iter().enumerate() {
            lexer.lex_line(line, &mut state);
            cache.insert(
                idx,
                CachedLine {
                    text: line.to_string(),
                    highlighted: String::new(),
                    end_state: state.clone(),
                },
            );
        }

        // 第 0 行沒有還原點
        assert!(cache.state_before(0).is_none());
        // 第 2 行的還原點是第 1 行行尾的狀態（深度 1）
        let restored = cache.state_before(2).unwrap();
        assert_eq!(restored.depth(), 1);
        assert_eq!(restored, state);
    }
}
