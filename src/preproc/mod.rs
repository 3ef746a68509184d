// 條件編譯前處理
//
// 指令解析、區域堆疊追蹤、巨集表與 `include 解析

pub mod defines;
pub mod directive;
pub mod include;
pub mod region;

pub use defines::DefineTable;
pub use directive::Directive;
pub use include::IncludeResolver;
pub use region::{ConditionalTracker, Region, RegionStack};
