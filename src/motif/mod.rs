//! motif 展开：IUPAC 简并码展开、替换变体生成、正反向去重后的搜索集合。

pub mod iupac;
pub mod variants;
pub mod pattern_set;

pub use pattern_set::{
    hamming, pattern_budget, Orientation, PatternEntry, PatternSet, PatternSetMeta, MAX_EDIT_DISTANCE,
    MAX_PATTERN_ENTRIES,
};
