//! 端粒扫描：贪心匹配 → 滑动窗口计数 / 组成统计 → 端粒块合并。
//!
//! 每条序列的扫描是 (序列, 搜索集合, 配置) 的纯函数，互不共享可变状态，
//! 因此多条序列可以直接交给 rayon 并行处理，结果按输入顺序拼接。

pub mod blocks;
pub mod composition;
pub mod matcher;
pub mod window;

use log::debug;
use rayon::prelude::*;
use std::borrow::Cow;

use crate::config::{ScanConfig, StatKind};
use crate::io::SeqRecord;
use crate::motif::{Orientation, PatternSet};

pub use blocks::{merge_blocks, TelomereBlock};
pub use composition::{composition_windows, gc_content, shannon_entropy, CompositionWindows};
pub use matcher::{find_matches, MatchRecord, PatternTable};
pub use window::{window_sums, WindowStat, WindowSums};

/// 单条序列的扫描结果
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub header: String,
    pub len: usize,
    pub matches: Vec<MatchRecord>,
    /// 窗口内匹配数（两个方向合计）
    pub counts: Option<WindowSums>,
    pub forward_counts: Option<WindowSums>,
    pub reverse_counts: Option<WindowSums>,
    pub composition: Option<CompositionWindows>,
    pub blocks: Vec<TelomereBlock>,
    /// 距离为 0 的匹配数；搜索集合未打分时为 None
    pub canonical_matches: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanSummary {
    pub header: String,
    pub len: usize,
    pub matches: usize,
    pub forward: usize,
    pub reverse: usize,
    /// 与规范 motif 完全一致的匹配数；未打分时为 None
    pub canonical: Option<usize>,
    /// (起点, 计数)
    pub max_window: Option<(usize, u64)>,
    pub mean_gc: Option<f64>,
    pub mean_entropy: Option<f64>,
    pub blocks: usize,
}

fn mean(values: &[WindowStat<f64>]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|w| w.value).sum::<f64>() / values.len() as f64)
}

impl ScanResult {
    pub fn summary(&self) -> ScanSummary {
        let forward = self
            .matches
            .iter()
            .filter(|m| m.orientation == Orientation::Forward)
            .count();
        ScanSummary {
            header: self.header.clone(),
            len: self.len,
            matches: self.matches.len(),
            forward,
            reverse: self.matches.len() - forward,
            canonical: self.canonical_matches,
            max_window: self.counts.as_ref().and_then(|c| c.max),
            mean_gc: self.composition.as_ref().and_then(|c| mean(&c.gc)),
            mean_entropy: self.composition.as_ref().and_then(|c| mean(&c.entropy)),
            blocks: self.blocks.len(),
        }
    }
}

fn orientation_vector(len: usize, matches: &[MatchRecord], orientation: Orientation) -> Vec<bool> {
    let mut v = vec![false; len];
    for m in matches.iter().filter(|m| m.orientation == orientation) {
        v[m.start] = true;
    }
    v
}

/// 扫描一条序列。小写（软屏蔽）碱基先转为大写，匹配与组成统计看到同一条序列。
pub fn scan_sequence(header: &str, seq: &[u8], table: &PatternTable<'_>, cfg: &ScanConfig) -> ScanResult {
    let seq: Cow<'_, [u8]> = if seq.iter().any(u8::is_ascii_lowercase) {
        Cow::Owned(seq.to_ascii_uppercase())
    } else {
        Cow::Borrowed(seq)
    };
    let seq = seq.as_ref();
    let (mv, matches) = find_matches(header, seq, table);

    let (counts, forward_counts, reverse_counts) = if cfg.stats.contains(StatKind::Count) {
        let fwd = orientation_vector(seq.len(), &matches, Orientation::Forward);
        let rev = orientation_vector(seq.len(), &matches, Orientation::ReverseComplement);
        (
            Some(window_sums(&mv, cfg.window, cfg.step)),
            Some(window_sums(&fwd, cfg.window, cfg.step)),
            Some(window_sums(&rev, cfg.window, cfg.step)),
        )
    } else {
        (None, None, None)
    };

    let composition = if cfg.stats.contains(StatKind::Entropy) || cfg.stats.contains(StatKind::Gc) {
        Some(composition_windows(seq, cfg.window, cfg.step))
    } else {
        None
    };

    let blocks = merge_blocks(&matches, cfg.block_max_gap, cfg.block_min_matches);
    let canonical_matches = table
        .set()
        .canonical()
        .map(|_| matches.iter().filter(|m| m.is_canonical()).count());

    debug!(
        "{}: {} bp, {} matches, {} blocks",
        header,
        seq.len(),
        matches.len(),
        blocks.len()
    );

    ScanResult {
        header: header.to_string(),
        len: seq.len(),
        matches,
        counts,
        forward_counts,
        reverse_counts,
        composition,
        blocks,
        canonical_matches,
    }
}

/// 并行扫描多条序列，输出顺序与输入一致。
/// 在调用方的 rayon 线程池内运行（见 `ThreadPool::install`）。
pub fn scan_records(records: &[SeqRecord], set: &PatternSet, cfg: &ScanConfig) -> Vec<ScanResult> {
    let table = PatternTable::new(set);
    records
        .par_iter()
        .map(|r| scan_sequence(&r.header, &r.seq, &table, cfg))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatSet;

    fn cfg(window: usize, step: usize) -> ScanConfig {
        ScanConfig { window, step, block_max_gap: 0, block_min_matches: 2, ..ScanConfig::default() }
    }

    #[test]
    fn scan_sequence_collects_everything() {
        let c = cfg(6, 6);
        let set = c.build_pattern_set().unwrap();
        let table = PatternTable::new(&set);
        let res = scan_sequence("chr1", b"TTAGGGTTAGGGAAAACCCTAA", &table, &c);

        assert_eq!(res.len, 22);
        let starts: Vec<usize> = res.matches.iter().map(|m| m.start).collect();
        assert_eq!(starts, vec![0, 6, 16]);

        let counts: Vec<u64> = res.counts.as_ref().unwrap().values.iter().map(|w| w.value).collect();
        assert_eq!(counts, vec![1, 1, 1]);
        let rev: Vec<u64> = res.reverse_counts.as_ref().unwrap().values.iter().map(|w| w.value).collect();
        assert_eq!(rev, vec![0, 0, 1]);

        let comp = res.composition.as_ref().unwrap();
        assert_eq!(comp.gc.len(), 3);
        assert!((comp.gc[0].value - 0.5).abs() < 1e-12);

        assert_eq!(res.blocks.len(), 1);
        assert_eq!((res.blocks[0].start, res.blocks[0].end), (0, 12));

        let s = res.summary();
        assert_eq!((s.matches, s.forward, s.reverse), (3, 2, 1));
        assert_eq!(s.canonical, None);
        assert_eq!(s.max_window, Some((0, 1)));
        assert_eq!(s.blocks, 1);
    }

    #[test]
    fn soft_masked_sequence_matches_like_upper_case() {
        let c = cfg(6, 6);
        let set = c.build_pattern_set().unwrap();
        let table = PatternTable::new(&set);
        let upper = scan_sequence("chr1", b"TTAGGGTTAGGGAAAACCCTAA", &table, &c);
        let lower = scan_sequence("chr1", b"ttagggTTAGGGaaaaccctaa", &table, &c);
        assert_eq!(lower.matches, upper.matches);
        assert_eq!(lower.counts, upper.counts);
        assert_eq!(lower.composition, upper.composition);
    }

    #[test]
    fn unrequested_stats_are_skipped() {
        let c = ScanConfig { stats: StatSet::parse_list("match").unwrap(), ..cfg(4, 2) };
        let set = c.build_pattern_set().unwrap();
        let table = PatternTable::new(&set);
        let res = scan_sequence("s", b"TTAGGG", &table, &c);
        assert_eq!(res.matches.len(), 1);
        assert!(res.counts.is_none());
        assert!(res.composition.is_none());
        let s = res.summary();
        assert_eq!(s.max_window, None);
        assert_eq!(s.mean_gc, None);
    }

    #[test]
    fn empty_sequence_degrades_to_empty_result() {
        let c = cfg(4, 2);
        let set = c.build_pattern_set().unwrap();
        let table = PatternTable::new(&set);
        let res = scan_sequence("s", b"", &table, &c);
        assert!(res.matches.is_empty());
        assert!(res.counts.as_ref().unwrap().is_empty());
        assert!(res.composition.as_ref().unwrap().gc.is_empty());
        assert!(res.blocks.is_empty());
    }

    #[test]
    fn parallel_scan_keeps_input_order() {
        let c = ScanConfig { canonical: Some("TTAGGG".into()), ..cfg(6, 3) };
        let set = c.build_pattern_set().unwrap();
        let records: Vec<SeqRecord> = (0..32)
            .map(|i| SeqRecord {
                header: format!("ctg{}", i),
                seq: b"TTAGGG".repeat(i % 5),
            })
            .collect();
        let results = scan_records(&records, &set, &c);
        assert_eq!(results.len(), records.len());
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.header, format!("ctg{}", i));
            assert_eq!(r.matches.len(), i % 5);
            assert_eq!(r.summary().canonical, Some(i % 5));
        }
    }
}
