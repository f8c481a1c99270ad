use std::collections::HashMap;

use crate::motif::{Orientation, PatternEntry, PatternSet};

/// 一次命中，坐标为 0-based 半开区间 [start, end)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub header: String,
    pub start: usize,
    pub end: usize,
    pub pattern: String,
    pub orientation: Orientation,
    pub distance: Option<usize>,
}

impl MatchRecord {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn is_canonical(&self) -> bool {
        self.distance == Some(0)
    }
}

/// 按 motif 长度分组的哈希查找表，长度降序；借用只读的 `PatternSet`。
pub struct PatternTable<'a> {
    set: &'a PatternSet,
    by_len: Vec<(usize, HashMap<&'a [u8], usize>)>,
}

impl<'a> PatternTable<'a> {
    pub fn new(set: &'a PatternSet) -> Self {
        let mut by_len: Vec<(usize, HashMap<&'a [u8], usize>)> =
            set.lengths().into_iter().map(|l| (l, HashMap::new())).collect();
        for (idx, e) in set.entries().iter().enumerate() {
            if let Some((_, map)) = by_len.iter_mut().find(|(l, _)| *l == e.len()) {
                // entries 已按 (motif, orientation) 排序，同一串上正向先插入
                map.entry(e.motif.as_slice()).or_insert(idx);
            }
        }
        Self { set, by_len }
    }

    pub fn min_len(&self) -> usize {
        self.by_len.last().map(|(l, _)| *l).unwrap_or(0)
    }

    pub fn set(&self) -> &'a PatternSet {
        self.set
    }

    /// 以 `pos` 为起点的最长命中
    #[inline]
    pub fn lookup(&self, seq: &[u8], pos: usize) -> Option<&'a PatternEntry> {
        for (len, map) in &self.by_len {
            if pos + len > seq.len() {
                continue;
            }
            if let Some(&idx) = map.get(&seq[pos..pos + len]) {
                return Some(&self.set.entries()[idx]);
            }
        }
        None
    }
}

/// 从左到右贪心、不重叠地查找匹配。
///
/// 命中时标记 `mv[i]`、输出记录并跳到 `i + len`；否则前进 1。
/// 剩余长度不足最短 motif 时停止。重叠出现的重复单元不会被单独计数。
pub fn find_matches(header: &str, seq: &[u8], table: &PatternTable<'_>) -> (Vec<bool>, Vec<MatchRecord>) {
    let n = seq.len();
    let mut mv = vec![false; n];
    let mut records = Vec::new();
    let min_len = table.min_len();
    if min_len == 0 {
        return (mv, records);
    }

    let mut i = 0usize;
    while i + min_len <= n {
        match table.lookup(seq, i) {
            Some(e) => {
                mv[i] = true;
                records.push(MatchRecord {
                    header: header.to_string(),
                    start: i,
                    end: i + e.len(),
                    pattern: e.motif_str().to_string(),
                    orientation: e.orientation,
                    distance: e.distance,
                });
                i += e.len();
            }
            None => i += 1,
        }
    }
    (mv, records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(mv: &[bool]) -> Vec<usize> {
        mv.iter().enumerate().filter(|(_, m)| **m).map(|(i, _)| i).collect()
    }

    #[test]
    fn two_forward_repeats() {
        let set = PatternSet::build(&["TTAGGG"], 0).unwrap();
        let table = PatternTable::new(&set);
        let seq = b"TTAGGGTTAGGGAAAA";
        let (mv, recs) = find_matches("chr1", seq, &table);
        assert_eq!(mv.len(), seq.len());
        assert_eq!(positions(&mv), vec![0, 6]);
        assert_eq!(recs.len(), 2);
        assert_eq!((recs[0].start, recs[0].end), (0, 6));
        assert_eq!((recs[1].start, recs[1].end), (6, 12));
        assert!(recs.iter().all(|r| r.orientation == Orientation::Forward && r.pattern == "TTAGGG"));
        assert_eq!(recs[0].header, "chr1");
    }

    #[test]
    fn reverse_complement_strand_is_found() {
        let set = PatternSet::build(&["TTAGGG"], 0).unwrap();
        let table = PatternTable::new(&set);
        let (mv, recs) = find_matches("chr1", b"ACCCTAACCCTAA", &table);
        assert_eq!(positions(&mv), vec![1, 7]);
        assert!(recs.iter().all(|r| r.orientation == Orientation::ReverseComplement));
    }

    #[test]
    fn overlapping_occurrences_are_greedy() {
        let set = PatternSet::build(&["AAA"], 0).unwrap();
        let table = PatternTable::new(&set);
        let (mv, _) = find_matches("s", b"AAAAA", &table);
        assert_eq!(positions(&mv), vec![0]);
    }

    #[test]
    fn approximate_matches_carry_distance() {
        let mut set = PatternSet::build(&["TTAGGG"], 1).unwrap();
        set.score_against(b"TTAGGG").unwrap();
        let table = PatternTable::new(&set);
        let (_, recs) = find_matches("s", b"TTAGGGTTACGGNNTTAGGG", &table);
        let got: Vec<(usize, Option<usize>)> = recs.iter().map(|r| (r.start, r.distance)).collect();
        assert_eq!(got, vec![(0, Some(0)), (6, Some(1)), (14, Some(0))]);
        assert!(recs[0].is_canonical());
        assert!(!recs[1].is_canonical());
    }

    #[test]
    fn longer_motif_wins_at_same_position() {
        let set = PatternSet::build(&["TTAGGG", "TTAGGGTTA"], 0).unwrap();
        let table = PatternTable::new(&set);
        assert_eq!(table.min_len(), 6);
        let (_, recs) = find_matches("s", b"TTAGGGTTAGGG", &table);
        assert_eq!(recs.len(), 1);
        assert_eq!((recs[0].start, recs[0].end), (0, 9));
    }

    #[test]
    fn short_or_empty_sequence() {
        let set = PatternSet::build(&["TTAGGG"], 0).unwrap();
        let table = PatternTable::new(&set);
        let (mv, recs) = find_matches("s", b"TTAGG", &table);
        assert_eq!(mv, vec![false; 5]);
        assert!(recs.is_empty());
        let (mv, recs) = find_matches("s", b"", &table);
        assert!(mv.is_empty() && recs.is_empty());
    }
}
