use super::matcher::MatchRecord;
use crate::motif::Orientation;

/// 由相邻匹配合并出的端粒块，坐标为 [start, end)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelomereBlock {
    pub header: String,
    pub start: usize,
    pub end: usize,
    pub n_matches: usize,
    pub forward: usize,
    pub reverse: usize,
}

impl TelomereBlock {
    fn open(m: &MatchRecord) -> Self {
        let mut b = Self {
            header: m.header.clone(),
            start: m.start,
            end: m.end,
            n_matches: 0,
            forward: 0,
            reverse: 0,
        };
        b.push(m);
        b
    }

    fn push(&mut self, m: &MatchRecord) {
        self.end = self.end.max(m.end);
        self.n_matches += 1;
        match m.orientation {
            Orientation::Forward => self.forward += 1,
            Orientation::ReverseComplement => self.reverse += 1,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// 主导方向：正向匹配多于反向时为 Forward
    pub fn orientation(&self) -> Orientation {
        if self.forward >= self.reverse {
            Orientation::Forward
        } else {
            Orientation::ReverseComplement
        }
    }
}

/// 将间隔不超过 `max_gap` 的相邻匹配合并为块，丢弃匹配数少于 `min_matches` 的块。
/// `matches` 需按起点升序（`find_matches` 的输出即如此）。
pub fn merge_blocks(matches: &[MatchRecord], max_gap: usize, min_matches: usize) -> Vec<TelomereBlock> {
    let mut blocks: Vec<TelomereBlock> = Vec::new();
    let mut cur: Option<TelomereBlock> = None;

    for m in matches {
        if let Some(b) = cur.as_mut() {
            if m.start <= b.end + max_gap {
                b.push(m);
                continue;
            }
        }
        if let Some(done) = cur.take() {
            blocks.push(done);
        }
        cur = Some(TelomereBlock::open(m));
    }
    if let Some(done) = cur {
        blocks.push(done);
    }

    blocks.retain(|b| b.n_matches >= min_matches.max(1));
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(start: usize, orientation: Orientation) -> MatchRecord {
        MatchRecord {
            header: "chr1".to_string(),
            start,
            end: start + 6,
            pattern: "TTAGGG".to_string(),
            orientation,
            distance: None,
        }
    }

    #[test]
    fn adjacent_matches_form_one_block() {
        let ms = vec![
            rec(0, Orientation::Forward),
            rec(6, Orientation::Forward),
            rec(12, Orientation::Forward),
        ];
        let blocks = merge_blocks(&ms, 0, 1);
        assert_eq!(blocks.len(), 1);
        assert_eq!((blocks[0].start, blocks[0].end), (0, 18));
        assert_eq!(blocks[0].n_matches, 3);
        assert_eq!(blocks[0].len(), 18);
    }

    #[test]
    fn gap_splits_blocks() {
        let ms = vec![
            rec(0, Orientation::Forward),
            rec(10, Orientation::Forward),
            rec(100, Orientation::ReverseComplement),
            rec(106, Orientation::ReverseComplement),
        ];
        let blocks = merge_blocks(&ms, 4, 1);
        assert_eq!(blocks.len(), 2);
        assert_eq!((blocks[0].start, blocks[0].end), (0, 16));
        assert_eq!((blocks[1].start, blocks[1].end), (100, 112));
        assert_eq!(blocks[1].orientation(), Orientation::ReverseComplement);
        assert_eq!((blocks[1].forward, blocks[1].reverse), (0, 2));

        let blocks = merge_blocks(&ms, 3, 1);
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn small_blocks_are_dropped() {
        let ms = vec![rec(0, Orientation::Forward), rec(6, Orientation::Forward), rec(50, Orientation::Forward)];
        let blocks = merge_blocks(&ms, 0, 2);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].n_matches, 2);
        assert!(merge_blocks(&[], 0, 1).is_empty());
    }
}
