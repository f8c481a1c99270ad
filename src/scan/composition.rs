use super::window::{window_count, window_starts, WindowStat};
use crate::util::dna;

/// (G + C) / 窗口长度；非 ACGT 字符计入长度。
pub fn gc_content(window: &[u8]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let gc = window
        .iter()
        .filter(|&&b| matches!(b.to_ascii_uppercase(), b'G' | b'C'))
        .count();
    gc as f64 / window.len() as f64
}

/// 四碱基频率分布的 Shannon 熵（bit）。非 ACGT 不参与分布；全部为简并码时为 0。
pub fn shannon_entropy(window: &[u8]) -> f64 {
    let mut counts = [0u32; 4];
    for &b in window {
        if let Some(i) = dna::base_index(b) {
            counts[i] += 1;
        }
    }
    entropy_from_counts(&counts)
}

fn entropy_from_counts(counts: &[u32; 4]) -> f64 {
    let total: u32 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let t = total as f64;
    let mut entropy = 0.0f64;
    for &c in counts {
        if c > 0 {
            let p = c as f64 / t;
            entropy -= p * p.log2();
        }
    }
    // -0.0 for single-symbol windows
    entropy.max(0.0)
}

fn gc_from_counts(counts: &[u32; 4], len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    (counts[1] + counts[2]) as f64 / len as f64
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositionWindows {
    pub entropy: Vec<WindowStat<f64>>,
    pub gc: Vec<WindowStat<f64>>,
}

/// 与窗口计数相同的 (W, S) 节奏计算熵与 GC，和匹配结果无关。
///
/// 维护窗口内的碱基计数，随窗口前进增量更新，整体 O(N)。
pub fn composition_windows(seq: &[u8], window: usize, step: usize) -> CompositionWindows {
    let n = seq.len();
    let count = window_count(n, window, step);
    let mut out = CompositionWindows {
        entropy: Vec::with_capacity(count),
        gc: Vec::with_capacity(count),
    };
    if count == 0 {
        return out;
    }

    let mut counts = [0u32; 4];
    let tally = |counts: &mut [u32; 4], range: &[u8], add: bool| {
        for &b in range {
            if let Some(i) = dna::base_index(b) {
                if add {
                    counts[i] += 1;
                } else {
                    counts[i] -= 1;
                }
            }
        }
    };

    tally(&mut counts, &seq[..window], true);
    let mut prev = 0usize;
    for start in window_starts(n, window, step) {
        if start > 0 {
            let prev_end = prev + window;
            tally(&mut counts, &seq[prev..prev_end.min(start)], false);
            tally(&mut counts, &seq[prev_end.max(start)..start + window], true);
        }
        out.entropy.push(WindowStat { start, value: entropy_from_counts(&counts) });
        out.gc.push(WindowStat { start, value: gc_from_counts(&counts, window) });
        prev = start;
    }
    out
}
