/// 单个窗口的统计值，`start` 为窗口在序列上的 0-based 起点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStat<T> {
    pub start: usize,
    pub value: T,
}

/// 窗口计数序列及其最大值（即 "maxSum"）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowSums {
    pub window: usize,
    pub step: usize,
    pub values: Vec<WindowStat<u64>>,
    /// (起点, 窗口和)；没有完整窗口时为 None
    pub max: Option<(usize, u64)>,
}

impl WindowSums {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn max_sum(&self) -> u64 {
        self.max.map(|(_, v)| v).unwrap_or(0)
    }
}

/// 长度为 `n` 的序列上能放下的完整窗口数（起点为 0, S, 2S, …）。
#[inline]
pub fn window_count(n: usize, window: usize, step: usize) -> usize {
    if window == 0 || step == 0 || n < window {
        return 0;
    }
    (n - window) / step + 1
}

pub fn window_starts(n: usize, window: usize, step: usize) -> impl Iterator<Item = usize> {
    (0..window_count(n, window, step)).map(move |i| i * step)
}

/// 滑动窗口求和，总开销 O(N)，与 W 无关。
///
/// 第一个窗口直接求和；之后每前进 `step`，加上新进入窗口的位置、减去移出窗口的位置。
/// `step > window` 时两窗口不重叠，中间的位置不会被读取。
/// `scores.len() < window` 时结果为空。
pub fn window_sums<T>(scores: &[T], window: usize, step: usize) -> WindowSums
where
    T: Copy + Into<u64>,
{
    let n = scores.len();
    let count = window_count(n, window, step);
    let mut out = WindowSums { window, step, values: Vec::with_capacity(count), max: None };
    if count == 0 {
        return out;
    }

    let sum_range = |a: usize, b: usize| -> u64 { scores[a..b].iter().map(|&x| x.into()).sum() };

    let mut sum = sum_range(0, window);
    let mut prev = 0usize;
    for start in window_starts(n, window, step) {
        if start > 0 {
            let prev_end = prev + window;
            let end = start + window;
            // 移出 [prev, min(prev_end, start))，移入 [max(prev_end, start), end)
            sum -= sum_range(prev, prev_end.min(start));
            sum += sum_range(prev_end.max(start), end);
        }
        if out.max.map_or(true, |(_, m)| sum > m) {
            out.max = Some((start, sum));
        }
        out.values.push(WindowStat { start, value: sum });
        prev = start;
    }
    out
}
