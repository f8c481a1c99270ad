use anyhow::{Context, Result};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::config::{StatKind, StatSet};
use crate::scan::{MatchRecord, ScanResult, ScanSummary, TelomereBlock, WindowStat};

/// 每条匹配一行：`header\tstart\tend`；`extended` 时追加 `\tpattern\tstrand`。
pub fn write_matches<W: Write>(out: &mut W, matches: &[MatchRecord], extended: bool) -> Result<()> {
    for m in matches {
        if extended {
            writeln!(out, "{}\t{}\t{}\t{}\t{}", m.header, m.start, m.end, m.pattern, m.orientation)?;
        } else {
            writeln!(out, "{}\t{}\t{}", m.header, m.start, m.end)?;
        }
    }
    Ok(())
}

/// 窗口统计，每个窗口一行：`header\twindowStart\tvalue`
pub fn write_window_rows<W: Write, T: Display>(out: &mut W, header: &str, values: &[WindowStat<T>]) -> Result<()> {
    for w in values {
        writeln!(out, "{}\t{}\t{}", header, w.start, w.value)?;
    }
    Ok(())
}

/// 浮点窗口统计保留 4 位小数
pub fn write_window_rows_f64<W: Write>(out: &mut W, header: &str, values: &[WindowStat<f64>]) -> Result<()> {
    for w in values {
        writeln!(out, "{}\t{}\t{:.4}", header, w.start, w.value)?;
    }
    Ok(())
}

pub fn write_blocks<W: Write>(out: &mut W, blocks: &[TelomereBlock]) -> Result<()> {
    for b in blocks {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            b.header, b.start, b.end, b.n_matches, b.forward, b.reverse
        )?;
    }
    Ok(())
}

pub const SUMMARY_COLUMNS: &str =
    "header\tlength\tmatches\tforward\treverse\tcanonical\tmax_window_start\tmax_window_count\tmean_gc\tmean_entropy\tblocks";

fn opt<T: Display>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "NA".to_string())
}

fn opt_f64(v: Option<f64>) -> String {
    v.map(|x| format!("{:.4}", x)).unwrap_or_else(|| "NA".to_string())
}

pub fn write_summary_row<W: Write>(out: &mut W, s: &ScanSummary) -> Result<()> {
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        s.header,
        s.len,
        s.matches,
        s.forward,
        s.reverse,
        opt(s.canonical),
        opt(s.max_window.map(|m| m.0)),
        opt(s.max_window.map(|m| m.1)),
        opt_f64(s.mean_gc),
        opt_f64(s.mean_entropy),
        s.blocks,
    )?;
    Ok(())
}

/// 按前缀创建输出文件：
/// `<prefix>.matches.bed`、`<prefix>.count.tsv`（含 `.fwd` / `.rev`）、`<prefix>.entropy.tsv`、
/// `<prefix>.gc.tsv`、`<prefix>.blocks.bed`、`<prefix>.summary.tsv`。
/// 只为请求的统计量创建文件。
pub struct ReportWriter {
    stats: StatSet,
    extended: bool,
    matches: Option<BufWriter<File>>,
    count: Option<[BufWriter<File>; 3]>,
    entropy: Option<BufWriter<File>>,
    gc: Option<BufWriter<File>>,
    blocks: BufWriter<File>,
    summary: BufWriter<File>,
    paths: Vec<String>,
}

impl ReportWriter {
    pub fn create(prefix: &str, stats: StatSet, extended: bool, command_line: &str) -> Result<Self> {
        let mut paths = Vec::new();
        let mut open = |suffix: &str| -> Result<BufWriter<File>> {
            let path = format!("{}.{}", prefix, suffix);
            let fh = File::create(&path).with_context(|| format!("cannot create output file '{}'", path))?;
            paths.push(path);
            Ok(BufWriter::new(fh))
        };

        let matches = if stats.contains(StatKind::Match) { Some(open("matches.bed")?) } else { None };
        let count = if stats.contains(StatKind::Count) {
            Some([open("count.tsv")?, open("count.fwd.tsv")?, open("count.rev.tsv")?])
        } else {
            None
        };
        let entropy = if stats.contains(StatKind::Entropy) { Some(open("entropy.tsv")?) } else { None };
        let gc = if stats.contains(StatKind::Gc) { Some(open("gc.tsv")?) } else { None };
        let blocks = open("blocks.bed")?;
        let mut summary = open("summary.tsv")?;

        writeln!(summary, "# teloscan {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(summary, "# command: {}", command_line)?;
        writeln!(summary, "# date: {}", chrono::Utc::now().to_rfc3339())?;
        writeln!(summary, "{}", SUMMARY_COLUMNS)?;

        Ok(Self { stats, extended, matches, count, entropy, gc, blocks, summary, paths })
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn write_result(&mut self, res: &ScanResult) -> Result<()> {
        if let Some(out) = self.matches.as_mut() {
            write_matches(out, &res.matches, self.extended)?;
        }
        if let Some([all, fwd, rev]) = self.count.as_mut() {
            for (out, sums) in [(all, &res.counts), (fwd, &res.forward_counts), (rev, &res.reverse_counts)] {
                if let Some(s) = sums {
                    write_window_rows(out, &res.header, &s.values)?;
                }
            }
        }
        if let Some(comp) = &res.composition {
            if let Some(out) = self.entropy.as_mut() {
                write_window_rows_f64(out, &res.header, &comp.entropy)?;
            }
            if let Some(out) = self.gc.as_mut() {
                write_window_rows_f64(out, &res.header, &comp.gc)?;
            }
        }
        write_blocks(&mut self.blocks, &res.blocks)?;
        write_summary_row(&mut self.summary, &res.summary())?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        if let Some(out) = self.matches.as_mut() {
            out.flush()?;
        }
        if let Some(outs) = self.count.as_mut() {
            for out in outs.iter_mut() {
                out.flush()?;
            }
        }
        for out in [self.entropy.as_mut(), self.gc.as_mut()].into_iter().flatten() {
            out.flush()?;
        }
        self.blocks.flush()?;
        self.summary.flush()?;
        log::debug!("wrote {} ({} statistics)", self.paths.join(", "), self.stats.iter().count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motif::Orientation;

    fn rec(start: usize, orientation: Orientation) -> MatchRecord {
        MatchRecord {
            header: "chr1".into(),
            start,
            end: start + 6,
            pattern: "TTAGGG".into(),
            orientation,
            distance: Some(0),
        }
    }

    #[test]
    fn match_rows() {
        let ms = vec![rec(0, Orientation::Forward), rec(6, Orientation::ReverseComplement)];
        let mut out = Vec::new();
        write_matches(&mut out, &ms, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "chr1\t0\t6\nchr1\t6\t12\n");

        let mut out = Vec::new();
        write_matches(&mut out, &ms, true).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "chr1\t0\t6\tTTAGGG\t+\nchr1\t6\t12\tTTAGGG\t-\n"
        );
    }

    #[test]
    fn window_rows() {
        let vals = vec![WindowStat { start: 0, value: 2u64 }, WindowStat { start: 2, value: 1 }];
        let mut out = Vec::new();
        write_window_rows(&mut out, "chr1", &vals).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "chr1\t0\t2\nchr1\t2\t1\n");

        let vals = vec![WindowStat { start: 10, value: 0.5f64 }];
        let mut out = Vec::new();
        write_window_rows_f64(&mut out, "chr1", &vals).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "chr1\t10\t0.5000\n");
    }

    #[test]
    fn summary_row_marks_missing_values() {
        let s = ScanSummary {
            header: "ctg".into(),
            len: 100,
            matches: 3,
            forward: 2,
            reverse: 1,
            canonical: None,
            max_window: Some((40, 3)),
            mean_gc: None,
            mean_entropy: Some(1.5),
            blocks: 1,
        };
        let mut out = Vec::new();
        write_summary_row(&mut out, &s).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ctg\t100\t3\t2\t1\tNA\t40\t3\tNA\t1.5000\t1\n"
        );
        assert_eq!(SUMMARY_COLUMNS.split('\t').count(), 11);
    }
}
