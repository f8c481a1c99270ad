use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use teloscan::config::{ScanConfig, StatSet};
use teloscan::io::{self, bed::ReportWriter, RecordSource, SeqRecord};
use teloscan::motif::{Orientation, PatternSet, PatternSetMeta};
use teloscan::scan;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// 每批并行扫描的碱基数上限，用于限制内存占用
const BATCH_BASES: usize = 64 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "teloscan", author, version, about = "Telomeric repeat scanner with windowed statistics", arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan sequences for telomeric motifs and write BED/TSV reports
    Scan {
        /// Input FASTA/FASTQ file ("-" for stdin)
        input: String,
        /// Motif to search for (IUPAC codes allowed); repeatable
        #[arg(short = 'p', long = "pattern", default_value = "TTAGGG")]
        patterns: Vec<String>,
        /// Maximum number of substitutions per motif
        #[arg(short = 'e', long = "edits", default_value_t = 0)]
        max_edits: usize,
        #[arg(short = 'w', long = "window", default_value_t = 1000)]
        window: usize,
        #[arg(short = 's', long = "step", default_value_t = 500)]
        step: usize,
        /// Comma-separated statistics: match,count,entropy,gc
        #[arg(long = "stats", default_value = "match,count,entropy,gc")]
        stats: String,
        /// Canonical motif used to score approximate matches by Hamming distance
        #[arg(long = "canonical")]
        canonical: Option<String>,
        /// Maximum gap between matches merged into one telomere block
        #[arg(long = "block-gap", default_value_t = 12)]
        block_max_gap: usize,
        /// Minimum number of matches in a reported telomere block
        #[arg(long = "block-min", default_value_t = 4)]
        block_min_matches: usize,
        /// Add pattern and strand columns to the match BED
        #[arg(long = "extended")]
        extended: bool,
        /// Pre-built pattern set (see `teloscan patterns --save`); motifs and edits come from the file
        #[arg(long = "pattern-set", conflicts_with_all = ["patterns", "max_edits"])]
        pattern_set: Option<String>,
        /// Output prefix
        #[arg(short, long, default_value = "teloscan")]
        out: String,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
    },
    /// Print (and optionally save) the expanded pattern set
    Patterns {
        #[arg(short = 'p', long = "pattern", default_value = "TTAGGG")]
        patterns: Vec<String>,
        #[arg(short = 'e', long = "edits", default_value_t = 0)]
        max_edits: usize,
        #[arg(long = "canonical")]
        canonical: Option<String>,
        /// Save the set with bincode for reuse with `scan --pattern-set`
        #[arg(long = "save")]
        save: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    if let Err(err) = try_main() {
        error!("{}", err);
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Scan {
            input,
            patterns,
            max_edits,
            window,
            step,
            stats,
            canonical,
            block_max_gap,
            block_min_matches,
            extended,
            pattern_set,
            out,
            threads,
        } => {
            let cfg = ScanConfig {
                motifs: patterns,
                max_edits,
                window,
                step,
                stats: StatSet::parse_list(&stats)?,
                canonical,
                block_max_gap,
                block_min_matches,
                threads,
            };
            run_scan(&input, cfg, pattern_set.as_deref(), &out, extended)
        }
        Commands::Patterns { patterns, max_edits, canonical, save } => {
            let cfg = ScanConfig { motifs: patterns, max_edits, canonical, ..ScanConfig::default() };
            run_patterns(&cfg, save.as_deref())
        }
    }
}

fn command_line() -> String {
    std::env::args().collect::<Vec<_>>().join(" ")
}

/// 载入预先构建的集合，或按配置现场构建；两种方式都在扫描前完成全部校验。
fn load_or_build(cfg: &mut ScanConfig, pattern_set: Option<&str>) -> Result<PatternSet> {
    let Some(path) = pattern_set else {
        return Ok(cfg.build_pattern_set()?);
    };
    let mut set = PatternSet::load_from_file(path)
        .with_context(|| format!("cannot load pattern set '{}'", path))?;
    info!(
        "loaded pattern set '{}' (motifs {:?}, built {})",
        path,
        set.meta().motifs,
        set.meta().build_timestamp.as_deref().unwrap_or("unknown")
    );
    // -p/-e 与 --pattern-set 互斥，这里只会覆盖默认值
    cfg.motifs = set.meta().motifs.clone();
    cfg.max_edits = set.max_edits();
    cfg.validate()?;
    if let Some(c) = &cfg.canonical {
        set.score_against(c.as_bytes())?;
    }
    Ok(set)
}

fn run_scan(input: &str, mut cfg: ScanConfig, pattern_set: Option<&str>, out: &str, extended: bool) -> Result<()> {
    let set = load_or_build(&mut cfg, pattern_set)?;
    if set.canonical().is_none() && set.max_edits() > 0 {
        warn!("approximate matching without --canonical: matches will not carry a distance");
    }
    info!(
        "pattern set: {} entries ({} forward, {} reverse complement), lengths {:?}",
        set.len(),
        set.count_by_orientation(Orientation::Forward),
        set.count_by_orientation(Orientation::ReverseComplement),
        set.lengths()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.threads.max(1))
        .build()
        .context("cannot build thread pool")?;

    let mut reader = io::open_reader(input)?;
    let mut report = ReportWriter::create(out, cfg.stats, extended, &command_line())?;

    let mut n_seqs = 0usize;
    let mut total_len = 0usize;
    let mut total_matches = 0usize;
    let mut total_blocks = 0usize;

    let mut batch: Vec<SeqRecord> = Vec::new();
    let mut batch_bases = 0usize;
    loop {
        let rec = reader.next_record()?;
        let at_end = rec.is_none();
        if let Some(r) = rec {
            batch_bases += r.seq.len();
            batch.push(r);
        }
        if batch.is_empty() || (!at_end && batch_bases < BATCH_BASES) {
            if at_end {
                break;
            }
            continue;
        }

        let results = pool.install(|| scan::scan_records(&batch, &set, &cfg));
        for res in &results {
            n_seqs += 1;
            total_len += res.len;
            total_matches += res.matches.len();
            total_blocks += res.blocks.len();
            report.write_result(res)?;
        }
        batch.clear();
        batch_bases = 0;
        if at_end {
            break;
        }
    }

    if n_seqs == 0 {
        warn!("input '{}' contains no sequences", input);
    }
    info!("sequences: {}", n_seqs);
    info!("total_len: {}", total_len);
    info!("matches: {}", total_matches);
    info!("telomere blocks: {}", total_blocks);
    let paths = report.paths().join(", ");
    report.finish()?;
    info!("reports written: {}", paths);
    Ok(())
}

fn run_patterns(cfg: &ScanConfig, save: Option<&str>) -> Result<()> {
    let mut set = cfg.build_pattern_set()?;
    info!("{} entries for motifs {:?} (edits <= {})", set.len(), cfg.motifs, cfg.max_edits);

    use std::io::Write;
    let stdout = std::io::stdout();
    let mut w = std::io::BufWriter::new(stdout.lock());
    for e in set.entries() {
        let dist = e.distance.map(|d| d.to_string()).unwrap_or_else(|| "NA".to_string());
        writeln!(w, "{}\t{}\t{}", e.motif_str(), e.orientation, dist)?;
    }
    w.flush()?;

    if let Some(path) = save {
        let meta = PatternSetMeta {
            build_args: Some(command_line()),
            build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
            ..set.meta().clone()
        };
        set.set_meta(meta);
        set.save_to_file(path)
            .with_context(|| format!("cannot write pattern set to '{}'", path))?;
        info!("pattern set saved: {}", path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pattern_set_excludes_explicit_motifs_and_edits() {
        let ok = Cli::try_parse_from(["teloscan", "scan", "in.fa", "--pattern-set", "set.bin"]);
        assert!(ok.is_ok());

        let err = Cli::try_parse_from(["teloscan", "scan", "in.fa", "--pattern-set", "set.bin", "-p", "TTAGGG"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);

        let err = Cli::try_parse_from(["teloscan", "scan", "in.fa", "--pattern-set", "set.bin", "-e", "1"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
