//! # teloscan
//!
//! 端粒重复序列扫描器：在线性化的基因组序列上查找端粒 motif（如 `TTAGGG`），
//! 输出逐条匹配以及按窗口统计的匹配密度、Shannon 熵和 GC 含量，用于组装质量评估。
//!
//! - **motif 展开**：IUPAC 简并码展开、≤ d 次替换的近似变体、正向 / 反向互补去重
//! - **匹配**：按长度分组的哈希表，从左到右贪心、不重叠匹配
//! - **窗口统计**：滑动窗口增量求和，O(N) 且与窗口大小无关
//! - **端粒块**：相邻匹配按最大间隔合并
//!
//! ## 快速示例
//!
//! ```rust
//! use teloscan::config::ScanConfig;
//! use teloscan::scan::{scan_sequence, PatternTable};
//!
//! let cfg = ScanConfig { window: 6, step: 6, ..ScanConfig::default() };
//! let set = cfg.build_pattern_set().unwrap();
//! let table = PatternTable::new(&set);
//!
//! let res = scan_sequence("chr1", b"TTAGGGTTAGGGAAAA", &table, &cfg);
//! let starts: Vec<usize> = res.matches.iter().map(|m| m.start).collect();
//! assert_eq!(starts, vec![0, 6]);
//! ```
//!
//! ## 模块说明
//!
//! - [`motif`]：IUPAC 展开、替换变体、搜索集合构建与 Hamming 打分
//! - [`scan`]：匹配、窗口计数、熵 / GC、端粒块、并行扫描
//! - [`io`]：FASTA / FASTQ 读取与 BED 风格输出
//! - [`config`]：运行参数与校验
//! - [`util`]：互补、反向互补等 DNA 工具函数

pub mod config;
pub mod error;
pub mod io;
pub mod motif;
pub mod scan;
pub mod util;

pub use config::{ScanConfig, StatKind, StatSet};
pub use error::ConfigError;
