use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::iupac;
use super::variants::{substitution_variants, variant_bound};
use crate::error::ConfigError;
use crate::util::dna;

/// 允许的最大替换数；变体数量随 d 指数增长，超过此值视为配置错误。
pub const MAX_EDIT_DISTANCE: usize = 3;

/// 构建时生成（去重前）的条目数上限。
pub const MAX_PATTERN_ENTRIES: usize = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Forward,
    ReverseComplement,
}

impl Orientation {
    pub fn strand(self) -> char {
        match self {
            Orientation::Forward => '+',
            Orientation::ReverseComplement => '-',
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.strand())
    }
}

/// 待搜索的具体 motif 及其方向；`distance` 为到规范 motif 对的最小 Hamming 距离（未打分时为 None）。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatternEntry {
    pub motif: Vec<u8>,
    pub orientation: Orientation,
    pub distance: Option<usize>,
}

impl PatternEntry {
    pub fn new(motif: Vec<u8>, orientation: Orientation) -> Self {
        Self { motif, orientation, distance: None }
    }

    pub fn motif_str(&self) -> &str {
        // 条目只包含 ACGT
        std::str::from_utf8(&self.motif).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.motif.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motif.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSetMeta {
    /// 用户给出的原始 motif（可含简并码）
    pub motifs: Vec<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
}

/// 去重后的搜索集合：每个 (motif, orientation) 只出现一次，按 motif 排序。
/// 构建一次后只读，在所有扫描线程之间共享。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSet {
    entries: Vec<PatternEntry>,
    max_edits: usize,
    canonical: Option<Vec<u8>>,
    meta: PatternSetMeta,
}

/// 等长序列的 Hamming 距离；长度不同属于调用约定错误。
pub fn hamming(a: &[u8], b: &[u8]) -> Result<usize, ConfigError> {
    if a.len() != b.len() {
        return Err(ConfigError::LengthMismatch { left: a.len(), right: b.len() });
    }
    Ok(a.iter().zip(b).filter(|(x, y)| x != y).count())
}

/// 估算构建时生成的条目数（去重前，含两个方向），超过 `MAX_PATTERN_ENTRIES` 即报错。
pub fn pattern_budget<S: AsRef<[u8]>>(motifs: &[S], max_edits: usize) -> Result<usize, ConfigError> {
    let mut total = 0usize;
    for m in motifs {
        let motif = iupac::validate_motif(m.as_ref())?;
        let too_many = || ConfigError::TooManyPatterns {
            motif: String::from_utf8_lossy(&motif).into_owned(),
            limit: MAX_PATTERN_ENTRIES,
        };
        let per_seed = variant_bound(motif.len(), max_edits)
            .and_then(|v| v.checked_add(1))
            .and_then(|v| v.checked_mul(2))
            .ok_or_else(too_many)?;
        total = iupac::expansion_size(&motif)?
            .checked_mul(per_seed)
            .and_then(|n| n.checked_add(total))
            .filter(|&n| n <= MAX_PATTERN_ENTRIES)
            .ok_or_else(too_many)?;
    }
    Ok(total)
}

impl PatternSet {
    /// 由原始 motif 构建搜索集合：IUPAC 展开 → 替换变体 → 正向 + 反向互补 → 排序去重。
    pub fn build<S: AsRef<[u8]>>(motifs: &[S], max_edits: usize) -> Result<Self, ConfigError> {
        if motifs.is_empty() {
            return Err(ConfigError::EmptyMotifList);
        }
        if max_edits > MAX_EDIT_DISTANCE {
            return Err(ConfigError::EditDistanceTooLarge { given: max_edits, max: MAX_EDIT_DISTANCE });
        }
        // 先整体校验，任何 motif 出错都不产生部分结果
        let validated = motifs
            .iter()
            .map(|m| iupac::validate_motif(m.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        pattern_budget(validated.as_slice(), max_edits)?;

        let mut entries = Vec::new();
        for motif in &validated {
            for seed in iupac::expand(motif)? {
                let variants = substitution_variants(&seed, max_edits);
                for concrete in std::iter::once(seed).chain(variants) {
                    let rc = dna::revcomp(&concrete);
                    entries.push(PatternEntry::new(concrete, Orientation::Forward));
                    entries.push(PatternEntry::new(rc, Orientation::ReverseComplement));
                }
            }
        }
        entries.sort();
        entries.dedup_by(|a, b| a.motif == b.motif && a.orientation == b.orientation);

        let meta = PatternSetMeta {
            motifs: validated
                .iter()
                .map(|m| String::from_utf8_lossy(m).into_owned())
                .collect(),
            ..PatternSetMeta::default()
        };

        Ok(Self { entries, max_edits, canonical: None, meta })
    }

    /// 计算每个条目到规范对 (canonical, revcomp(canonical)) 的最小 Hamming 距离。
    /// 任一条目长度不符即报错，此时集合保持不变。
    pub fn score_against(&mut self, canonical: &[u8]) -> Result<(), ConfigError> {
        let canonical = canonical.to_ascii_uppercase();
        if canonical.is_empty() || !dna::is_concrete(&canonical) {
            return Err(ConfigError::AmbiguousCanonical(String::from_utf8_lossy(&canonical).into_owned()));
        }
        let rc = dna::revcomp(&canonical);
        let distances = self
            .entries
            .iter()
            .map(|e| -> Result<usize, ConfigError> {
                Ok(hamming(&e.motif, &canonical)?.min(hamming(&e.motif, &rc)?))
            })
            .collect::<Result<Vec<usize>, ConfigError>>()?;
        for (e, d) in self.entries.iter_mut().zip(distances) {
            e.distance = Some(d);
        }
        self.canonical = Some(canonical);
        Ok(())
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_edits(&self) -> usize {
        self.max_edits
    }

    pub fn canonical(&self) -> Option<&[u8]> {
        self.canonical.as_deref()
    }

    /// 集合中出现的 motif 长度，降序。
    pub fn lengths(&self) -> Vec<usize> {
        let mut lens: Vec<usize> = self.entries.iter().map(PatternEntry::len).collect();
        lens.sort_unstable_by(|a, b| b.cmp(a));
        lens.dedup();
        lens
    }

    pub fn count_by_orientation(&self, orientation: Orientation) -> usize {
        self.entries.iter().filter(|e| e.orientation == orientation).count()
    }

    pub fn meta(&self) -> &PatternSetMeta {
        &self.meta
    }

    pub fn set_meta(&mut self, meta: PatternSetMeta) {
        self.meta = meta;
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let mut f = std::io::BufWriter::new(std::fs::File::create(path)?);
        bincode::serialize_into(&mut f, self)?;
        Ok(())
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let f = std::io::BufReader::new(std::fs::File::open(path)?);
        let set: Self = bincode::deserialize_from(f)?;
        Ok(set)
    }
}
