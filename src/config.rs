use log::warn;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::motif::{iupac, pattern_budget, PatternSet, MAX_EDIT_DISTANCE};
use crate::util::dna;

/// 可选输出的统计量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    /// 逐条匹配记录（BED）
    Match,
    /// 窗口内匹配计数
    Count,
    Entropy,
    Gc,
}

impl StatKind {
    pub const ALL: [StatKind; 4] = [StatKind::Match, StatKind::Count, StatKind::Entropy, StatKind::Gc];

    pub fn name(self) -> &'static str {
        match self {
            StatKind::Match => "match",
            StatKind::Count => "count",
            StatKind::Entropy => "entropy",
            StatKind::Gc => "gc",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "match" | "matches" => Ok(StatKind::Match),
            "count" | "density" => Ok(StatKind::Count),
            "entropy" => Ok(StatKind::Entropy),
            "gc" => Ok(StatKind::Gc),
            other => Err(ConfigError::UnknownStat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatSet {
    bits: u8,
}

impl StatSet {
    pub fn all() -> Self {
        let mut s = Self::default();
        for k in StatKind::ALL {
            s.insert(k);
        }
        s
    }

    /// 解析逗号分隔的列表，例如 `match,count,gc`。
    pub fn parse_list(list: &str) -> Result<Self, ConfigError> {
        let mut s = Self::default();
        for item in list.split(',').filter(|x| !x.trim().is_empty()) {
            s.insert(item.parse()?);
        }
        Ok(s)
    }

    pub fn insert(&mut self, kind: StatKind) {
        self.bits |= 1 << kind as u8;
    }

    pub fn contains(&self, kind: StatKind) -> bool {
        self.bits & (1 << kind as u8) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = StatKind> + '_ {
        StatKind::ALL.into_iter().filter(move |&k| self.contains(k))
    }
}

/// 一次扫描运行的全部参数，显式传入各组件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub motifs: Vec<String>,
    pub max_edits: usize,
    pub window: usize,
    pub step: usize,
    pub stats: StatSet,
    /// 打分用的规范 motif；None 表示不计算 Hamming 距离
    pub canonical: Option<String>,
    /// 相邻匹配合并为端粒块时允许的最大间隔
    pub block_max_gap: usize,
    /// 端粒块至少包含的匹配数
    pub block_min_matches: usize,
    pub threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            motifs: vec!["TTAGGG".to_string()],
            max_edits: 0,
            window: 1000,
            step: 500,
            stats: StatSet::all(),
            canonical: None,
            block_max_gap: 12,
            block_min_matches: 4,
            threads: 1,
        }
    }
}

impl ScanConfig {
    /// 扫描前的一次性校验；`step > window` 只给出警告。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.motifs.is_empty() {
            return Err(ConfigError::EmptyMotifList);
        }
        for m in &self.motifs {
            iupac::validate_motif(m.as_bytes())?;
        }
        if self.max_edits > MAX_EDIT_DISTANCE {
            return Err(ConfigError::EditDistanceTooLarge { given: self.max_edits, max: MAX_EDIT_DISTANCE });
        }
        pattern_budget(self.motifs.as_slice(), self.max_edits)?;
        if self.window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        if let Some(c) = &self.canonical {
            if c.is_empty() || !dna::is_concrete(c.to_ascii_uppercase().as_bytes()) {
                return Err(ConfigError::AmbiguousCanonical(c.clone()));
            }
        }
        if self.step > self.window {
            warn!(
                "step ({}) is larger than window ({}): {} bp between windows will not be covered",
                self.step,
                self.window,
                self.step - self.window
            );
        }
        Ok(())
    }

    /// 校验配置并构建搜索集合；给出规范 motif 时同时计算距离。
    pub fn build_pattern_set(&self) -> Result<PatternSet, ConfigError> {
        self.validate()?;
        let mut set = PatternSet::build(self.motifs.as_slice(), self.max_edits)?;
        if let Some(c) = &self.canonical {
            set.score_against(c.as_bytes())?;
        }
        Ok(set)
    }
}
