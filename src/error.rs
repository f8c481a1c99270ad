use thiserror::Error;

/// 配置错误：在扫描开始前一次性检查，任何一项失败都会终止本次运行。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no motifs given")]
    EmptyMotifList,

    #[error("empty motif")]
    EmptyMotif,

    #[error("motif '{motif}' contains unknown IUPAC symbol '{symbol}' at position {pos}")]
    UnknownSymbol { motif: String, symbol: char, pos: usize },

    #[error("edit distance {given} exceeds the supported maximum of {max}")]
    EditDistanceTooLarge { given: usize, max: usize },

    #[error("motif '{motif}' would produce more than {limit} search patterns")]
    TooManyPatterns { motif: String, limit: usize },

    #[error("window size must be greater than 0")]
    ZeroWindow,

    #[error("step size must be greater than 0")]
    ZeroStep,

    #[error("cannot compare sequences of different length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },

    #[error("canonical motif '{0}' must contain only A/C/G/T")]
    AmbiguousCanonical(String),

    #[error("unknown statistic '{0}' (expected one of: match, count, entropy, gc)")]
    UnknownStat(String),
}
