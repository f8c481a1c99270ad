use super::pattern_set::MAX_PATTERN_ENTRIES;
use crate::error::ConfigError;

/// IUPAC 码对应的具体碱基集合；不在 15 个符号之内返回 None。
pub fn iupac_bases(code: u8) -> Option<&'static [u8]> {
    let bases: &'static [u8] = match code.to_ascii_uppercase() {
        b'A' => b"A",
        b'C' => b"C",
        b'G' => b"G",
        b'T' => b"T",
        b'R' => b"AG",
        b'Y' => b"CT",
        b'M' => b"AC",
        b'K' => b"GT",
        b'S' => b"CG",
        b'W' => b"AT",
        b'H' => b"ACT",
        b'B' => b"CGT",
        b'V' => b"ACG",
        b'D' => b"AGT",
        b'N' => b"ACGT",
        _ => return None,
    };
    Some(bases)
}

/// 检查 motif 字母表并统一为大写。
pub fn validate_motif(motif: &[u8]) -> Result<Vec<u8>, ConfigError> {
    if motif.is_empty() {
        return Err(ConfigError::EmptyMotif);
    }
    let mut out = Vec::with_capacity(motif.len());
    for (pos, &b) in motif.iter().enumerate() {
        if iupac_bases(b).is_none() {
            return Err(ConfigError::UnknownSymbol {
                motif: String::from_utf8_lossy(motif).into_owned(),
                symbol: b as char,
                pos,
            });
        }
        out.push(b.to_ascii_uppercase());
    }
    Ok(out)
}

/// 展开后的具体 motif 数量（各位置分支数之积），不实际枚举。
/// 超过 `MAX_PATTERN_ENTRIES` 时报错。
pub fn expansion_size(motif: &[u8]) -> Result<usize, ConfigError> {
    let motif = validate_motif(motif)?;
    let too_many = || ConfigError::TooManyPatterns {
        motif: String::from_utf8_lossy(&motif).into_owned(),
        limit: MAX_PATTERN_ENTRIES,
    };
    let mut n = 1usize;
    for bases in motif.iter().filter_map(|&b| iupac_bases(b)) {
        n = n.checked_mul(bases.len()).filter(|&n| n <= MAX_PATTERN_ENTRIES).ok_or_else(too_many)?;
    }
    Ok(n)
}

/// 将含简并码的 motif 展开为全部具体 motif（笛卡尔积）。
///
/// 逐位置深度优先枚举：每个位置在允许的碱基上分支，缓冲区填满即得到一个结果。
/// 输出顺序即枚举顺序，调用方应当把结果视为集合。
pub fn expand(motif: &[u8]) -> Result<Vec<Vec<u8>>, ConfigError> {
    let motif = validate_motif(motif)?;
    // 数量已限制在 MAX_PATTERN_ENTRIES 之内
    let mut out = Vec::with_capacity(expansion_size(&motif)?);
    let mut buf = Vec::with_capacity(motif.len());
    expand_from(&motif, &mut buf, &mut out);
    Ok(out)
}

fn expand_from(motif: &[u8], buf: &mut Vec<u8>, out: &mut Vec<Vec<u8>>) {
    let pos = buf.len();
    if pos == motif.len() {
        out.push(buf.clone());
        return;
    }
    // validate_motif 已保证每个符号都有定义
    let bases = iupac_bases(motif[pos]).unwrap_or(b"");
    for &b in bases {
        buf.push(b);
        expand_from(motif, buf, out);
        buf.pop();
    }
}
