/// 具体碱基字母表，顺序即计数器下标 {0:A, 1:C, 2:G, 3:T}
pub const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// 返回碱基在 [`BASES`] 中的下标；非 ACGT（含 N 与简并码）返回 None。
#[inline]
pub fn base_index(b: u8) -> Option<usize> {
    match b.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' | b'U' => Some(3),
        _ => None,
    }
}

#[inline]
pub fn is_acgt(b: u8) -> bool {
    base_index(b).is_some()
}

pub fn is_concrete(seq: &[u8]) -> bool {
    seq.iter().all(|&b| matches!(b, b'A' | b'C' | b'G' | b'T'))
}

/// 统一为大写，U 视为 T；IUPAC 简并码原样保留，其余字符记为 N。
pub fn normalize_seq(seq: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq {
        let up = b.to_ascii_uppercase();
        let nb = match up {
            b'U' => b'T',
            b'A' | b'C' | b'G' | b'T' | b'N' => up,
            b'R' | b'Y' | b'M' | b'K' | b'S' | b'W' | b'H' | b'B' | b'V' | b'D' => up,
            _ => b'N',
        };
        out.push(nb);
    }
    out
}

/// Watson-Crick 互补；简并码按其碱基集合的互补集合映射（R↔Y，K↔M，B↔V，D↔H，S/W/N 不变）。
#[inline]
pub fn complement(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' | b'U' => b'A',
        b'R' => b'Y',
        b'Y' => b'R',
        b'K' => b'M',
        b'M' => b'K',
        b'B' => b'V',
        b'V' => b'B',
        b'D' => b'H',
        b'H' => b'D',
        b'S' => b'S',
        b'W' => b'W',
        _ => b'N',
    }
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}
