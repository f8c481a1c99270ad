use crate::util::dna::{self, BASES};

/// 单次替换：对每个 ACGT 位置，依次换成另外 3 种碱基。
/// 非 ACGT 位置（简并码）保持不变。
pub fn single_substitutions(motif: &[u8]) -> Vec<Vec<u8>> {
    let mut out = Vec::with_capacity(motif.len() * 3);
    for (i, &orig) in motif.iter().enumerate() {
        if !dna::is_acgt(orig) {
            continue;
        }
        for &b in &BASES {
            if b == orig.to_ascii_uppercase() {
                continue;
            }
            let mut v = motif.to_vec();
            v[i] = b;
            out.push(v);
        }
    }
    out
}

/// 生成与 `motif` 相差 1..=`max_edits` 个替换（不含插入/删除）的全部变体。
///
/// d ≥ 2 时对每个 d=1 结果递归应用同一步骤，不同替换路径会产生重复，
/// 去重由调用方（`PatternSet::build`）负责。原始串本身不会出现在结果中。
///
/// 输出规模约为 O((3L)^d)，`max_edits` 的上限由配置校验保证。
pub fn substitution_variants(motif: &[u8], max_edits: usize) -> Vec<Vec<u8>> {
    let mut out = variants_rec(motif, max_edits);
    out.retain(|v| v.as_slice() != motif);
    out
}

/// `substitution_variants` 去重前产生的串数上界：Σ_{k=1..d} (3L)^k。溢出时返回 None。
pub fn variant_bound(len: usize, max_edits: usize) -> Option<usize> {
    let per_level = len.checked_mul(3)?;
    let mut level = 1usize;
    let mut total = 0usize;
    for _ in 0..max_edits {
        level = level.checked_mul(per_level)?;
        total = total.checked_add(level)?;
    }
    Some(total)
}

fn variants_rec(motif: &[u8], depth: usize) -> Vec<Vec<u8>> {
    if depth == 0 {
        return Vec::new();
    }
    let level = single_substitutions(motif);
    if depth == 1 {
        return level;
    }
    let mut out = level.clone();
    for v in &level {
        out.extend(variants_rec(v, depth - 1));
    }
    out
}
