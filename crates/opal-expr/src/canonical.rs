//! Canonicalization: reduce a raw term sequence to its unique sparse form.
//!
//! One entry per distinct variable (or variable pair), sorted by key, exact
//! zero coefficients dropped. Stable sort + adjacent merge keeps the whole
//! pass at O(k log k) in the number of raw terms and makes the result a
//! fixed point: canonicalizing a canonical sequence reproduces it.

use crate::ids::VariableId;
use crate::seq::{BilinearSeq, LinearSeq, QuadSeq};

/// Canonical sparse form of a linear term sequence.
pub fn canonical_linear(seq: &LinearSeq) -> Vec<(VariableId, f64)> {
    let mut terms = seq.to_terms();
    terms.sort_by_key(|(var, _)| *var);
    merge_sorted(&mut terms, |t| t.0, |t| t.1, |(var, coef)| (var, coef));
    terms
}

/// Canonical sparse form of a quadratic term sequence. Pairs are normalized
/// to `(min(u, v), max(u, v))` before sorting and merging.
pub fn canonical_quadratic(seq: &QuadSeq) -> Vec<(VariableId, VariableId, f64)> {
    let mut terms: Vec<(VariableId, VariableId, f64)> = Vec::with_capacity(seq.len_hint());
    seq.for_each(&mut |u, v, coef| {
        if u <= v {
            terms.push((u, v, coef));
        } else {
            terms.push((v, u, coef));
        }
    });
    terms.sort_by_key(|(u, v, _)| (*u, *v));
    merge_sorted(&mut terms, |t| (t.0, t.1), |t| t.2, |((u, v), coef)| (u, v, coef));
    terms
}

/// Canonical sparse form of a bilinear term sequence. The `(left, right)`
/// key is role-ordered; no symmetrization is applied.
pub fn canonical_bilinear(seq: &BilinearSeq) -> Vec<(VariableId, VariableId, f64)> {
    let mut terms = seq.to_terms();
    terms.sort_by_key(|(l, r, _)| (*l, *r));
    merge_sorted(&mut terms, |t| (t.0, t.1), |t| t.2, |((l, r), coef)| (l, r, coef));
    terms
}

// Left-to-right scan over sorted entries: sum runs of equal keys, drop exact
// zeros, truncate to the surviving prefix.
fn merge_sorted<T: Copy, K: PartialEq + Copy>(
    terms: &mut Vec<T>,
    key: impl Fn(&T) -> K,
    coef: impl Fn(&T) -> f64,
    rebuild: impl Fn((K, f64)) -> T,
) {
    let mut write = 0usize;
    let mut read = 0usize;
    let len = terms.len();
    while read < len {
        let k = key(&terms[read]);
        let mut sum = coef(&terms[read]);
        read += 1;
        while read < len && key(&terms[read]) == k {
            sum += coef(&terms[read]);
            read += 1;
        }
        if sum != 0.0 {
            terms[write] = rebuild((k, sum));
            write += 1;
        }
    }
    terms.truncate(write);
}
