//! # Certainty Combiner
//! Pairwise certainty-factor (CF) algebra folded left-to-right over a
//! sequence of CFs. Pure and deterministic; no I/O.
//!
//! Rules for one step `(acc, cf)`:
//! - both non-negative: `acc + cf * (1 - acc)`
//! - both negative:     `acc + cf * (1 + acc)`
//! - mixed sign:        `(acc + cf) / (1 - min(|acc|, |cf|))`
//!
//! Folding order is part of the contract: callers pass CFs in the fixed
//! feature order so results stay bit-for-bit reproducible.

use thiserror::Error;

/// Failures of the CF algebra.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CfError {
    /// `combine` needs at least one CF; the algebra has no identity element.
    #[error("invalid input: cannot combine an empty sequence of certainty factors")]
    EmptyInput,
    /// Mixed-sign step whose denominator `1 - min(|acc|, |cf|)` is zero
    /// (e.g. `+1` against `-1`). The result is undefined, so it is reported
    /// instead of producing an infinite or NaN CF.
    #[error("degenerate combination: {acc} with {cf} divides by zero")]
    DegenerateCombination { acc: f64, cf: f64 },
}

/// Combine two CFs with the sign-aware rule.
pub fn combine_pair(acc: f64, cf: f64) -> Result<f64, CfError> {
    if acc >= 0.0 && cf >= 0.0 {
        Ok(acc + cf * (1.0 - acc))
    } else if acc < 0.0 && cf < 0.0 {
        Ok(acc + cf * (1.0 + acc))
    } else if acc.is_nan() || cf.is_nan() {
        // f64::min would drop the NaN and could report a unit step as degenerate.
        Ok(f64::NAN)
    } else {
        let denom = 1.0 - acc.abs().min(cf.abs());
        if denom == 0.0 {
            return Err(CfError::DegenerateCombination { acc, cf });
        }
        Ok((acc + cf) / denom)
    }
}

/// Left fold of `combine_pair` over `cfs`.
///
/// A single CF is returned unchanged. A NaN anywhere in `cfs` makes the result
/// NaN, even next to a unit-magnitude CF.
pub fn combine(cfs: &[f64]) -> Result<f64, CfError> {
    let (&first, rest) = cfs.split_first().ok_or(CfError::EmptyInput)?;
    rest.iter().try_fold(first, |acc, &cf| combine_pair(acc, cf))
}
