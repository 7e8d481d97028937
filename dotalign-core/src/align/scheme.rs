use serde::{Deserialize, Serialize};

use super::{AlignError, AlignResult};

/// Absolute part of the tolerance applied to fractional schemes.
const ABSOLUTE_EPSILON: f64 = 1e-9;
/// Relative part of the tolerance applied to fractional schemes.
const RELATIVE_EPSILON: f64 = 1e-12;

/// Linear-gap scoring parameters for one alignment request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringScheme {
    /// Reward for two identical aligned symbols
    pub match_score: f64,
    /// Cost for two differing aligned symbols, usually negative
    pub mismatch_penalty: f64,
    /// Cost for a symbol aligned against a gap, usually negative
    pub gap_penalty: f64,
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self {
            match_score: 5.0,
            mismatch_penalty: -2.0,
            gap_penalty: -4.0,
        }
    }
}

impl ScoringScheme {
    pub fn new(match_score: f64, mismatch_penalty: f64, gap_penalty: f64) -> Self {
        Self {
            match_score,
            mismatch_penalty,
            gap_penalty,
        }
    }

    /// Unit edit scoring: +1 match, -1 mismatch, -1 gap.
    pub fn unit() -> Self {
        Self::new(1.0, -1.0, -1.0)
    }

    /// Reject non-finite parameters before any matrix is built.
    pub fn validate(&self) -> AlignResult<()> {
        let fields = [
            ("match_score", self.match_score),
            ("mismatch_penalty", self.mismatch_penalty),
            ("gap_penalty", self.gap_penalty),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(AlignError::InvalidScheme(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Score for aligning `a` against `b` on the diagonal.
    #[inline]
    pub fn substitution(&self, a: u8, b: u8) -> f64 {
        if a == b {
            self.match_score
        } else {
            self.mismatch_penalty
        }
    }

    /// True when every parameter is a whole number, so all matrix sums are exact.
    pub fn is_integral(&self) -> bool {
        self.parameters().iter().all(|v| v.fract() == 0.0)
    }

    /// Equality used when a re-derived candidate is compared with a stored cell.
    ///
    /// Integral schemes compare with `==`. Fractional schemes allow an
    /// absolute-plus-relative tolerance, capped below the smallest nonzero gap
    /// between scheme parameters.
    #[inline]
    pub fn scores_equal(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        if self.is_integral() {
            return false;
        }
        (a - b).abs() <= self.tolerance(a.abs().max(b.abs()))
    }

    fn tolerance(&self, scale: f64) -> f64 {
        let tolerance = ABSOLUTE_EPSILON + RELATIVE_EPSILON * scale;
        match self.resolution() {
            Some(resolution) => tolerance.min(resolution / 4.0),
            None => tolerance,
        }
    }

    /// Smallest nonzero distance between any two parameters or between a parameter and zero.
    fn resolution(&self) -> Option<f64> {
        let params = self.parameters();
        let mut smallest: Option<f64> = None;
        for (idx, &p) in params.iter().enumerate() {
            let others = params[idx + 1..].iter().map(|&q| (p - q).abs());
            for diff in std::iter::once(p.abs()).chain(others) {
                if diff > 0.0 {
                    smallest = Some(smallest.map_or(diff, |s| s.min(diff)));
                }
            }
        }
        smallest
    }

    fn parameters(&self) -> [f64; 3] {
        [self.match_score, self.mismatch_penalty, self.gap_penalty]
    }
}
