//! Generalized Fibonacci sequence over a pair of 16-bit seeds.
//!
//! Term 1 is the second seed `b`, term 2 is `a + b`, and every later term is
//! the sum of the two before it. Under [`ValidationPolicy::Strict`] seeds are
//! checked on every write and generation stops with
//! [`FibonacciError::RangeExceeded`] as soon as a term passes the bound. Under
//! [`ValidationPolicy::Lenient`] nothing is checked and terms wrap at 16 bits.

use log::{debug, trace};
use serde::Serialize;

use crate::config::GeneratorConfig;
use crate::error::{FibonacciError, Param, Result};

/// Largest term a strict generator may produce unless configured otherwise.
pub const DEFAULT_MAX_VALUE: u32 = 1_073_731_823;
pub const DEFAULT_TIMEOUT: u16 = 10;
/// Value written to every field by a lenient `clear`.
pub const CLEAR_SENTINEL: u16 = 42;

/// A single value of the sequence.
pub type Term = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Seeds ordered and bounded, `N >= 1`, terms bounded by `max_value`.
    #[default]
    Strict,
    /// No checks, `N == 0` yields `a`, 16-bit wrapping arithmetic.
    Lenient,
}

impl ValidationPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ValidationPolicy::Strict
        } else {
            ValidationPolicy::Lenient
        }
    }

    pub fn is_strict(self) -> bool {
        self == ValidationPolicy::Strict
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fibonacci {
    a: u16,
    b: u16,
    max_value: u32,
    timeout: u16,
    policy: ValidationPolicy,
}

impl Fibonacci {
    /// Strict generator with the default bound.
    pub fn new(a: u16, b: u16) -> Result<Self> {
        Self::with_config(a, b, &GeneratorConfig::default())
    }

    pub fn with_config(a: u16, b: u16, config: &GeneratorConfig) -> Result<Self> {
        let policy = config.policy();
        if policy.is_strict() {
            check_seeds(a, b, config.max_value, Param::B)?;
        }
        debug!(
            "Constructed {:?} generator with a={}, b={}, max_value={}",
            policy, a, b, config.max_value
        );
        Ok(Self {
            a,
            b,
            max_value: config.max_value,
            timeout: config.timeout,
            policy,
        })
    }

    pub fn a(&self) -> u16 {
        self.a
    }

    pub fn b(&self) -> u16 {
        self.b
    }

    pub fn timeout(&self) -> u16 {
        self.timeout
    }

    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Replaces the first seed and returns it.
    ///
    /// A strict generator applies the same checks as construction and leaves
    /// the seed untouched when they fail.
    pub fn set_a(&mut self, a: u16) -> Result<u16> {
        if self.policy.is_strict() {
            check_seeds(a, self.b, self.max_value, Param::A)?;
        }
        self.a = a;
        Ok(a)
    }

    pub fn clear(&mut self) {
        match self.policy {
            ValidationPolicy::Strict => {
                self.a = 0;
                self.b = 0;
            }
            ValidationPolicy::Lenient => {
                self.a = CLEAR_SENTINEL;
                self.b = CLEAR_SENTINEL;
                self.timeout = CLEAR_SENTINEL;
            }
        }
        trace!("Cleared {:?} generator", self.policy);
    }

    /// Returns the `n`-th term without touching the stored seeds.
    pub fn generate(&self, n: u16) -> Result<Term> {
        self.walk(n, |_| {})
    }

    /// Returns terms `1..=n`. The last element is `generate(n)`.
    pub fn sequence(&self, n: u16) -> Result<Vec<Term>> {
        let mut terms = Vec::with_capacity(usize::from(n.max(1)));
        self.walk(n, |term| terms.push(term))?;
        Ok(terms)
    }

    fn walk(&self, n: u16, mut emit: impl FnMut(Term)) -> Result<Term> {
        match self.policy {
            ValidationPolicy::Strict => {
                if n == 0 {
                    return Err(FibonacciError::invalid(Param::N));
                }
                let bound = u64::from(self.max_value);
                let mut aa = Term::from(self.a);
                let mut bb = Term::from(self.b);
                emit(bb);
                for step in 2..=n {
                    let cc = u64::from(aa) + u64::from(bb);
                    if cc > bound {
                        debug!("Term {} exceeds bound {}", step, self.max_value);
                        return Err(FibonacciError::RangeExceeded {
                            step,
                            bound: self.max_value,
                        });
                    }
                    aa = bb;
                    // cc <= max_value, so it fits
                    bb = cc as Term;
                    emit(bb);
                }
                Ok(bb)
            }
            ValidationPolicy::Lenient => {
                if n == 0 {
                    let a = Term::from(self.a);
                    emit(a);
                    return Ok(a);
                }
                let mut aa = self.a;
                let mut bb = self.b;
                emit(Term::from(bb));
                for _ in 2..=n {
                    let cc = aa.wrapping_add(bb);
                    aa = bb;
                    bb = cc;
                    emit(Term::from(bb));
                }
                Ok(Term::from(bb))
            }
        }
    }
}

impl Default for Fibonacci {
    fn default() -> Self {
        let config = GeneratorConfig::default();
        Self {
            a: 0,
            b: 0,
            max_value: config.max_value,
            timeout: config.timeout,
            policy: config.policy(),
        }
    }
}

/// Seed invariant shared by construction and `set_a`: `a <= b`, both within
/// the bound. `ordering` names the argument blamed when `b < a`.
fn check_seeds(a: u16, b: u16, max_value: u32, ordering: Param) -> Result<()> {
    if b < a {
        return Err(FibonacciError::invalid(ordering));
    }
    if u32::from(a) > max_value {
        return Err(FibonacciError::invalid(Param::A));
    }
    if u32::from(b) > max_value {
        return Err(FibonacciError::invalid(Param::B));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient() -> GeneratorConfig {
        GeneratorConfig {
            strict: false,
            ..GeneratorConfig::default()
        }
    }

    fn bounded(max_value: u32) -> GeneratorConfig {
        GeneratorConfig {
            max_value,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn first_terms() {
        let fib = Fibonacci::new(3, 5).unwrap();
        assert_eq!(fib.generate(1), Ok(5));
        assert_eq!(fib.generate(2), Ok(8));
        assert_eq!(fib.generate(3), Ok(13));
        assert_eq!(fib.generate(4), Ok(21));
    }

    #[test]
    fn standard_sequence() {
        let fib = Fibonacci::new(0, 1).unwrap();
        assert_eq!(fib.generate(10), Ok(55));
        assert_eq!(fib.generate(24), Ok(46_368));
        // past u16, still inside the default bound
        assert_eq!(fib.generate(30), Ok(832_040));
    }

    #[test]
    fn generate_does_not_mutate() {
        let fib = Fibonacci::new(2, 7).unwrap();
        let first = fib.generate(12);
        assert_eq!(fib.generate(12), first);
        assert_eq!((fib.a(), fib.b()), (2, 7));
    }

    #[test]
    fn strict_rejects_zero_terms() {
        let fib = Fibonacci::new(1, 2).unwrap();
        assert_eq!(
            fib.generate(0),
            Err(FibonacciError::InvalidArgument { param: Param::N })
        );
    }

    #[test]
    fn strict_rejects_unordered_seeds() {
        assert_eq!(
            Fibonacci::new(5, 2),
            Err(FibonacciError::InvalidArgument { param: Param::B })
        );
    }

    #[test]
    fn strict_rejects_seeds_above_bound() {
        assert_eq!(
            Fibonacci::with_config(200, 300, &bounded(100)),
            Err(FibonacciError::InvalidArgument { param: Param::A })
        );
        assert_eq!(
            Fibonacci::with_config(50, 300, &bounded(100)),
            Err(FibonacciError::InvalidArgument { param: Param::B })
        );
    }

    #[test]
    fn strict_stops_at_bound() {
        let fib = Fibonacci::new(0, 1).unwrap();
        // F(44) = 701_408_733 fits, F(45) = 1_134_903_170 does not
        assert_eq!(fib.generate(44), Ok(701_408_733));
        assert_eq!(
            fib.generate(45),
            Err(FibonacciError::RangeExceeded {
                step: 45,
                bound: DEFAULT_MAX_VALUE
            })
        );
        assert!(fib.generate(u16::MAX).is_err());
    }

    #[test]
    fn bound_is_inclusive() {
        let fib = Fibonacci::with_config(0, 1, &bounded(55)).unwrap();
        assert_eq!(fib.generate(10), Ok(55));
        assert!(matches!(
            fib.generate(11),
            Err(FibonacciError::RangeExceeded { step: 11, bound: 55 })
        ));
    }

    #[test]
    fn wide_bound_does_not_overflow() {
        let fib = Fibonacci::with_config(0, 1, &bounded(u32::MAX)).unwrap();
        // F(47) = 2_971_215_073 is the last term below 2^32
        assert_eq!(fib.generate(47), Ok(2_971_215_073));
        assert!(fib.generate(48).is_err());
    }

    #[test]
    fn strict_clear_zeroes_seeds() {
        let mut fib = Fibonacci::new(4, 9).unwrap();
        fib.clear();
        assert_eq!((fib.a(), fib.b()), (0, 0));
        assert_eq!(fib.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(fib.generate(20), Ok(0));
    }

    #[test]
    fn strict_set_a_shares_seed_checks() {
        let mut fib = Fibonacci::new(1, 10).unwrap();
        assert_eq!(fib.set_a(10), Ok(10));
        assert_eq!(fib.a(), 10);
        assert_eq!(
            fib.set_a(11),
            Err(FibonacciError::InvalidArgument { param: Param::A })
        );
        assert_eq!(fib.a(), 10);
    }

    #[test]
    fn lenient_accepts_anything() {
        let mut fib = Fibonacci::with_config(5, 2, &lenient()).unwrap();
        assert_eq!(fib.set_a(900), Ok(900));
        assert_eq!(fib.a(), 900);
        assert_eq!(fib.generate(2), Ok(902));
    }

    #[test]
    fn lenient_zero_terms_yields_first_seed() {
        let fib = Fibonacci::with_config(7, 9, &lenient()).unwrap();
        assert_eq!(fib.generate(0), Ok(7));
        assert_eq!(fib.sequence(0), Ok(vec![7]));
    }

    #[test]
    fn lenient_wraps_at_sixteen_bits() {
        let fib = Fibonacci::with_config(0, 1, &lenient()).unwrap();
        // F(25) = 75_025 wraps to 9_489
        assert_eq!(fib.generate(25), Ok(75_025 - 65_536));
    }

    #[test]
    fn lenient_clear_writes_sentinel() {
        let mut fib = Fibonacci::with_config(1, 2, &lenient()).unwrap();
        assert_eq!(fib.timeout(), DEFAULT_TIMEOUT);
        fib.clear();
        assert_eq!((fib.a(), fib.b(), fib.timeout()), (42, 42, 42));
        assert_eq!(fib.generate(2), Ok(84));
    }

    #[test]
    fn sequence_lists_every_term() {
        let fib = Fibonacci::new(0, 1).unwrap();
        assert_eq!(fib.sequence(6), Ok(vec![1, 1, 2, 3, 5, 8]));
        assert!(fib.sequence(0).is_err());
    }

    #[test]
    fn default_is_strict_zero_seeds() {
        let fib = Fibonacci::default();
        assert_eq!(fib.policy(), ValidationPolicy::Strict);
        assert_eq!((fib.a(), fib.b()), (0, 0));
        assert_eq!(fib.max_value(), DEFAULT_MAX_VALUE);
    }
}
