//! Mixed-radix traversal of a Cartesian grid.
//!
//! A multi-index `(i_1, ..., i_d)` with `i_k in [0, n_k)` is encoded as a
//! single integer whose digits have per-axis bases, most significant axis
//! first. The counter walks every cell exactly once, odometer style, and
//! reports overflow when it wraps back to zero.

use crate::error::{CalcError, Result};

/// Odometer over a fixed digit array, one digit per axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridIndex {
    bases: Vec<usize>,
    digits: Vec<usize>,
    radix: usize,
    len: usize,
}

impl GridIndex {
    /// Creates a counter at zero. Every base must be positive and their
    /// product must fit in a `usize`.
    pub fn new(bases: Vec<usize>) -> Result<Self> {
        if bases.is_empty() {
            return Err(CalcError::InvalidGeometry(
                "grid needs at least one axis".to_string(),
            ));
        }
        let mut len = 1usize;
        for &base in &bases {
            if base == 0 {
                return Err(CalcError::InvalidGeometry(
                    "grid axis has no subdivisions".to_string(),
                ));
            }
            len = len.checked_mul(base).ok_or_else(|| {
                CalcError::InvalidGeometry("grid has too many cells".to_string())
            })?;
        }

        let mut digits = Vec::new();
        digits.try_reserve_exact(bases.len())?;
        digits.resize(bases.len(), 0);

        Ok(Self {
            bases,
            digits,
            radix: 0,
            len,
        })
    }

    pub fn dimension(&self) -> usize {
        self.bases.len()
    }

    /// Total number of multi-indices, `prod(n_i)`.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bases(&self) -> &[usize] {
        &self.bases
    }

    /// Current multi-index.
    pub fn digits(&self) -> &[usize] {
        &self.digits
    }

    /// Current encoded value.
    pub fn radix(&self) -> usize {
        self.radix
    }

    /// Writes the digits of `radix` into `out`, most significant axis first.
    pub fn decode(&self, radix: usize, out: &mut [usize]) -> Result<()> {
        if radix >= self.len {
            return Err(CalcError::IndexOutOfBounds {
                index: radix,
                limit: self.len,
            });
        }
        if out.len() != self.bases.len() {
            return Err(CalcError::InvalidGeometry(format!(
                "digit buffer has length {}, grid has {} axes",
                out.len(),
                self.bases.len()
            )));
        }
        self.decode_unchecked(radix, out);
        Ok(())
    }

    fn decode_unchecked(&self, radix: usize, out: &mut [usize]) {
        let mut rest = radix;
        for (slot, &base) in out.iter_mut().zip(&self.bases).rev() {
            *slot = rest % base;
            rest /= base;
        }
    }

    /// Every multi-index in counting order, without touching the counter.
    pub fn iter(&self) -> impl Iterator<Item = Vec<usize>> + '_ {
        (0..self.len).map(move |radix| {
            let mut digits = vec![0; self.bases.len()];
            self.decode_unchecked(radix, &mut digits);
            digits
        })
    }

    /// Inverse of [`GridIndex::decode`].
    pub fn encode(&self, digits: &[usize]) -> Result<usize> {
        if digits.len() != self.bases.len() {
            return Err(CalcError::InvalidGeometry(format!(
                "multi-index has {} digits, grid has {} axes",
                digits.len(),
                self.bases.len()
            )));
        }
        let mut radix = 0usize;
        for (&digit, &base) in digits.iter().zip(&self.bases) {
            if digit >= base {
                return Err(CalcError::IndexOutOfBounds {
                    index: digit,
                    limit: base,
                });
            }
            radix = radix * base + digit;
        }
        Ok(radix)
    }

    /// Advances to the next multi-index, carrying into more significant axes.
    ///
    /// Returns `false` when the last cell has been passed; the counter is
    /// then back at zero.
    pub fn increment(&mut self) -> bool {
        for (digit, &base) in self.digits.iter_mut().zip(&self.bases).rev() {
            *digit += 1;
            if *digit < base {
                self.radix += 1;
                return true;
            }
            *digit = 0;
        }
        self.radix = 0;
        false
    }

    /// Rewinds the counter to zero.
    pub fn reset(&mut self) {
        self.digits.iter_mut().for_each(|d| *d = 0);
        self.radix = 0;
    }

    /// Visits every multi-index in counting order.
    pub fn for_each<F>(&mut self, mut visit: F) -> Result<()>
    where
        F: FnMut(&[usize]) -> Result<()>,
    {
        self.reset();
        loop {
            visit(&self.digits)?;
            if !self.increment() {
                return Ok(());
            }
        }
    }
}
