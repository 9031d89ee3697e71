use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A validated price bound: finite and non-negative.
///
/// Backed by `f64` so it compares directly against product prices, but
/// hashable and totally ordered so it can live inside a [`QueryKey`].
///
/// [`QueryKey`]: crate::catalog::QueryKey
#[derive(Debug, Clone, Copy)]
pub struct Price(f64);

impl Price {
    /// Returns `None` for negative, NaN or infinite input.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && value >= 0.0 {
            // -0.0 + 0.0 == +0.0, keeps hashing consistent with equality
            Some(Self(value + 0.0))
        } else {
            None
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Price {}

impl Hash for Price {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
