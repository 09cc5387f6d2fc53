use std::ops::Add;

use super::{Chain, Sequence, SimpleSelector};

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// `(ids, classes/attributes/pseudo-classes, tags/pseudo-elements)`, compared
/// component by component. The universal selector counts nowhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }

    /// Pack the three components into one integer, `a * 10^14 + b * 10^8 + c`.
    ///
    /// Ordering is preserved as long as `c < 10^8`, `b < 10^6` and
    /// `a < 184_467`. Larger values saturate at `u64::MAX`.
    #[must_use]
    pub fn value(self) -> u64 {
        u64::from(self.0)
            .saturating_mul(100_000_000_000_000)
            .saturating_add(u64::from(self.1) * 100_000_000)
            .saturating_add(u64::from(self.2))
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(
            self.0.saturating_add(rhs.0),
            self.1.saturating_add(rhs.1),
            self.2.saturating_add(rhs.2),
        )
    }
}

impl SimpleSelector {
    /// This selector's contribution to the specificity of its sequence.
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        match self {
            Self::Id(_) => Specificity(1, 0, 0),
            Self::Class(_) | Self::Attr(_) | Self::PseudoClass(_) => Specificity(0, 1, 0),
            Self::Tag(_) | Self::PseudoElement(_) => Specificity(0, 0, 1),
            Self::Universal => Specificity(0, 0, 0),
        }
    }
}

impl Sequence {
    /// Sum over the simple selectors.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.simple_selectors
            .iter()
            .map(SimpleSelector::specificity)
            .fold(Specificity::default(), Add::add)
    }
}

impl Chain {
    /// Sum over the head and every link's sequence.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.tail
            .iter()
            .map(|link| link.sequence.specificity())
            .fold(self.head.specificity(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_encoding() {
        assert_eq!(Specificity(0, 0, 0).value(), 0);
        assert_eq!(Specificity(0, 0, 7).value(), 7);
        assert_eq!(Specificity(0, 2, 0).value(), 200_000_000);
        assert_eq!(Specificity(1, 0, 0).value(), 100_000_000_000_000);
    }

    #[test]
    fn test_value_saturates_for_huge_id_counts() {
        assert_eq!(Specificity(200_000, 0, 0).value(), u64::MAX);
        assert_eq!(Specificity(u32::MAX, u32::MAX, u32::MAX).value(), u64::MAX);
        assert!(Specificity(184_466, 0, 0).value() < u64::MAX);
    }

    #[test]
    fn test_chain_specificity() {
        let (chain, _) = crate::parse_selector("ul#nav li.active a[href]::before").unwrap();
        assert_eq!(chain.specificity(), Specificity(1, 2, 4));
    }

    #[test]
    fn test_universal_counts_nowhere() {
        let (chain, _) = crate::parse_selector("* > *").unwrap();
        assert_eq!(chain.specificity(), Specificity::default());
    }
}
