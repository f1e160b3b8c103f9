use std::fmt::Debug;

/// Trait for the relationship kind deciding which candidates of a query are neighbors of its
/// origin.
pub trait NeighborKind: Copy + Default + Debug + Send + Sync + 'static {
    /// Name of the kind.
    const NAME: &'static str;

    /// Returns `true` if `candidate`, found by the query of `origin`, is kept as its neighbor.
    fn keep(origin: usize, candidate: usize) -> bool;
}

/// Every pair is stored twice, once for each particle.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct FullNeighbor;

/// Every pair is stored once, by the particle with the larger index.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct HalfNeighbor;

impl NeighborKind for FullNeighbor {
    const NAME: &'static str = "full";

    #[inline]
    fn keep(origin: usize, candidate: usize) -> bool {
        candidate != origin
    }
}

impl NeighborKind for HalfNeighbor {
    const NAME: &'static str = "half";

    #[inline]
    fn keep(origin: usize, candidate: usize) -> bool {
        origin > candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_is_never_kept() {
        for i in 0..10 {
            assert!(!FullNeighbor::keep(i, i));
            assert!(!HalfNeighbor::keep(i, i));
        }
    }

    #[test]
    fn half_keeps_one_side_of_each_pair() {
        for i in 0..10 {
            for j in (0..10).filter(|&j| j != i) {
                assert!(FullNeighbor::keep(i, j));
                assert_ne!(HalfNeighbor::keep(i, j), HalfNeighbor::keep(j, i));
            }
        }
        assert!(HalfNeighbor::keep(3, 2));
        assert!(!HalfNeighbor::keep(2, 3));
    }
}
