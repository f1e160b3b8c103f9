use crate::{error::NeighborError, neighbor::NeighborKind};
use std::marker::PhantomData;

/// Uniform read access to a neighbor list.
pub trait NeighborList {
    /// Returns the number of neighbors of the given particle.
    ///
    /// Particles outside of the range the list was built for have no neighbors. The particle must
    /// be lower than the number of particles the list was built over, which is only checked in
    /// debug builds.
    fn neighbor_count(&self, particle: usize) -> usize;

    /// Returns the `neighbor`-th neighbor of the given particle.
    ///
    /// `neighbor` must be lower than [`NeighborList::neighbor_count`], which is only checked in
    /// debug builds.
    fn neighbor(&self, particle: usize, neighbor: usize) -> usize;
}

/// Neighbor list stored as a compressed row graph.
///
/// Row `p - shift` holds the neighbors of particle `p` for `p` in the range the list was built
/// for. The kind `K` the list was built with is part of its type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrsGraph<K> {
    column_indices: Vec<usize>,
    row_offsets: Vec<usize>,
    shift: usize,
    total: usize,
    kind: PhantomData<K>,
}

impl<K: NeighborKind> CrsGraph<K> {
    /// Creates a new [`CrsGraph`] from its raw parts.
    ///
    /// # Panics
    ///
    /// Panics if `row_offsets` is empty, not sorted, does not start with `0` or does not end with
    /// the number of column indices.
    pub fn from_parts(
        column_indices: Vec<usize>,
        row_offsets: Vec<usize>,
        shift: usize,
        total: usize,
    ) -> Self {
        assert_eq!(row_offsets.first(), Some(&0), "row offsets must start at 0");
        assert_eq!(row_offsets.last(), Some(&column_indices.len()));
        assert!(row_offsets.windows(2).all(|w| w[0] <= w[1]));

        Self {
            column_indices,
            row_offsets,
            shift,
            total,
            kind: PhantomData,
        }
    }

    /// Returns an empty list of `rows` rows starting at particle `shift`.
    pub(crate) fn empty(rows: usize, shift: usize, total: usize) -> Self {
        Self::from_parts(Vec::new(), vec![0; rows + 1], shift, total)
    }

    #[inline]
    fn row(&self, particle: usize) -> Option<usize> {
        particle
            .checked_sub(self.shift)
            .filter(|&row| row < self.rows())
    }

    /// Returns the number of rows, the size of the range the list was built for.
    #[inline]
    pub fn rows(&self) -> usize {
        self.row_offsets.len() - 1
    }

    /// Returns the neighbors of the given particle, empty outside of the built range.
    #[inline]
    pub fn neighbors(&self, particle: usize) -> &[usize] {
        match self.row(particle) {
            Some(row) => &self.column_indices[self.row_offsets[row]..self.row_offsets[row + 1]],
            None => &[],
        }
    }

    /// Returns the total number of stored neighbors.
    #[inline]
    pub fn total_neighbors(&self) -> usize {
        self.column_indices.len()
    }

    /// Returns the concatenated rows.
    #[inline]
    pub fn column_indices(&self) -> &[usize] {
        &self.column_indices
    }

    /// Returns the offsets of the rows in [`CrsGraph::column_indices`].
    #[inline]
    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }

    /// Returns the first particle of the built range.
    #[inline]
    pub fn shift(&self) -> usize {
        self.shift
    }

    /// Returns the number of particles the list was built over.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Checked version of [`NeighborList::neighbor_count`].
    pub fn try_neighbor_count(&self, particle: usize) -> Result<usize, NeighborError> {
        if particle >= self.total {
            return Err(NeighborError::ParticleOutOfRange {
                particle,
                total: self.total,
            });
        }

        Ok(self.neighbors(particle).len())
    }

    /// Checked version of [`NeighborList::neighbor`].
    pub fn try_neighbor(&self, particle: usize, neighbor: usize) -> Result<usize, NeighborError> {
        let count = self.try_neighbor_count(particle)?;

        self.neighbors(particle)
            .get(neighbor)
            .copied()
            .ok_or(NeighborError::NeighborOutOfRange {
                particle,
                neighbor,
                count,
            })
    }
}

impl<K: NeighborKind> NeighborList for CrsGraph<K> {
    #[inline]
    fn neighbor_count(&self, particle: usize) -> usize {
        debug_assert!(
            particle < self.total,
            "particle {particle} out of {} particles",
            self.total
        );

        self.neighbors(particle).len()
    }

    #[inline]
    fn neighbor(&self, particle: usize, neighbor: usize) -> usize {
        debug_assert!(
            neighbor < self.neighbor_count(particle),
            "neighbor {neighbor} out of the neighbors of particle {particle}"
        );

        let row = particle.wrapping_sub(self.shift);
        self.column_indices[self.row_offsets[row] + neighbor]
    }
}
