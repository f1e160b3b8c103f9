use crate::{
    index::{RootedOrthtree, SpatialIndex},
    neighbor::{CrsGraph, NeighborKind},
    position::Coordinates,
    predicate::{make_predicates, Attached, Predicates},
    tree::Real,
    ExecutionSpace,
};
use tracing::{debug, debug_span, trace};

/// Builds the neighbor list of the particles `[first, last)` using a [`RootedOrthtree`].
///
/// See [`make_neighbor_list_with`].
///
/// # Example
///
/// ```
/// use particulate::prelude::*;
///
/// let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.5, 0.0, 0.0]];
/// let list = make_neighbor_list(&Serial, FullNeighbor, points.as_slice(), 0, 3, 1.5);
///
/// assert_eq!(list.neighbor_count(0), 1);
/// assert_eq!(list.neighbor(0, 0), 1);
/// assert_eq!(list.neighbor_count(1), 2);
/// assert_eq!(list.neighbor_count(2), 1);
/// assert_eq!(list.neighbors(2), &[1]);
/// ```
#[inline]
pub fn make_neighbor_list<E, K, C>(
    space: &E,
    kind: K,
    coordinates: &C,
    first: usize,
    last: usize,
    radius: C::Scalar,
) -> CrsGraph<K>
where
    E: ExecutionSpace,
    K: NeighborKind,
    C: Coordinates + ?Sized,
{
    make_neighbor_list_with::<RootedOrthtree<C::Scalar>, _, _, _>(
        space,
        kind,
        coordinates,
        first,
        last,
        radius,
    )
}

/// Builds the neighbor list of the particles `[first, last)` using the spatial index `I`.
///
/// Every particle of the coordinate source is a candidate. A candidate `j` found within `radius`
/// of particle `i`, the boundary included, is stored in the row of `i` when the kind keeps it.
/// The rows are filled in parallel on the given execution space. A radius that is not positive
/// yields a list without neighbors.
///
/// # Panics
///
/// Panics if `first > last` or if `last` is greater than the number of particles.
pub fn make_neighbor_list_with<I, E, K, C>(
    space: &E,
    kind: K,
    coordinates: &C,
    first: usize,
    last: usize,
    radius: C::Scalar,
) -> CrsGraph<K>
where
    I: SpatialIndex<C::Scalar>,
    E: ExecutionSpace,
    K: NeighborKind,
    C: Coordinates + ?Sized,
{
    let total = coordinates.len();
    assert!(
        first <= last && last <= total,
        "invalid particle range {first}..{last} for {total} particles"
    );

    let _span = debug_span!(
        "make_neighbor_list",
        kind = K::NAME,
        first,
        last,
        particles = total
    )
    .entered();

    if !is_positive(radius) {
        trace!(?radius, "no neighbors within a non-positive radius");
        return CrsGraph::empty(last - first, first, total);
    }

    let index = I::new(space, coordinates);
    let predicates = make_predicates(coordinates, first, last, radius);
    let (column_indices, row_offsets) = query(space, &index, &predicates, kind);

    debug!(neighbors = column_indices.len(), "assembled neighbor list");

    CrsGraph::from_parts(column_indices, row_offsets, first, index.size())
}

#[inline]
fn is_positive<S: Real>(radius: S) -> bool {
    radius > S::default()
}

/// Counts the kept candidates of every predicate, then fills every row in its own slice of the
/// column indices.
fn query<I, E, K, C>(
    space: &E,
    index: &I,
    predicates: &Predicates<'_, C>,
    _kind: K,
) -> (Vec<usize>, Vec<usize>)
where
    I: SpatialIndex<C::Scalar>,
    E: ExecutionSpace,
    K: NeighborKind,
    C: Coordinates + ?Sized,
{
    let counts = debug_span!("count_pass").in_scope(|| {
        space.map_indices(predicates.len(), |i| {
            let Attached { predicate, data } = predicates.get(i);
            let mut count = 0;
            index.intersects(&predicate, |j| {
                if K::keep(data, j) {
                    count += 1;
                }
            });
            count
        })
    });

    let mut row_offsets = Vec::with_capacity(counts.len() + 1);
    row_offsets.push(0);
    row_offsets.extend(counts.iter().scan(0, |offset, &count| {
        *offset += count;
        Some(*offset)
    }));

    let mut column_indices = vec![0; row_offsets[counts.len()]];
    let mut rows = Vec::with_capacity(counts.len());
    let mut rest = column_indices.as_mut_slice();
    for &count in &counts {
        let (row, tail) = std::mem::take(&mut rest).split_at_mut(count);
        rows.push(row);
        rest = tail;
    }

    let _span = debug_span!("fill_pass").entered();
    space.for_each_mut(&mut rows, |i, row| {
        let Attached { predicate, data } = predicates.get(i);
        let mut filled = 0;
        index.intersects(&predicate, |j| {
            if K::keep(data, j) {
                row[filled] = j;
                filled += 1;
            }
        });
        debug_assert_eq!(filled, row.len());
    });

    (column_indices, row_offsets)
}
