use crate::{
    position::Coordinates,
    predicate::Sphere,
    tree::{distance_squared, BoundingBox, Node, NodeID, Orthtree, Real},
    ExecutionSpace,
};

/// Trait for spatial indexes answering sphere queries over a fixed set of points.
pub trait SpatialIndex<S: Real>: Sync + Sized {
    /// Builds a new index over every point of the coordinate source.
    fn new<E, C>(space: &E, coordinates: &C) -> Self
    where
        E: ExecutionSpace,
        C: Coordinates<Scalar = S> + ?Sized;

    /// Returns the number of indexed points.
    fn size(&self) -> usize;

    /// Calls `callback` once with the index of every point within the sphere, the boundary
    /// included. Spheres with a negative or NaN radius contain no point.
    fn intersects<F: FnMut(usize)>(&self, sphere: &Sphere<S>, callback: F);
}

/// Data stored in every node of a [`RootedOrthtree`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cluster<S> {
    /// Tight bounding box of the points of the node.
    pub bbox: BoundingBox<[S; 3]>,
    /// Position of the first point of the node in the reordered points.
    pub start: usize,
    /// Number of points in the node.
    pub len: usize,
}

/// Octree over a reordered copy of the points, every node covering a contiguous range of it.
///
/// Coordinates are expected to be finite.
#[derive(Clone, Debug)]
pub struct RootedOrthtree<S> {
    root: Option<NodeID>,
    tree: Orthtree<8, Cluster<S>>,
    points: Vec<(usize, [S; 3])>,
}

impl<S: Real> RootedOrthtree<S> {
    /// Maximum number of distinct points held by a leaf when using [`SpatialIndex::new`].
    pub const DEFAULT_LEAF_CAPACITY: usize = 8;

    /// Creates a new [`RootedOrthtree`] whose leaves hold at most `leaf_capacity` distinct points.
    pub fn with_leaf_capacity<E, C>(space: &E, coordinates: &C, leaf_capacity: usize) -> Self
    where
        E: ExecutionSpace,
        C: Coordinates<Scalar = S> + ?Sized,
    {
        let leaf_capacity = leaf_capacity.max(1);
        let _span = tracing::debug_span!(
            "orthtree_build",
            points = coordinates.len(),
            leaf_capacity
        )
        .entered();

        let mut points =
            space.map_indices(coordinates.len(), |i| (i, coordinates.coordinates(i)));
        let mut tree =
            Orthtree::<8, Cluster<S>>::with_capacity(points.len().div_ceil(leaf_capacity));
        let root = tree.build_node(
            &mut points,
            leaf_capacity,
            |p: &(usize, [S; 3])| p.1,
            |start, slice: &[(usize, [S; 3])]| Cluster {
                bbox: BoundingBox::with(slice.iter().map(|p| p.1)),
                start,
                len: slice.len(),
            },
        );

        tracing::trace!(nodes = tree.nodes.len(), "built orthtree");

        Self { root, tree, points }
    }

    /// Returns the root of the [`Orthtree`], `None` if there are no points.
    #[inline]
    pub const fn root(&self) -> Option<NodeID> {
        self.root
    }

    /// Returns a reference to the [`Orthtree`].
    #[inline]
    pub const fn get(&self) -> &Orthtree<8, Cluster<S>> {
        &self.tree
    }

    /// Returns the reordered points paired with their original index.
    #[inline]
    pub fn points(&self) -> &[(usize, [S; 3])] {
        &self.points
    }
}

impl<S: Real> SpatialIndex<S> for RootedOrthtree<S> {
    #[inline]
    fn new<E, C>(space: &E, coordinates: &C) -> Self
    where
        E: ExecutionSpace,
        C: Coordinates<Scalar = S> + ?Sized,
    {
        Self::with_leaf_capacity(space, coordinates, Self::DEFAULT_LEAF_CAPACITY)
    }

    #[inline]
    fn size(&self) -> usize {
        self.points.len()
    }

    fn intersects<F: FnMut(usize)>(&self, sphere: &Sphere<S>, mut callback: F) {
        let (Some(root), Some(radius_squared)) = (self.root, sphere.radius_squared()) else {
            return;
        };

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let id = id as usize;
            let cluster = &self.tree.data[id];

            if cluster.bbox.distance_squared(&sphere.centre) > radius_squared {
                continue;
            }

            match &self.tree.nodes[id] {
                Node::Internal(orthant) => stack.extend(orthant.iter().flatten()),
                Node::External => {
                    for (index, point) in &self.points[cluster.start..cluster.start + cluster.len] {
                        if distance_squared(&sphere.centre, point) <= radius_squared {
                            callback(*index);
                        }
                    }
                }
            }
        }
    }
}

/// Index testing every point against every query.
#[derive(Clone, Debug, Default)]
pub struct BruteForce<S> {
    points: Vec<[S; 3]>,
}

impl<S: Real> SpatialIndex<S> for BruteForce<S> {
    #[inline]
    fn new<E, C>(space: &E, coordinates: &C) -> Self
    where
        E: ExecutionSpace,
        C: Coordinates<Scalar = S> + ?Sized,
    {
        Self {
            points: space.map_indices(coordinates.len(), |i| coordinates.coordinates(i)),
        }
    }

    #[inline]
    fn size(&self) -> usize {
        self.points.len()
    }

    #[inline]
    fn intersects<F: FnMut(usize)>(&self, sphere: &Sphere<S>, mut callback: F) {
        let Some(radius_squared) = sphere.radius_squared() else {
            return;
        };

        for (index, point) in self.points.iter().enumerate() {
            if distance_squared(&sphere.centre, point) <= radius_squared {
                callback(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequential::Serial;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_points(len: usize, seed: u64) -> Vec<[f64; 3]> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len)
            .map(|_| std::array::from_fn(|_| rng.gen_range(-10.0..10.0)))
            .collect()
    }

    fn query<I: SpatialIndex<f64>>(index: &I, sphere: &Sphere<f64>) -> Vec<usize> {
        let mut found = Vec::new();
        index.intersects(sphere, |i| found.push(i));
        found.sort_unstable();
        found
    }

    #[test]
    fn orthtree_matches_brute_force() {
        let points = random_points(500, 0);
        let brute_force = BruteForce::new(&Serial, points.as_slice());

        for leaf_capacity in [1, 3, 8, 64] {
            let tree =
                RootedOrthtree::with_leaf_capacity(&Serial, points.as_slice(), leaf_capacity);
            assert_eq!(tree.size(), points.len());

            for (i, radius) in [(0, 0.0), (7, 0.5), (42, 2.0), (99, 4.0), (250, 30.0)] {
                let sphere = Sphere::new(points[i], radius);
                let expected = query(&brute_force, &sphere);

                assert!(expected.contains(&i));
                assert_eq!(query(&tree, &sphere), expected);
            }
        }
    }

    #[test]
    fn every_point_is_indexed_once() {
        let points = random_points(200, 1);
        let tree = RootedOrthtree::new(&Serial, points.as_slice());

        let mut indices: Vec<_> = tree.points().iter().map(|&(i, _)| i).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..200).collect::<Vec<_>>());

        let root = tree.get().data[tree.root().unwrap() as usize];
        assert_eq!((root.start, root.len), (0, 200));
    }

    #[test]
    fn leaves_respect_capacity() {
        let points = random_points(300, 2);
        let tree = RootedOrthtree::with_leaf_capacity(&Serial, points.as_slice(), 5);

        for (node, cluster) in tree.get().nodes.iter().zip(&tree.get().data) {
            if let Node::External = node {
                assert!(cluster.len <= 5);
            }
        }
    }

    #[test]
    fn coincident_points_are_all_reported() {
        let mut points = vec![[1.0, 1.0, 1.0]; 20];
        points.push([5.0, 5.0, 5.0]);
        let tree = RootedOrthtree::with_leaf_capacity(&Serial, points.as_slice(), 2);

        let found = query(&tree, &Sphere::new([1.0, 1.0, 1.0], 0.0));
        assert_eq!(found, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn adjacent_floats_are_indexed() {
        let next = f64::from_bits(1.0f64.to_bits() + 1);
        let mut points = vec![[1.0, 0.0, 0.0]; 9];
        points.push([next, 0.0, 0.0]);
        let tree = RootedOrthtree::new(&Serial, points.as_slice());

        assert_eq!(tree.size(), 10);
        assert_eq!(query(&tree, &Sphere::new([1.0, 0.0, 0.0], 0.0)), (0..9).collect::<Vec<_>>());
        assert_eq!(query(&tree, &Sphere::new([next, 0.0, 0.0], 1e-12)).len(), 10);

        let f32_next = f32::from_bits(1.0f32.to_bits() + 1);
        let mut points = vec![[0.0, 1.0, 0.0]; 30];
        points.extend([[0.0, f32_next, 0.0]; 30]);
        let tree = RootedOrthtree::with_leaf_capacity(&Serial, points.as_slice(), 1);
        assert_eq!(query_f32(&tree, &Sphere::new([0.0, 1.0, 0.0], 1e-3)).len(), 60);
    }

    #[test]
    fn empty_and_negative_queries() {
        let empty: [[f32; 3]; 0] = [];
        let tree = RootedOrthtree::new(&Serial, empty.as_slice());
        assert_eq!(tree.root(), None);
        assert!(query_f32(&tree, &Sphere::new([0.0; 3], 1.0)).is_empty());

        let points = random_points(50, 3);
        let tree = RootedOrthtree::new(&Serial, points.as_slice());
        assert!(query(&tree, &Sphere::new(points[0], -1.0)).is_empty());

        let brute_force = BruteForce::new(&Serial, points.as_slice());
        assert!(query(&brute_force, &Sphere::new(points[0], f64::NAN)).is_empty());
    }

    fn query_f32<I: SpatialIndex<f32>>(index: &I, sphere: &Sphere<f32>) -> Vec<usize> {
        let mut found = Vec::new();
        index.intersects(sphere, |i| found.push(i));
        found
    }
}
