/// Bounding box related traits and types.
pub mod partition;

pub use partition::*;

/// Index of a [`Node`] in a [`Tree`].
pub type NodeID = u32;

/// Generic tree data structure.
#[derive(Clone, Debug)]
pub struct Tree<Node, Data> {
    /// Vector of `Node` objects that define the structure of the tree.
    pub nodes: Vec<Node>,

    /// Vector of generic `Data` objects that contain information about the associated `Node`.
    ///
    /// The `data` vector is parallel to the `nodes` vector, so the `i`-th element of the `data`
    /// vector corresponds to the `i`-th element of the `nodes` vector.
    pub data: Vec<Data>,
}

impl<Node, Data> Tree<Node, Data> {
    /// Creates a new empty [`Tree`].
    #[inline]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Creates a new empty [`Tree`] with at least the specified capacity in the `nodes` and
    /// `data` vectors.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            data: Vec::with_capacity(capacity),
        }
    }
}

impl<Node, Data> Default for Tree<Node, Data> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Node that can either be internal and containing data or external and containing no data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node<N> {
    /// Node with child nodes.
    Internal(N),
    /// Node without children.
    External,
}

/// N-dimensional generalisation of quadtrees/octrees.
pub type Orthtree<const X: usize, Data> = Tree<Node<Orthant<X, Option<NodeID>>>, Data>;

impl<const X: usize, Data> Orthtree<X, Data> {
    /// Recursively inserts new [`Nodes`](Node) in the current [`Orthtree`] from the given input,
    /// coordinates function and compute function until nodes hold at most `capacity` elements or
    /// elements that no subdivision separates, such as coincident ones.
    ///
    /// The input is reordered in place so that every node covers a contiguous range of it. The
    /// compute function receives the offset of that range and its elements.
    #[inline]
    pub fn build_node<const D: usize, I, S, F, G>(
        &mut self,
        input: &mut [I],
        capacity: usize,
        coordinates: F,
        compute: G,
    ) -> Option<NodeID>
    where
        Const<D>: SubDivide<Division = Const<X>>,
        F: Fn(&I) -> [S; D] + Copy,
        G: Fn(usize, &[I]) -> Data + Copy,
        S: Real,
    {
        let bbox = BoundingBox::square_with(input.iter().map(coordinates));
        self.build_node_with(input, 0, capacity, coordinates, compute, bbox)
    }

    /// Recursively inserts new [`Nodes`](Node) in the current [`Orthtree`] from the given input,
    /// starting at `offset` in the overall input, until the given bounding box stops subdividing.
    pub fn build_node_with<const D: usize, I, S, F, G>(
        &mut self,
        input: &mut [I],
        offset: usize,
        capacity: usize,
        coordinates: F,
        compute: G,
        bbox: BoundingBox<[S; D]>,
    ) -> Option<NodeID>
    where
        Const<D>: SubDivide<Division = Const<X>>,
        F: Fn(&I) -> [S; D] + Copy,
        G: Fn(usize, &[I]) -> Data + Copy,
        S: Real,
    {
        if input.is_empty() {
            return None;
        }

        let id = self.nodes.len();
        self.nodes.push(Node::External);
        self.data.push(compute(offset, input));

        if input.len() <= capacity
            || input
                .windows(2)
                .all(|d| coordinates(&d[0]) == coordinates(&d[1]))
        {
            return Some(id as _);
        }

        // A split only counts if it separates the input, otherwise the input is boxed tightly
        // once more. Elements that still share an orthant are too close to be told apart.
        let mut bbox = bbox;
        let center = loop {
            let center = bbox.center();
            let orthant_of = |d: &I| BoundingBox::orthant_of(&center, &coordinates(d));
            input.sort_unstable_by_key(orthant_of);

            if orthant_of(&input[0]) != orthant_of(&input[input.len() - 1]) {
                break center;
            }

            let tight = BoundingBox::square_with(input.iter().map(coordinates));
            if tight == bbox {
                return Some(id as _);
            }
            bbox = tight;
        };
        let orthant_of = |d: &I| BoundingBox::orthant_of(&center, &coordinates(d));

        let mut orthant = [None; X];
        let mut start = 0;
        for (index, bbox) in bbox.subdivide::<X>().into_iter().enumerate() {
            let len = input[start..]
                .iter()
                .take_while(|&d| orthant_of(d) == index)
                .count();
            let end = start + len;

            orthant[index] = self.build_node_with(
                &mut input[start..end],
                offset + start,
                capacity,
                coordinates,
                compute,
                bbox,
            );
            start = end;
        }

        self.nodes[id] = Node::Internal(orthant);

        Some(id as _)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Cell {
        offset: usize,
        len: usize,
        bbox: BoundingBox<[f64; 3]>,
    }

    fn build(points: &mut [[f64; 3]], capacity: usize) -> (Option<NodeID>, Orthtree<8, Cell>) {
        let mut tree = Orthtree::<8, Cell>::new();
        let root = tree.build_node(
            points,
            capacity,
            |p: &[f64; 3]| *p,
            |offset, slice: &[[f64; 3]]| Cell {
                offset,
                len: slice.len(),
                bbox: BoundingBox::with(slice.iter().copied()),
            },
        );
        (root, tree)
    }

    #[test]
    fn empty_input_has_no_root() {
        let (root, tree) = build(&mut [], 1);
        assert_eq!(root, None);
        assert!(tree.nodes.is_empty());
    }

    #[test]
    fn coincident_points_stay_in_one_leaf() {
        let mut points = [[1.0, 2.0, 3.0]; 5];
        let (root, tree) = build(&mut points, 1);

        assert_eq!(root, Some(0));
        assert_eq!(tree.nodes, vec![Node::External]);
        assert_eq!(tree.data[0].len, 5);
    }

    #[test]
    fn adjacent_floats_stay_in_one_leaf() {
        let next = f64::from_bits(1.0f64.to_bits() + 1);
        let mut points = vec![[1.0, 0.0, 0.0]; 9];
        points.push([next, 0.0, 0.0]);
        let (root, tree) = build(&mut points, 2);

        assert_eq!(root, Some(0));
        assert_eq!(tree.nodes, vec![Node::External]);
        assert_eq!(tree.data[0].len, 10);
    }

    #[test]
    fn clustered_points_skip_empty_levels() {
        let mut points = vec![[0.0, 0.0, 0.0], [1e-9, 0.0, 0.0], [1e-9, 1e-9, 0.0]];
        points.push([1000.0, 1000.0, 1000.0]);
        let (root, tree) = build(&mut points, 1);

        assert_eq!(root, Some(0));
        let leaves = tree.nodes.iter().filter(|n| **n == Node::External).count();
        assert_eq!(leaves, 4);
        assert!(tree.nodes.len() < 10);
    }

    #[test]
    fn children_cover_contiguous_ranges() {
        let mut points: Vec<[f64; 3]> = (0..64)
            .map(|i| {
                let i = i as f64;
                [i.sin() * 10.0, i.cos() * 7.0, (i * 0.37).sin() * 3.0]
            })
            .collect();
        let (root, tree) = build(&mut points, 4);
        assert_eq!(root, Some(0));

        for (node, data) in tree.nodes.iter().zip(&tree.data) {
            for point in &points[data.offset..data.offset + data.len] {
                assert_eq!(data.bbox.distance_squared(point), 0.0);
            }

            match node {
                Node::Internal(orthant) => {
                    let children = orthant.iter().flatten().map(|&id| &tree.data[id as usize]);
                    let mut start = data.offset;
                    for child in children {
                        assert_eq!(child.offset, start);
                        start += child.len;
                    }
                    assert_eq!(start, data.offset + data.len);
                }
                Node::External => assert!(data.len <= 4),
            }
        }
    }
}
