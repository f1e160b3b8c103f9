use std::{fmt::Debug, marker::PhantomData};

/// Storage order of the inner arrays of a [`SoA`](crate::soa::SoA) block.
pub trait ArrayOrder: Copy + Default + Debug + Send + Sync + 'static {
    /// Returns the offset, in scalars, of the element at `lane` of the vector and at the
    /// row-major flattened extra index `flat`, for a field whose extra extents multiply to
    /// `extent`.
    fn offset(vector_length: usize, extent: usize, flat: usize, lane: usize) -> usize;
}

/// The vector dimension varies fastest: a field of shape `[e1]..[eN]` is stored as
/// `[e1]..[eN][V]`.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct RowMajor;

/// The vector dimension varies slowest: a field of shape `[e1]..[eN]` is stored as
/// `[V][e1]..[eN]`.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct ColumnMajor;

impl ArrayOrder for RowMajor {
    #[inline]
    fn offset(vector_length: usize, _extent: usize, flat: usize, lane: usize) -> usize {
        flat * vector_length + lane
    }
}

impl ArrayOrder for ColumnMajor {
    #[inline]
    fn offset(_vector_length: usize, extent: usize, flat: usize, lane: usize) -> usize {
        lane * extent + flat
    }
}

/// Compile-time description of the inner arrays shared by every field of a
/// [`SoA`](crate::soa::SoA) block.
pub trait Layout: Copy + Default + Debug + Send + Sync + 'static {
    /// Number of particles stored in one block.
    const VECTOR_LENGTH: usize;

    /// Storage order of the inner arrays.
    type Order: ArrayOrder;
}

/// A [`Layout`] with `V` particles per block stored in the order `O`.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct InnerArrayLayout<const V: usize, O>(PhantomData<O>);

impl<const V: usize, O: ArrayOrder> Layout for InnerArrayLayout<V, O> {
    const VECTOR_LENGTH: usize = {
        assert!(V > 0, "the vector length of a layout must be positive");
        V
    };

    type Order = O;
}
