use crate::soa::{ColumnMajor, InnerArrayLayout, Layout, RowMajor};
use bytemuck::Pod;

/// Trait for the per-particle type of a field stored in a [`SoA`](crate::soa::SoA) block.
///
/// A field is either a plain-data scalar or a nested array of one. The dimensions of the nested
/// arrays are the extra extents of the field, outermost first, and the innermost element is its
/// scalar.
///
/// Scalars are registered with [`impl_scalar_field`](crate::impl_scalar_field). Only [`Pod`]
/// types can be fields, so a type with indirection or drop glue is rejected at compile time.
pub trait FieldType: Pod + Send + Sync {
    /// Innermost element of the field.
    type Scalar: Pod;

    /// Number of extra extents.
    const RANK: usize;

    /// Product of the extra extents, 1 for scalars.
    const EXTENT: usize;

    /// Returns the extra extent of the given dimension, outermost first.
    fn extent(dimension: usize) -> usize;

    /// Returns the row-major flattening of the given extra indices.
    fn flat_index(indices: &[usize]) -> usize;
}

/// Trait giving the storage of a field inside a block of layout `L`.
pub trait Member<L: Layout>: FieldType {
    /// Inner array holding the field for every particle of the block.
    type Storage: Pod + Send + Sync;
}

impl<E: FieldType, const N: usize> FieldType for [E; N] {
    type Scalar = E::Scalar;

    const RANK: usize = E::RANK + 1;

    const EXTENT: usize = N * E::EXTENT;

    #[inline]
    fn extent(dimension: usize) -> usize {
        match dimension {
            0 => N,
            _ => E::extent(dimension - 1),
        }
    }

    #[inline]
    fn flat_index(indices: &[usize]) -> usize {
        debug_assert!(!indices.is_empty(), "missing extra index");
        debug_assert!(indices[0] < N, "extra index {} out of extent {}", indices[0], N);
        indices[0] * E::EXTENT + E::flat_index(&indices[1..])
    }
}

impl<const V: usize, E, const N: usize> Member<InnerArrayLayout<V, RowMajor>> for [E; N]
where
    E: Member<InnerArrayLayout<V, RowMajor>>,
{
    type Storage = [E::Storage; N];
}

impl<const V: usize, F: FieldType> Member<InnerArrayLayout<V, ColumnMajor>> for F {
    type Storage = [F; V];
}

/// Implements [`FieldType`] and its row-major storage for plain-data scalar types.
///
/// # Example
///
/// ```
/// use particulate::soa::{FieldType, InnerArrayLayout, RowMajor, SoA};
///
/// #[repr(transparent)]
/// #[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
/// struct Charge(f32);
///
/// particulate::impl_scalar_field!(Charge);
///
/// let mut soa = SoA::<InnerArrayLayout<8, RowMajor>, (Charge, [Charge; 3])>::zeroed();
/// *soa.get_mut::<1>(5, &[2]) = Charge(-1.0);
/// assert_eq!(soa.member::<1>()[2][5], Charge(-1.0));
/// assert_eq!(<[Charge; 3] as FieldType>::EXTENT, 3);
/// ```
#[macro_export]
macro_rules! impl_scalar_field {
    ($($scalar: ty),+ $(,)?) => {$(
        impl $crate::soa::FieldType for $scalar {
            type Scalar = $scalar;

            const RANK: usize = 0;

            const EXTENT: usize = 1;

            #[inline]
            fn extent(dimension: usize) -> usize {
                panic!("scalar fields have no extent {dimension}")
            }

            #[inline]
            fn flat_index(indices: &[usize]) -> usize {
                debug_assert!(indices.is_empty(), "too many extra indices");
                0
            }
        }

        impl<const V: usize>
            $crate::soa::Member<$crate::soa::InnerArrayLayout<V, $crate::soa::RowMajor>>
            for $scalar
        {
            type Storage = [$scalar; V];
        }
    )+};
}

impl_scalar_field!(f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

#[cfg(test)]
mod tests {
    use super::*;

    type Field = [[[f32; 2]; 2]; 3];

    #[test]
    fn extents_of_nested_arrays() {
        assert_eq!(<f64 as FieldType>::RANK, 0);
        assert_eq!(<f64 as FieldType>::EXTENT, 1);

        assert_eq!(<Field as FieldType>::RANK, 3);
        assert_eq!(<Field as FieldType>::EXTENT, 12);
        assert_eq!(
            (0..<Field as FieldType>::RANK).map(<Field as FieldType>::extent).collect::<Vec<_>>(),
            vec![3, 2, 2]
        );
    }

    #[test]
    fn flat_index_is_row_major() {
        assert_eq!(<Field as FieldType>::flat_index(&[0, 0, 0]), 0);
        assert_eq!(<Field as FieldType>::flat_index(&[0, 0, 1]), 1);
        assert_eq!(<Field as FieldType>::flat_index(&[0, 1, 0]), 2);
        assert_eq!(<Field as FieldType>::flat_index(&[2, 1, 1]), 11);
    }

    #[test]
    fn storage_sizes() {
        use std::mem::size_of;

        type Row = InnerArrayLayout<4, RowMajor>;
        type Column = InnerArrayLayout<4, ColumnMajor>;

        assert_eq!(size_of::<<u32 as Member<Row>>::Storage>(), 16);
        assert_eq!(size_of::<<Field as Member<Row>>::Storage>(), 4 * 12 * 4);
        assert_eq!(size_of::<<Field as Member<Column>>::Storage>(), 4 * 12 * 4);
    }
}
