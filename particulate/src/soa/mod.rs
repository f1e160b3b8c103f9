mod field;
mod layout;

pub use field::*;
pub use layout::*;

use bytemuck::Zeroable;
use std::{marker::PhantomData, mem::MaybeUninit};

/// Trait for an ordered list of fields, implemented for tuples of 1 to 12 [`Member`] types.
pub trait FieldList<L: Layout> {
    /// `#[repr(C)]` aggregate holding the storage of every field in declaration order.
    type Members: Zeroable + Copy + Send + Sync + 'static;

    /// Number of fields in the list.
    const LEN: usize;
}

/// Trait to access the `I`-th field of a [`FieldList`].
pub trait MemberAt<L: Layout, const I: usize>: FieldList<L> {
    /// Declared type of the field.
    type Field: Member<L>;

    /// Returns a reference to the storage of the field.
    fn member(members: &<Self as FieldList<L>>::Members) -> &<Self::Field as Member<L>>::Storage;

    /// Returns a mutable reference to the storage of the field.
    fn member_mut(
        members: &mut <Self as FieldList<L>>::Members,
    ) -> &mut <Self::Field as Member<L>>::Storage;
}

/// Storage of the `I`-th field of `F` in a block of layout `L`.
pub type MemberStorage<L, F, const I: usize> =
    <<F as MemberAt<L, I>>::Field as Member<L>>::Storage;

/// Scalar of the `I`-th field of `F`.
pub type MemberScalar<L, F, const I: usize> =
    <<F as MemberAt<L, I>>::Field as FieldType>::Scalar;

macro_rules! impl_field_list {
    (@member $members: ident [$($all: ident),+] $index: tt: $field: ident) => {
        impl<L: Layout, $($all: Member<L>),+> MemberAt<L, $index> for ($($all,)+) {
            type Field = $field;

            #[inline]
            fn member(
                members: &<Self as FieldList<L>>::Members,
            ) -> &<$field as Member<L>>::Storage {
                &members.$index
            }

            #[inline]
            fn member_mut(
                members: &mut <Self as FieldList<L>>::Members,
            ) -> &mut <$field as Member<L>>::Storage {
                &mut members.$index
            }
        }
    };
    (@at $members: ident $all: tt $($index: tt: $field: ident),+) => {
        $(impl_field_list!(@member $members $all $index: $field);)+
    };
    ($members: ident { $($index: tt: $field: ident),+ }) => {
        /// `#[repr(C)]` aggregate of field storages generated for tuples of the same arity.
        #[repr(C)]
        #[derive(Clone, Copy, Debug)]
        pub struct $members<$($field),+>($(pub $field),+);

        // SAFETY: every field is `Zeroable` and padding bytes may hold any value.
        unsafe impl<$($field: Zeroable),+> Zeroable for $members<$($field),+> {}

        impl<L: Layout, $($field: Member<L>),+> FieldList<L> for ($($field,)+) {
            type Members = $members<$(<$field as Member<L>>::Storage),+>;

            const LEN: usize = [$(stringify!($field)),+].len();
        }

        impl_field_list!(@at $members [$($field),+] $($index: $field),+);
    };
}

impl_field_list!(Members1 { 0: A });
impl_field_list!(Members2 { 0: A, 1: B });
impl_field_list!(Members3 { 0: A, 1: B, 2: C });
impl_field_list!(Members4 { 0: A, 1: B, 2: C, 3: D });
impl_field_list!(Members5 { 0: A, 1: B, 2: C, 3: D, 4: E });
impl_field_list!(Members6 { 0: A, 1: B, 2: C, 3: D, 4: E, 5: F });
impl_field_list!(Members7 { 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G });
impl_field_list!(Members8 { 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H });
impl_field_list!(Members9 { 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H, 8: I });
impl_field_list!(Members10 { 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H, 8: I, 9: J });
impl_field_list!(Members11 { 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H, 8: I, 9: J, 10: K });
impl_field_list!(Members12 { 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H, 8: I, 9: J, 10: K, 11: M });

/// Structure-of-arrays block storing the fields `F` of [`Layout::VECTOR_LENGTH`] particles.
///
/// Every field is stored as one inner array laid out according to the [`ArrayOrder`] of `L`.
/// The block is plain data: it is [`Copy`], has no drop glue and has the size and alignment of
/// a `#[repr(C)]` struct declaring each field `T` as a `[T; V]` member.
///
/// # Example
///
/// ```
/// use particulate::soa::{ColumnMajor, InnerArrayLayout, RowMajor, SoA};
///
/// type Fields = (f64, [[f32; 3]; 2]);
///
/// let mut row = SoA::<InnerArrayLayout<4, RowMajor>, Fields>::zeroed();
/// row.member_mut::<1>()[1][2][3] = 1.5;
/// assert_eq!(*row.get::<1>(3, &[1, 2]), 1.5);
///
/// let mut column = SoA::<InnerArrayLayout<4, ColumnMajor>, Fields>::zeroed();
/// column.member_mut::<1>()[3][1][2] = 1.5;
/// assert_eq!(*column.get::<1>(3, &[1, 2]), 1.5);
/// ```
#[repr(transparent)]
pub struct SoA<L: Layout, F: FieldList<L>> {
    members: F::Members,
    layout: PhantomData<fn() -> (L, F)>,
}

impl<L: Layout, F: FieldList<L>> Clone for SoA<L, F> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: Layout, F: FieldList<L>> Copy for SoA<L, F> {}

// SAFETY: `SoA` is a transparent wrapper around `Zeroable` members.
unsafe impl<L: Layout, F: FieldList<L>> Zeroable for SoA<L, F> {}

impl<L: Layout, F: FieldList<L>> Default for SoA<L, F> {
    #[inline]
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<L: Layout, F: FieldList<L>> std::fmt::Debug for SoA<L, F> {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoA")
            .field("layout", &std::any::type_name::<L>())
            .field("fields", &std::any::type_name::<F>())
            .finish_non_exhaustive()
    }
}

impl<L: Layout, F: FieldList<L>> SoA<L, F> {
    /// Number of particles stored in the block.
    pub const VECTOR_LENGTH: usize = L::VECTOR_LENGTH;

    /// Number of fields stored in the block.
    pub const FIELD_COUNT: usize = F::LEN;

    /// Creates a new [`SoA`] with every field set to zero.
    #[inline]
    pub fn zeroed() -> Self {
        <Self as Zeroable>::zeroed()
    }

    /// Returns an uninitialised [`SoA`], for containers that write every member before reading
    /// it.
    #[inline]
    pub const fn uninit() -> MaybeUninit<Self> {
        MaybeUninit::uninit()
    }

    /// Returns a reference to the inner array of the `I`-th field, indexed in the natural order
    /// of the layout.
    #[inline]
    pub fn member<const I: usize>(&self) -> &MemberStorage<L, F, I>
    where
        F: MemberAt<L, I>,
    {
        F::member(&self.members)
    }

    /// Returns a mutable reference to the inner array of the `I`-th field, indexed in the
    /// natural order of the layout.
    #[inline]
    pub fn member_mut<const I: usize>(&mut self) -> &mut MemberStorage<L, F, I>
    where
        F: MemberAt<L, I>,
    {
        F::member_mut(&mut self.members)
    }

    /// Returns the scalar of the `I`-th field for the particle at `lane` and the given extra
    /// indices, independently of the order of the layout.
    #[inline]
    pub fn get<const I: usize>(&self, lane: usize, indices: &[usize]) -> &MemberScalar<L, F, I>
    where
        F: MemberAt<L, I>,
    {
        let scalars: &[MemberScalar<L, F, I>] =
            bytemuck::cast_slice(std::slice::from_ref(self.member::<I>()));
        &scalars[Self::offset::<I>(lane, indices)]
    }

    /// Returns a mutable reference to the scalar of the `I`-th field for the particle at `lane`
    /// and the given extra indices, independently of the order of the layout.
    #[inline]
    pub fn get_mut<const I: usize>(
        &mut self,
        lane: usize,
        indices: &[usize],
    ) -> &mut MemberScalar<L, F, I>
    where
        F: MemberAt<L, I>,
    {
        let offset = Self::offset::<I>(lane, indices);
        let scalars: &mut [MemberScalar<L, F, I>] =
            bytemuck::cast_slice_mut(std::slice::from_mut(self.member_mut::<I>()));
        &mut scalars[offset]
    }

    #[inline]
    fn offset<const I: usize>(lane: usize, indices: &[usize]) -> usize
    where
        F: MemberAt<L, I>,
    {
        type Field<L, F, const I: usize> = <F as MemberAt<L, I>>::Field;

        debug_assert!(lane < L::VECTOR_LENGTH, "lane {lane} out of the vector length");
        debug_assert_eq!(
            indices.len(),
            <Field<L, F, I> as FieldType>::RANK,
            "wrong number of extra indices"
        );

        <L::Order as ArrayOrder>::offset(
            L::VECTOR_LENGTH,
            <Field<L, F, I> as FieldType>::EXTENT,
            <Field<L, F, I> as FieldType>::flat_index(indices),
            lane,
        )
    }
}

/// Returns a reference to the inner array of the `I`-th field of the block.
#[inline]
pub fn struct_member<L, F, const I: usize>(soa: &SoA<L, F>) -> &MemberStorage<L, F, I>
where
    L: Layout,
    F: MemberAt<L, I>,
{
    soa.member::<I>()
}

/// Returns a mutable reference to the inner array of the `I`-th field of the block.
#[inline]
pub fn struct_member_mut<L, F, const I: usize>(soa: &mut SoA<L, F>) -> &mut MemberStorage<L, F, I>
where
    L: Layout,
    F: MemberAt<L, I>,
{
    soa.member_mut::<I>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, needs_drop, size_of};

    #[repr(C)]
    #[allow(dead_code)]
    struct FooData {
        d0: [f64; 4],
        d1: [i32; 4],
        d2: [f32; 4],
        d3: [[[f64; 3]; 2]; 4],
        d4: [[u32; 5]; 4],
        d5: [[[[f32; 2]; 2]; 3]; 4],
        d6: [[[[[f64; 2]; 3]; 2]; 4]; 4],
    }

    type Fields = (
        f64,
        i32,
        f32,
        [[f64; 3]; 2],
        [u32; 5],
        [[[f32; 2]; 2]; 3],
        [[[[f64; 2]; 3]; 2]; 4],
    );

    type RowSoA = SoA<InnerArrayLayout<4, RowMajor>, Fields>;
    type ColumnSoA = SoA<InnerArrayLayout<4, ColumnMajor>, Fields>;

    fn assert_plain_data<T: Copy + Zeroable>() {
        assert!(!needs_drop::<T>());
    }

    #[test]
    fn equivalent_to_naive_struct() {
        assert_plain_data::<RowSoA>();
        assert_plain_data::<ColumnSoA>();

        assert_eq!(size_of::<RowSoA>(), size_of::<FooData>());
        assert_eq!(size_of::<ColumnSoA>(), size_of::<FooData>());
        assert_eq!(align_of::<RowSoA>(), align_of::<FooData>());
        assert_eq!(align_of::<ColumnSoA>(), align_of::<FooData>());

        assert_eq!(RowSoA::VECTOR_LENGTH, 4);
        assert_eq!(RowSoA::FIELD_COUNT, 7);
    }

    #[test]
    fn padding_follows_natural_alignment() {
        #[repr(C)]
        struct Naive {
            _a: [u8; 3],
            _b: [f64; 3],
            _c: [u16; 3],
        }

        type Block = SoA<InnerArrayLayout<3, RowMajor>, (u8, f64, u16)>;
        assert_eq!(size_of::<Block>(), size_of::<Naive>());
        assert_eq!(align_of::<Block>(), align_of::<Naive>());
    }

    #[test]
    fn row_major() {
        let mut soa = RowSoA::zeroed();

        let v1 = 0.3343;
        struct_member_mut::<_, _, 0>(&mut soa)[3] = v1;

        let v2 = 0.992;
        struct_member_mut::<_, _, 6>(&mut soa)[2][1][1][1][1] = v2;

        assert_eq!(struct_member::<_, _, 0>(&soa)[3], v1);
        assert_eq!(struct_member::<_, _, 6>(&soa)[2][1][1][1][1], v2);

        assert_eq!(*soa.get::<0>(3, &[]), v1);
        assert_eq!(*soa.get::<6>(1, &[2, 1, 1, 1]), v2);
    }

    #[test]
    fn column_major() {
        let mut soa = ColumnSoA::zeroed();

        let v1 = 0.3343;
        struct_member_mut::<_, _, 0>(&mut soa)[3] = v1;

        let v2 = 0.992;
        *soa.get_mut::<6>(2, &[1, 1, 1, 1]) = v2;

        assert_eq!(struct_member::<_, _, 0>(&soa)[3], v1);
        assert_eq!(*soa.get::<6>(2, &[1, 1, 1, 1]), v2);

        // The lane is the outermost index of column-major storage.
        assert_eq!(struct_member::<_, _, 6>(&soa)[2][1][1][1][1], v2);
        assert_eq!(*soa.get::<6>(1, &[2, 1, 1, 1]), 0.0);
    }

    macro_rules! round_trip {
        ($soa: ty) => {{
            let mut soa = <$soa>::zeroed();
            let mut value = 0.0;

            for lane in 0..4 {
                for i in 0..4 {
                    for j in 0..2 {
                        for k in 0..3 {
                            for l in 0..2 {
                                value += 1.0;
                                *soa.get_mut::<6>(lane, &[i, j, k, l]) = value;
                            }
                        }
                    }
                }
            }

            let mut expected = 0.0;
            for lane in 0..4 {
                for i in 0..4 {
                    for j in 0..2 {
                        for k in 0..3 {
                            for l in 0..2 {
                                expected += 1.0;
                                assert_eq!(*soa.get::<6>(lane, &[i, j, k, l]), expected);
                            }
                        }
                    }
                }
            }

            soa
        }};
    }

    #[test]
    fn distinct_indices_do_not_alias() {
        let row = round_trip!(RowSoA);
        assert_eq!(row.member::<6>()[3][1][2][1][0], *row.get::<6>(0, &[3, 1, 2, 1]));

        let column = round_trip!(ColumnSoA);
        assert_eq!(column.member::<6>()[0][3][1][2][1], *column.get::<6>(0, &[3, 1, 2, 1]));
    }

    #[test]
    fn fields_do_not_overlap() {
        let mut soa = RowSoA::zeroed();

        for lane in 0..4 {
            *soa.get_mut::<1>(lane, &[]) = -1;
            for i in 0..5 {
                *soa.get_mut::<4>(lane, &[i]) = u32::MAX;
            }
        }

        assert!(soa.member::<0>().iter().all(|&d| d == 0.0));
        assert!(soa.member::<2>().iter().all(|&d| d == 0.0));
        assert!(soa.member::<3>().iter().flatten().flatten().all(|&d| d == 0.0));
        assert!(soa.member::<5>().iter().flatten().flatten().flatten().all(|&d| d == 0.0));
        assert_eq!(soa.member::<1>(), &[-1; 4]);
    }

    #[test]
    fn copies_are_independent() {
        let mut soa = SoA::<InnerArrayLayout<2, RowMajor>, (u64, [u8; 2])>::default();
        *soa.get_mut::<0>(1, &[]) = 7;

        let mut copy = soa;
        *copy.get_mut::<0>(1, &[]) = 8;

        assert_eq!(*soa.get::<0>(1, &[]), 7);
        assert_eq!(*copy.get::<0>(1, &[]), 8);
    }
}
