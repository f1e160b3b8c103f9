use crate::{
    soa::{FieldList, FieldType, Layout, Member, MemberAt, SoA},
    tree::Real,
};

/// Trait for types that can be located in 3-D space.
///
/// You can derive this trait if your type has a field named `position`.
///
/// # Example
///
/// ```
/// use particulate::prelude::*;
///
/// #[derive(Position)]
/// struct Atom {
///     position: [f64; 3],
///     charge: f64,
/// }
///
/// let atom = Atom { position: [1.0, 0.0, -2.0], charge: 1.0 };
/// assert_eq!(atom.position(), [1.0, 0.0, -2.0]);
/// ```
pub trait Position {
    /// Scalar type of the coordinates.
    type Scalar: Real;

    /// Returns the coordinates of the particle.
    fn position(&self) -> [Self::Scalar; 3];
}

impl<S: Real> Position for [S; 3] {
    type Scalar = S;

    #[inline]
    fn position(&self) -> [S; 3] {
        *self
    }
}

impl<P: Position + ?Sized> Position for &P {
    type Scalar = P::Scalar;

    #[inline]
    fn position(&self) -> [Self::Scalar; 3] {
        P::position(self)
    }
}

#[cfg(any(feature = "glam", feature = "ultraviolet"))]
macro_rules! impl_position_xyz {
    ($scalar: ty => $($vector: ty),+) => {$(
        impl Position for $vector {
            type Scalar = $scalar;

            #[inline]
            fn position(&self) -> [$scalar; 3] {
                [self.x, self.y, self.z]
            }
        }
    )+};
}

#[cfg(feature = "glam")]
impl_position_xyz!(f32 => glam::Vec3, glam::Vec3A);
#[cfg(feature = "glam")]
impl_position_xyz!(f64 => glam::DVec3);

#[cfg(feature = "ultraviolet")]
impl_position_xyz!(f32 => ultraviolet::Vec3);
#[cfg(feature = "ultraviolet")]
impl_position_xyz!(f64 => ultraviolet::DVec3);

/// Trait for a read-only source of indexed particle coordinates.
pub trait Coordinates: Sync {
    /// Scalar type of the coordinates.
    type Scalar: Real;

    /// Returns the number of particles.
    fn len(&self) -> usize;

    /// Returns `true` if there are no particles.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the coordinates of the particle at the given index.
    fn coordinates(&self, index: usize) -> [Self::Scalar; 3];
}

impl<P: Position + Sync> Coordinates for [P] {
    type Scalar = P::Scalar;

    #[inline]
    fn len(&self) -> usize {
        <[P]>::len(self)
    }

    #[inline]
    fn coordinates(&self, index: usize) -> [Self::Scalar; 3] {
        self[index].position()
    }
}

impl<P: Position + Sync> Coordinates for Vec<P> {
    type Scalar = P::Scalar;

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn coordinates(&self, index: usize) -> [Self::Scalar; 3] {
        self[index].position()
    }
}

/// Coordinates stored in the `I`-th field of a slice of [`SoA`] blocks.
///
/// Particle `i` lives in block `i / V` at lane `i % V`, where `V` is the vector length of the
/// layout. The field must be a `[S; 3]` array of a [`Real`] scalar.
///
/// # Example
///
/// ```
/// use particulate::{
///     position::{Coordinates, MemberCoordinates},
///     soa::{InnerArrayLayout, RowMajor, SoA},
/// };
///
/// type Particle = SoA<InnerArrayLayout<4, RowMajor>, (u64, [f64; 3])>;
///
/// let mut blocks = vec![Particle::zeroed(); 2];
/// *blocks[1].get_mut::<1>(2, &[0]) = 3.0;
///
/// let coordinates = MemberCoordinates::<_, _, 1>::new(&blocks, 7);
/// assert_eq!(coordinates.len(), 7);
/// assert_eq!(coordinates.coordinates(6), [3.0, 0.0, 0.0]);
/// ```
pub struct MemberCoordinates<'a, L: Layout, F: FieldList<L>, const I: usize> {
    blocks: &'a [SoA<L, F>],
    len: usize,
}

impl<L: Layout, F: FieldList<L>, const I: usize> Clone for MemberCoordinates<'_, L, F, I> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: Layout, F: FieldList<L>, const I: usize> Copy for MemberCoordinates<'_, L, F, I> {}

impl<'a, L: Layout, F: MemberAt<L, I>, const I: usize> MemberCoordinates<'a, L, F, I> {
    /// Creates new [`MemberCoordinates`] over the first `len` particles of the given blocks.
    ///
    /// # Panics
    ///
    /// Panics if the blocks hold fewer than `len` particles.
    #[inline]
    pub fn new(blocks: &'a [SoA<L, F>], len: usize) -> Self {
        assert!(
            len <= blocks.len() * L::VECTOR_LENGTH,
            "{len} particles do not fit in {} blocks of {}",
            blocks.len(),
            L::VECTOR_LENGTH
        );

        Self { blocks, len }
    }

    /// Returns the underlying blocks.
    #[inline]
    pub fn blocks(&self) -> &'a [SoA<L, F>] {
        self.blocks
    }
}

impl<L, F, S, const I: usize> Coordinates for MemberCoordinates<'_, L, F, I>
where
    L: Layout,
    F: MemberAt<L, I, Field = [S; 3]>,
    S: Real,
    [S; 3]: Member<L> + FieldType<Scalar = S>,
{
    type Scalar = S;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn coordinates(&self, index: usize) -> [S; 3] {
        debug_assert!(index < self.len, "particle {index} out of {}", self.len);

        let block = &self.blocks[index / L::VECTOR_LENGTH];
        let lane = index % L::VECTOR_LENGTH;
        std::array::from_fn(|k| *block.get::<I>(lane, &[k]))
    }
}
