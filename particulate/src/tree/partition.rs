use std::{
    fmt::Debug,
    ops::{Add, Mul, Neg, Sub},
};

/// Trait for the element `infinity`.
pub trait Infinity {
    /// `infinity` (∞) value of the type.
    fn infinity() -> Self;
}

/// Trait to compute the minimum and maximum of a number.
pub trait MinMax {
    /// Returns the minimum between two numbers.
    fn min(self, rhs: Self) -> Self;

    /// Returns the maximum between two numbers.
    fn max(self, rhs: Self) -> Self;
}

/// Trait to compute the midpoint of two numbers.
pub trait MidPoint {
    /// Returns the middle point of `self` and `rhs`.
    fn midpoint(self, rhs: Self) -> Self;

    /// Returns half of a number, defined by the midpoint between this number
    /// and zero.
    #[inline]
    fn half(self) -> Self
    where
        Self: Default,
    {
        self.midpoint(Self::default())
    }
}

/// Real scalar used for particle coordinates and cutoff radii.
pub trait Real:
    Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + Infinity
    + MinMax
    + MidPoint
    + PartialOrd
    + Default
    + Copy
    + Debug
    + Send
    + Sync
    + bytemuck::Pod
{
}

macro_rules! impl_floats {
    ($s: ty) => {
        impl Infinity for $s {
            #[inline]
            fn infinity() -> Self {
                Self::INFINITY
            }
        }

        impl MinMax for $s {
            #[inline]
            fn min(self, rhs: Self) -> Self {
                self.min(rhs)
            }

            #[inline]
            fn max(self, rhs: Self) -> Self {
                self.max(rhs)
            }
        }

        impl MidPoint for $s {
            #[inline]
            fn midpoint(self, rhs: Self) -> Self {
                (self + rhs) / 2.0
            }
        }

        impl Real for $s {}
    };
}

impl_floats!(f32);
impl_floats!(f64);

/// Returns the squared Euclidean distance between two points.
#[inline]
pub fn distance_squared<const D: usize, S: Real>(lhs: &[S; D], rhs: &[S; D]) -> S {
    lhs.iter().zip(rhs).fold(S::default(), |sum, (&l, &r)| {
        let d = l - r;
        sum + d * d
    })
}

/// An axis-aligned bounding box using arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox<A> {
    /// Minimum corner of the box.
    pub min: A,
    /// Maximum corner of the box.
    pub max: A,
}

impl<A> BoundingBox<A> {
    /// Creates a new [`BoundingBox`] with the given min and max values.
    #[inline]
    pub const fn new(min: A, max: A) -> Self {
        Self { min, max }
    }
}

impl<const D: usize, S> Default for BoundingBox<[S; D]>
where
    S: Neg<Output = S> + Infinity + Copy,
{
    #[inline]
    fn default() -> Self {
        Self::new([S::infinity(); D], [-S::infinity(); D])
    }
}

#[allow(clippy::needless_range_loop)]
impl<const D: usize, S: Real> BoundingBox<[S; D]> {
    /// Extends the [`BoundingBox`] so that it contains the given position.
    #[inline]
    pub fn extend(&mut self, position: &[S; D]) {
        for i in 0..D {
            self.min[i] = self.min[i].min(position[i]);
            self.max[i] = self.max[i].max(position[i]);
        }
    }

    /// Creates a new [`BoundingBox`] that contains the given positions.
    #[inline]
    pub fn with<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = [S; D]>,
    {
        let mut result = Self::default();
        for position in positions {
            result.extend(&position);
        }
        result
    }

    /// Creates a new square [`BoundingBox`] that contains the given positions.
    #[inline]
    pub fn square_with<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = [S; D]>,
    {
        let mut result = Self::with(positions);

        let center = result.center();
        let half_length = result.size().into_iter().fold(S::default(), S::max).half();

        for i in 0..D {
            result.min[i] = center[i] - half_length;
            result.max[i] = center[i] + half_length;
        }

        result
    }

    /// Returns the center of the [`BoundingBox`].
    #[inline]
    pub fn center(&self) -> [S; D] {
        std::array::from_fn(|i| self.min[i].midpoint(self.max[i]))
    }

    /// Returns the size of the [`BoundingBox`].
    #[inline]
    pub fn size(&self) -> [S; D] {
        std::array::from_fn(|i| self.max[i] - self.min[i])
    }

    /// Returns the squared distance between the given point and the closest point of the
    /// [`BoundingBox`], zero if the point is inside.
    #[inline]
    pub fn distance_squared(&self, point: &[S; D]) -> S {
        let mut result = S::default();
        for i in 0..D {
            let d = if point[i] < self.min[i] {
                self.min[i] - point[i]
            } else if point[i] > self.max[i] {
                point[i] - self.max[i]
            } else {
                continue;
            };
            result = result + d * d;
        }
        result
    }

    /// Subdivides this [`BoundingBox`] into `X` bounding boxes. This only works
    /// if `X = 2^D`.
    ///
    /// The `i`-th box is the lower half along dimension `j` when bit `j` of `i` is set.
    #[inline]
    pub fn subdivide<const X: usize>(&self) -> [Self; X] {
        let center = self.center();

        std::array::from_fn(|i| {
            let mut corner_min = self.min;
            let mut corner_max = self.max;

            for j in 0..D {
                if i & (1 << j) == 0 {
                    corner_min[j] = center[j];
                } else {
                    corner_max[j] = center[j];
                }
            }

            Self::new(corner_min, corner_max)
        })
    }

    /// Returns the index of the box returned by [`BoundingBox::subdivide`] that contains the
    /// given position.
    #[inline]
    pub fn orthant_of(center: &[S; D], position: &[S; D]) -> usize {
        (0..D).fold(0, |index, i| {
            index + (usize::from(position[i] < center[i]) << i)
        })
    }
}

/// Marker trait for the division of a dimension.
pub trait SubDivide {
    /// An array type with the amount of divisions as its size.
    type Division;
}

/// Marker struct for a constant.
#[derive(Clone, Copy, Debug)]
pub struct Const<const D: usize>;

macro_rules! impl_subdivide {
    ($($dim: literal),*) => {$(
        impl SubDivide for Const<$dim> {
            type Division = Const<{ 2usize.pow($dim) }>;
        }
    )*};
}

impl_subdivide!(1, 2, 3);

/// Division in `X` regions of the Euclidean space.
pub type Orthant<const X: usize, N> = [N; X];
