use crate::{
    position::Coordinates,
    tree::{distance_squared, BoundingBox, Real},
};

/// Sphere used as a spatial query.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sphere<S> {
    /// Centre of the sphere.
    pub centre: [S; 3],
    /// Radius of the sphere.
    pub radius: S,
}

impl<S: Real> Sphere<S> {
    /// Creates a new [`Sphere`] with the given centre and radius.
    #[inline]
    pub const fn new(centre: [S; 3], radius: S) -> Self {
        Self { centre, radius }
    }

    /// Returns the squared radius, or `None` if the radius is negative or NaN.
    #[inline]
    pub fn radius_squared(&self) -> Option<S> {
        (self.radius >= S::default()).then(|| self.radius * self.radius)
    }

    /// Returns `true` if the point lies inside or on the sphere.
    #[inline]
    pub fn contains(&self, point: &[S; 3]) -> bool {
        self.radius_squared()
            .is_some_and(|r2| distance_squared(&self.centre, point) <= r2)
    }

    /// Returns `true` if the sphere and the box have at least one point in common.
    #[inline]
    pub fn intersects_box(&self, bbox: &BoundingBox<[S; 3]>) -> bool {
        self.radius_squared()
            .is_some_and(|r2| bbox.distance_squared(&self.centre) <= r2)
    }
}

/// A predicate paired with user data returned alongside its results.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attached<P, D> {
    /// The spatial predicate.
    pub predicate: P,
    /// Data attached to the predicate.
    pub data: D,
}

/// Set of sphere predicates, one per particle of the range `[first, last)` of a coordinate
/// source.
///
/// The data attached to each predicate is the global index of its particle.
pub struct Predicates<'a, C: Coordinates + ?Sized> {
    coordinates: &'a C,
    first: usize,
    last: usize,
    radius: C::Scalar,
}

impl<C: Coordinates + ?Sized> Clone for Predicates<'_, C> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: Coordinates + ?Sized> Copy for Predicates<'_, C> {}

impl<C: Coordinates + ?Sized> std::fmt::Debug for Predicates<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predicates")
            .field("first", &self.first)
            .field("last", &self.last)
            .field("radius", &self.radius)
            .finish_non_exhaustive()
    }
}

impl<'a, C: Coordinates + ?Sized> Predicates<'a, C> {
    /// Returns the number of predicates.
    #[inline]
    pub fn len(&self) -> usize {
        self.last - self.first
    }

    /// Returns `true` if the set holds no predicate.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first == self.last
    }

    /// Returns the first particle covered by the set.
    #[inline]
    pub fn first(&self) -> usize {
        self.first
    }

    /// Returns the particle following the last one covered by the set.
    #[inline]
    pub fn last(&self) -> usize {
        self.last
    }

    /// Returns the radius shared by every sphere.
    #[inline]
    pub fn radius(&self) -> C::Scalar {
        self.radius
    }

    /// Returns the `i`-th predicate, centred on particle `first + i` and tagged with that index.
    #[inline]
    pub fn get(&self, i: usize) -> Attached<Sphere<C::Scalar>, usize> {
        debug_assert!(i < self.len(), "predicate {i} out of {}", self.len());

        let particle = self.first + i;
        Attached {
            predicate: Sphere::new(self.coordinates.coordinates(particle), self.radius),
            data: particle,
        }
    }

    /// Returns an iterator over the predicates.
    #[inline]
    pub fn iter(
        &self,
    ) -> impl ExactSizeIterator<Item = Attached<Sphere<C::Scalar>, usize>> + 'a {
        let predicates = *self;
        (0..self.len()).map(move |i| predicates.get(i))
    }
}

/// Creates the set of sphere predicates of the given radius centred on the particles
/// `[first, last)`.
///
/// # Example
///
/// ```
/// use particulate::predicate::make_predicates;
///
/// let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
/// let predicates = make_predicates(points.as_slice(), 1, 3, 0.5);
///
/// assert_eq!(predicates.len(), 2);
/// assert_eq!(predicates.get(0).data, 1);
/// assert_eq!(predicates.get(1).predicate.centre, [2.0, 0.0, 0.0]);
/// ```
#[inline]
pub fn make_predicates<C>(
    coordinates: &C,
    first: usize,
    last: usize,
    radius: C::Scalar,
) -> Predicates<'_, C>
where
    C: Coordinates + ?Sized,
{
    debug_assert!(first <= last && last <= coordinates.len());

    Predicates {
        coordinates,
        first,
        last,
        radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_contains_its_boundary() {
        let sphere = Sphere::new([0.0, 0.0, 0.0], 2.0);
        assert!(sphere.contains(&[2.0, 0.0, 0.0]));
        assert!(sphere.contains(&[0.0, -1.0, 1.0]));
        assert!(!sphere.contains(&[2.0, 0.1, 0.0]));

        let bbox = BoundingBox::new([2.0, -1.0, -1.0], [3.0, 1.0, 1.0]);
        assert!(sphere.intersects_box(&bbox));
        assert!(!Sphere::new([-0.5, 0.0, 0.0], 2.0).intersects_box(&bbox));
    }

    #[test]
    fn degenerate_radii() {
        assert_eq!(Sphere::new([0.0; 3], 0.0).radius_squared(), Some(0.0));
        assert!(Sphere::new([0.0; 3], 0.0).contains(&[0.0; 3]));
        assert_eq!(Sphere::new([0.0f32; 3], -1.0).radius_squared(), None);
        assert_eq!(Sphere::new([0.0f64; 3], f64::NAN).radius_squared(), None);
        assert!(!Sphere::new([0.0; 3], -1.0).contains(&[0.0; 3]));
    }

    #[test]
    fn predicates_carry_global_indices() {
        let points: Vec<[f64; 3]> = (0..10).map(|i| [i as f64, 0.0, 0.0]).collect();
        let predicates = make_predicates(&points, 4, 7, 1.5);

        assert_eq!(predicates.len(), 3);
        assert_eq!((predicates.first(), predicates.last()), (4, 7));

        let all: Vec<_> = predicates.iter().collect();
        assert_eq!(all.len(), 3);
        for (i, attached) in all.into_iter().enumerate() {
            assert_eq!(attached.data, 4 + i);
            assert_eq!(attached.predicate.centre, [(4 + i) as f64, 0.0, 0.0]);
            assert_eq!(attached.predicate.radius, 1.5);
        }

        assert!(make_predicates(&points, 5, 5, 1.0).is_empty());
    }
}
