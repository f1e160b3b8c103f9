/// Error returned by the checked accessors of a [`CrsGraph`](crate::neighbor::CrsGraph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NeighborError {
    /// The particle is not one of the particles the list was built over.
    #[error("particle {particle} is out of range for {total} particles")]
    ParticleOutOfRange {
        /// Requested particle.
        particle: usize,
        /// Number of particles the list was built over.
        total: usize,
    },

    /// The particle has fewer neighbors than requested.
    #[error("neighbor {neighbor} is out of range for particle {particle} with {count} neighbors")]
    NeighborOutOfRange {
        /// Requested particle.
        particle: usize,
        /// Requested neighbor position.
        neighbor: usize,
        /// Number of neighbors of the particle.
        count: usize,
    },
}
