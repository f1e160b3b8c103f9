#![warn(missing_docs)]
//! # Particulate
//!
//! Particulate is a crate providing two building blocks of particle-based simulations in Rust:
//! structure-of-arrays storage of per-particle fields and parallel construction of neighbor
//! lists.
//!
//! ## Goals
//!
//! The main goal of this crate is to provide the data layout and the neighbor search that
//! particle methods (molecular dynamics, SPH, DEM, ...) build upon, without imposing a particle
//! container, an integrator or a force model. Both building blocks are configured at compile time
//! and can be integrated into existing simulation codes.
//!
//! ### Structure-of-arrays blocks
//!
//! A [`SoA`](soa::SoA) block stores the fields of a fixed number of particles, each field as one
//! contiguous inner array. Fields are plain-data scalars or nested arrays of them, listed as a
//! tuple, and the inner arrays are laid out in [`RowMajor`](soa::RowMajor) or
//! [`ColumnMajor`](soa::ColumnMajor) order. A block has the same size and alignment as the
//! equivalent `#[repr(C)]` struct.
//!
//! ```
//! use particulate::soa::{InnerArrayLayout, RowMajor, SoA};
//!
//! // Position, velocity and a stress tensor for 16 particles per block.
//! type Fields = ([f64; 3], [f64; 3], [[f32; 3]; 3]);
//! type Block = SoA<InnerArrayLayout<16, RowMajor>, Fields>;
//!
//! let mut block = Block::zeroed();
//! *block.get_mut::<2>(5, &[0, 1]) = 2.5;
//!
//! assert_eq!(block.member::<2>()[0][1][5], 2.5);
//! assert_eq!(std::mem::size_of::<Block>(), 16 * (3 * 8 + 3 * 8 + 9 * 4));
//! ```
//!
//! ### Neighbor lists
//!
//! [`make_neighbor_list`](neighbor::make_neighbor_list) finds, for every particle of a range,
//! the particles within a cutoff radius using a spatial index and stores them in a compressed
//! row graph. A [`FullNeighbor`](neighbor::FullNeighbor) list stores every pair for both of its
//! particles, a [`HalfNeighbor`](neighbor::HalfNeighbor) list only for the one with the larger
//! index.
//!
//! The work is distributed over an [`ExecutionSpace`]: [`Serial`](sequential::Serial) runs on
//! the calling thread, and enabling the `parallel` feature gives access to
//! [`Threads`](parallel::Threads), which uses [rayon](https://github.com/rayon-rs/rayon).
//!
//! ```
//! use particulate::prelude::*;
//!
//! #[derive(Position)]
//! struct Atom {
//!     position: [f64; 3],
//!     mass: f64,
//! }
//!
//! let atoms: Vec<Atom> = (0..100)
//!     .map(|i| Atom { position: [i as f64 * 0.5, 0.0, 0.0], mass: 1.0 })
//!     .collect();
//!
//! let list = make_neighbor_list(&Serial, HalfNeighbor, atoms.as_slice(), 0, atoms.len(), 1.0);
//!
//! assert_eq!(list.neighbor_count(0), 0);
//! assert_eq!(list.neighbor_count(10), 2);
//! assert!(list.neighbors(10).iter().all(|&j| j == 8 || j == 9));
//! ```
//!
//! Positions can also be read from a field of SoA blocks with
//! [`MemberCoordinates`](position::MemberCoordinates), and the spatial index can be chosen with
//! [`make_neighbor_list_with`](neighbor::make_neighbor_list_with).

/// Checked access errors.
pub mod error;
/// Spatial indexes answering sphere queries.
pub mod index;
/// Neighbor list construction and access.
pub mod neighbor;
/// Execution space that uses multiple CPU threads.
#[cfg(feature = "parallel")]
pub mod parallel;
/// Particle positions and coordinate sources.
pub mod position;
/// Spatial predicates built from particles.
pub mod predicate;
/// Execution space that uses one CPU thread.
pub mod sequential;
/// Structure-of-arrays layout of particle fields.
pub mod soa;
/// Tree and space partitioning implementation.
pub mod tree;

/// Trait for a strategy running per-index work.
///
/// Implementations decide how the indices are distributed, on the calling thread with
/// [`Serial`](sequential::Serial) or over a thread pool with `Threads`.
///
/// Execution spaces only schedule work: every buffer they return lives in host memory as a
/// [`Vec`], and no hook is provided for allocating in another memory domain.
pub trait ExecutionSpace: Sync {
    /// Returns the results of `f` for every index in `0..len`, in order.
    fn map_indices<T, F>(&self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send;

    /// Calls `f` with every item and its index.
    fn for_each_mut<T, F>(&self, items: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync + Send;
}

/// Commonly used types, re-exported.
pub mod prelude {
    // Common traits and their derive macros.
    pub use crate::{
        index::{BruteForce, RootedOrthtree, SpatialIndex},
        neighbor::{
            make_neighbor_list, make_neighbor_list_with, CrsGraph, FullNeighbor, HalfNeighbor,
            NeighborKind, NeighborList,
        },
        position::{Coordinates, MemberCoordinates, Position},
        soa::{ColumnMajor, InnerArrayLayout, RowMajor, SoA},
        ExecutionSpace,
    };
    pub use particulate_derive::Position;

    #[cfg(feature = "parallel")]
    pub use crate::parallel::Threads;
    pub use crate::sequential::Serial;
}
