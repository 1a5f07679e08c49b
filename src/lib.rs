//! # hypercover
//!
//! `hypercover` builds overlapping hyper-rectangular covers of point clouds in lens space,
//! the covering step of the Mapper algorithm for topological data analysis. It can be used
//! from Rust as well as compiled to WebAssembly (WASM).
//!
//! ## Features
//!
//! - **Regular grids**: Splits the range of every lens dimension into a configurable number of cubes.
//! - **Overlap**: Extends each cube by a fraction of its width so that neighbouring cubes share members.
//! - **Bounded covers**: Pins any lower or upper bound per dimension instead of using the data range.
//! - **Parallel membership**: Evaluates all cubes at once with `rayon`.
//!
//! ## Example
//!
//! ```
//! use hypercover::Cover;
//! use ndarray::array;
//!
//! // Column 0 holds row identifiers, the remaining columns are lens coordinates.
//! let data = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
//!
//! let cover = Cover::new(2, 0.0);
//! let geometry = cover.define_bins(data.view()).unwrap();
//! assert_eq!(geometry.cubes().len(), 2);
//!
//! let first = cover.find_entries(data.view(), &geometry, &[0]).unwrap();
//! assert_eq!(first.column(0).to_vec(), vec![0.0, 1.0]);
//! ```
//!
//! ## Main Interface
//!
//! The primary entry point is the [`Cover`] struct, whose [`Cover::define_bins`] returns the
//! [`CoverGeometry`] used for every membership query.

mod bounds;
mod cover;
mod cubes;
mod error;
mod geometry;
pub mod wasm;

pub use bounds::BoundingBox;
pub use bounds::Limits;
pub use cover::Cover;
pub use cover::CoverConfig;
pub use cover::DEFAULT_N_CUBES;
pub use cover::DEFAULT_PERC_OVERLAP;
pub use cubes::CubeCount;
pub use cubes::CubeIter;
pub use error::CoverError;
pub use error::Result;
pub use geometry::CoverGeometry;
