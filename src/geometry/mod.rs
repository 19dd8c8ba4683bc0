//! Pixel-space geometry: projection, hit-testing, and feature identity.
//!
//! Everything in this module operates in the pixel frame of the fetched
//! tile: [`project`] maps tile-local geometry and the query point into that
//! frame, [`hit`] decides whether a feature would be drawn under the query
//! point, [`cache`] memoizes the projected geometries and point distances,
//! and [`key`] assigns each feature the identity used for memoization and
//! result deduplication.

pub mod cache;
pub mod hit;
pub mod key;
pub mod project;

pub use cache::{DistanceCache, GeometryCache};
pub use hit::{distance_to_point, hit_test};
pub use key::{FeatureKey, FeatureKeyResolver};
pub use project::{Projection, DEFAULT_TILE_SIZE};
