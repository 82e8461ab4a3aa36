//! Service layer
//!
//! Read-side services composing the repository traits into the results
//! the platform renders. Services are generic over the cache so a
//! misbehaving cache backend can be exercised in tests; production code
//! uses the default `Cache` parameter.

pub mod recommendation;
pub mod statistics;

pub use recommendation::{RecommendationError, RecommendationService};
pub use statistics::{StatisticsError, StatisticsService};
