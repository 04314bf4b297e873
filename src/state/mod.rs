//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedSet`: the shared set of claimed canonical URLs
//! - `InvocationState`: lifecycle of a single recursive crawl invocation

mod invocation;
mod visited;

pub use invocation::InvocationState;
pub use visited::VisitedSet;
