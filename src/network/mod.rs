pub mod consensus;
pub mod registry;

pub use consensus::{ChainFetcher, HttpChainFetcher, resolve_conflicts};
pub use registry::NodeRegistry;
