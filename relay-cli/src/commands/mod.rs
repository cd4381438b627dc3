//! CLI command implementations

pub mod relay;
pub mod summary;

pub use relay::RelayArgs;
pub use summary::SummaryArgs;
