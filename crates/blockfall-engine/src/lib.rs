pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Rejected engine configuration.
///
/// Returned once, at construction; a running engine never re-validates its configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("grid width must be between {min} and {max}, got {width}")]
    InvalidWidth { width: usize, min: usize, max: usize },
    #[display("grid height must be between 1 and {max}, got {height}")]
    InvalidHeight { height: usize, max: usize },
    #[display("tick intervals must be non-zero")]
    ZeroInterval,
    #[display("quick interval ({quick_ms}ms) must not exceed normal interval ({normal_ms}ms)")]
    QuickSlowerThanNormal { quick_ms: u64, normal_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece seed: expected 32 hex digits, got '{input}'")]
pub struct ParseSeedError {
    input: String,
}

impl ParseSeedError {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
        }
    }
}
