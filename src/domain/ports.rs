use crate::domain::model::ContentBundle;
use crate::utils::error::Result;
use std::time::Instant;

/// Time source for cache expiry. Injected so tests can move time by hand.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// A pure calculator: raw collections in, a fully populated aggregate out.
///
/// `calculate` may fail on malformed input; `fallback` never does and is what
/// callers receive instead of a partial result.
pub trait Calculator: Send + Sync {
    type Input<'a>: Copy;
    type Output: Clone + Send + Sync + 'static;

    fn name(&self) -> &'static str;

    fn calculate(&self, input: Self::Input<'_>) -> Result<Self::Output>;

    fn fallback(&self, input: Self::Input<'_>) -> Self::Output;
}

/// Where raw content collections come from. The core never does I/O itself.
pub trait ContentSource {
    fn load(&self) -> Result<ContentBundle>;
}
