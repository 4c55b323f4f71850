pub mod cleanup;
pub mod clock;
pub mod hasher;
pub mod keys;
pub mod ttl_cache;

pub use cleanup::CleanupTask;
pub use clock::{ManualClock, SystemClock};
pub use hasher::ContentHasher;
pub use keys::{CacheKeyBuilder, StatCategory};
pub use ttl_cache::{CacheEntry, CacheStats, TtlCache, DEFAULT_TTL};
