pub mod clock;
pub mod count_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use count_cache::{CountCache, CountKey, DEFAULT_TTL};
