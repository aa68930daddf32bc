pub mod memory;
pub mod postgres;
pub mod sqlite;
pub mod trait_def;

mod rows;

pub use memory::MemorySource;
pub use postgres::PostgresSource;
pub use sqlite::SqliteSource;
pub use trait_def::{FetchError, FetchResult, RecordSource};
