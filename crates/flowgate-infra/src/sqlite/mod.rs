//! SQLite persistence layer.

pub mod pool;
pub mod user;

pub use pool::DatabasePool;
pub use user::SqliteUserRepository;
