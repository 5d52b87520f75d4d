pub mod sqlite;
pub mod tables;

pub use sqlite::{Database, DbConn, DbError, DbResult};
