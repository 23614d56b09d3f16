//! Database access: connection pooling and the MySQL repository
//! implementations.

pub mod connection;
pub mod mysql;

pub use connection::DatabasePool;
