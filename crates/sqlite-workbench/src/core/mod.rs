pub mod connection;
pub mod limits;
pub mod query;
pub mod schema;
pub mod types;
