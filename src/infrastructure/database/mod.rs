pub mod seed;
pub mod sqlite;
