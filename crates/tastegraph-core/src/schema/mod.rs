mod db;
mod migrations;

pub use db::{keys, Store};
pub use migrations::{Migration, MIGRATIONS};
