//! SeaORM entities, one table per collection.

pub mod blog;
pub mod user;
