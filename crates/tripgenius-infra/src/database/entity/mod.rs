//! SeaORM entities and their conversions to domain types.

pub mod trip;
pub mod user;
