pub mod health;
pub mod microblogs;
pub mod relations;
pub mod tokens;
