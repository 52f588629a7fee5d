pub mod auth;
pub mod observability;
