//! Typed user dataset and fixture generation.

mod generator;
mod user;

pub use generator::generate_users;
pub use user::User;
