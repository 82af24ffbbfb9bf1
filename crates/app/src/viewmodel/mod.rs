//! View models behind the console pages

mod admin;
mod home;

pub use admin::{AdminApi, AdminData, AdminSession, Entity, Status, StatusKind};
pub use home::HomePage;
