pub mod host;
pub mod notification;
pub mod user;
pub mod visit;
