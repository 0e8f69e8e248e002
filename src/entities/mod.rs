pub mod prelude;

pub mod hosts;
pub mod notifications;
pub mod users;
pub mod visits;
