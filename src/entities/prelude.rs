pub use super::hosts::Entity as Hosts;
pub use super::notifications::Entity as Notifications;
pub use super::users::Entity as Users;
pub use super::visits::Entity as Visits;
