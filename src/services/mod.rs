pub mod auth_service;
pub mod auth_service_impl;
pub mod notifier;
pub mod visit_service;
pub mod visit_service_impl;

pub use auth_service::{AuthError, AuthService, PrincipalInfo};
pub use auth_service_impl::SeaOrmAuthService;
pub use notifier::NotifierService;
pub use visit_service::{RegisterVisit, VisitError, VisitService};
pub use visit_service_impl::SeaOrmVisitService;
