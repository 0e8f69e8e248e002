pub mod codes;
pub mod events;
pub mod lifecycle;
pub mod principal;

pub use codes::{CodeSlot, generate_code, validate_code};
pub use events::NotificationEvent;
pub use lifecycle::{HostConfirmation, VisitEvent, VisitStatus};
pub use principal::{Principal, PrincipalKind, StaffRole};
