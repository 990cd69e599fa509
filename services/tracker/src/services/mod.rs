//! Services owning the user and bug lifecycles
//!
//! Each public operation runs in exactly one transaction; dropping the
//! transaction on an early `?` rolls back anything written so far.

pub mod bugs;
pub mod users;

pub use bugs::BugService;
pub use users::UserService;

use crate::error::ServiceError;

pub type ServiceResult<T> = Result<T, ServiceError>;
