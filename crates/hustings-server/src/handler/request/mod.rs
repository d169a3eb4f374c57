//! Request types for HTTP handlers.

mod articles;
mod authentications;
mod comments;
mod events;
mod paginations;
mod paths;
mod users;
mod validations;

pub use articles::*;
pub use authentications::*;
pub use comments::*;
pub use events::*;
pub use paginations::*;
pub use paths::*;
pub use users::*;
