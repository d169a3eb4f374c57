//! Response types for HTTP handlers.

mod articles;
mod authentications;
mod comments;
mod error_response;
mod events;
mod monitors;
mod system;
mod users;

pub use articles::*;
pub use authentications::*;
pub use comments::*;
pub use error_response::ErrorResponse;
pub use events::*;
pub use monitors::*;
pub use system::*;
pub use users::*;
