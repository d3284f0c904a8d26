//! View state controllers.
//!
//! One controller per screen. Controllers call the [`ApiClient`](crate::api::ApiClient),
//! hold loading/error/data state and report outcomes to the user through a
//! [`Notifier`]. Rendering is left to the embedding UI.

mod detail;
mod form;
mod list;
mod notify;
mod resume;
mod route;

pub use detail::*;
pub use form::*;
pub use list::*;
pub use notify::*;
pub use resume::*;
pub use route::*;
