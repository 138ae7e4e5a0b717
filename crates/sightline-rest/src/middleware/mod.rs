//! HTTP middleware.

mod logging;
mod panic;

pub use logging::{current_request_id, logging_middleware, REQUEST_ID_HEADER};
pub use panic::handle_panic;
