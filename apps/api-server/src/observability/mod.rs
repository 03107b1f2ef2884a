//! Observability module - request ids and request logging.

mod request_logger;

pub use request_logger::{REQUEST_ID_HEADER, RequestLogger};
