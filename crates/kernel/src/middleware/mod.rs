//! HTTP middleware components.

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestId, assign_request_id};
