//! Middleware for request tracking and content negotiation

pub mod content_negotiation;
pub mod request_tracking;

pub use content_negotiation::{accepts_json, require_json};
pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers_layer, REQUEST_ID_HEADER,
    SENSITIVE_HEADERS,
};
