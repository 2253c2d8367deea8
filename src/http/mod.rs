//! HTTP protocol layer module
//!
//! Translates between hyper's wire types and the transport-independent
//! document request/response.

pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::{to_document_request, Rejection};
pub use response::{
    build_400_response, build_413_response, build_500_response, build_document_response,
    build_health_response,
};
