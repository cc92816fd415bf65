//! HTTP protocol layer module
//!
//! Response builders and the cross-origin policy, decoupled from the tenant
//! lookup logic.

pub mod cors;
pub mod response;

// Re-export commonly used types
pub use cors::CorsPolicy;
pub use response::{
    build_404_response, build_405_response, build_json_response, build_text_response,
};
