//! API request and response types

mod error;
mod json;
mod resolve;

pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use resolve::{ClassificationLogList, OriginKind, ResolveRequest, ResolveResponse};
