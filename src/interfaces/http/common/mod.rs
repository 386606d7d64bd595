pub mod api_response;
pub mod error;
pub mod validated_json;

pub use api_response::{ApiResponse, EmptyData, PaginatedResponse, PaginationParams};
pub use error::{domain_error, money_field, money_field_signed, ApiError, ApiResult};
pub use validated_json::ValidatedJson;
