mod extract;
mod response;
mod validated_json;

pub use extract::{ApiPath, ApiQuery, ExtractRejection};
pub use response::{ApiError, ApiResponse, ApiResult, EmptyData};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
