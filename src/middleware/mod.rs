pub mod auth;
pub mod require_creator;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use require_creator::require_creator_middleware;
pub use response::{ApiResponse, ApiResult};
