//! Error handling - RFC 7807 problem responses.

use std::fmt;

use actix_web::error::{
    BlockingError, InternalError, JsonPayloadError, PathError, QueryPayloadError,
};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};

use tripgenius_core::error::{DomainError, RepoError};
use tripgenius_core::ports::{AuthError, ProviderError};
use tripgenius_shared::ErrorResponse;

use crate::observability::RequestId;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden,
    /// A third-party provider failed or answered nonsense.
    BadGateway(String),
    /// A third-party provider is not configured.
    ServiceUnavailable(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::BadGateway(msg) => write!(f, "Bad gateway: {msg}"),
            AppError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl AppError {
    /// Problem body for this error. Internal details are logged, not returned.
    pub fn problem(&self) -> ErrorResponse {
        match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized().with_detail(detail),
            AppError::Forbidden => ErrorResponse::forbidden()
                .with_detail("You do not have access to this resource"),
            AppError::BadGateway(detail) => {
                ErrorResponse::new(502, "Bad Gateway").with_detail(detail)
            }
            AppError::ServiceUnavailable(detail) => {
                ErrorResponse::new(503, "Service Unavailable").with_detail(detail)
            }
            AppError::Internal(_) => {
                ErrorResponse::internal_error().with_detail("Something went wrong")
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!(detail = %detail, "Internal error");
        }
        HttpResponse::build(self.status_code()).json(self.problem())
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity, id } => {
                AppError::NotFound(format!("{entity} with id {id} not found"))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => {
                tracing::warn!(constraint = %msg, "Write rejected by storage constraint");
                AppError::BadRequest("Request conflicts with existing data".to_string())
            }
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(what) => AppError::NotFound(format!("{what} not found")),
            ProviderError::NotConfigured(msg) => {
                tracing::warn!(reason = %msg, "Provider not configured");
                AppError::ServiceUnavailable(msg)
            }
            ProviderError::Upstream(msg) | ProviderError::Decode(msg) => {
                tracing::warn!(reason = %msg, "Provider call failed");
                AppError::BadGateway("Upstream service failed, please retry later".to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::TokenExpired => {
                AppError::Unauthorized("Your session has expired. Please log in again.".into())
            }
            AuthError::InvalidToken(msg) => AppError::Unauthorized(msg),
            AuthError::MissingAuth => AppError::Unauthorized(
                "Provide a Bearer token in the Authorization header".to_string(),
            ),
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

/// The blocking thread pool is gone, e.g. during shutdown.
impl From<BlockingError> for AppError {
    fn from(err: BlockingError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

fn extractor_error(
    err: impl fmt::Display + fmt::Debug + 'static,
    req: &HttpRequest,
) -> actix_web::Error {
    let detail = err.to_string();
    tracing::debug!(%detail, path = %req.path(), "Rejected malformed request");

    let mut body = AppError::BadRequest(detail).problem();
    if let Some(id) = RequestId::of(req) {
        body = body.with_request_id(id);
    }
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// Rewrites JSON body extractor failures into the problem body.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    extractor_error(err, req)
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    extractor_error(err, req)
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    extractor_error(err, req)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_domain_errors_map_to_status() {
        let cases = [
            (AppError::from(DomainError::validation("bad")), 400),
            (AppError::from(DomainError::Forbidden), 403),
            (
                AppError::from(DomainError::NotFound {
                    entity: "Trip",
                    id: Uuid::nil(),
                }),
                404,
            ),
            (AppError::from(RepoError::Query("boom".into())), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{err}");
        }
    }

    #[test]
    fn test_provider_errors_map_to_status() {
        let not_configured = AppError::from(ProviderError::NotConfigured("no key".into()));
        assert_eq!(not_configured.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let upstream = AppError::from(ProviderError::Upstream("HTTP 500".into()));
        assert_eq!(upstream.status_code(), StatusCode::BAD_GATEWAY);
        // Upstream details stay in the logs.
        assert!(!upstream.problem().message.contains("HTTP 500"));

        let missing = AppError::from(ProviderError::NotFound("city 'Atlantis'".into()));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let body = AppError::Internal("connection refused on 10.0.0.5".into()).problem();
        assert_eq!(body.status, 500);
        assert!(!body.message.contains("10.0.0.5"));

        let pool_gone = AppError::from(BlockingError);
        assert_eq!(pool_gone.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
