//! Mapping between error codes and HTTP statuses

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Status the REST API answers with for this code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound
            | Self::ProductNotFound
            | Self::ProductImageNotFound
            | Self::VariantNotFound
            | Self::SizeNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists | Self::EditSessionActive | Self::SaveInProgress => {
                StatusCode::CONFLICT
            }

            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied => StatusCode::FORBIDDEN,

            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            Self::UnsupportedFileFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,

            // Transient, worth retrying
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            Self::InternalError | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // Draft and upload rule violations
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Best-effort classification of a bare HTTP status returned by the REST API
    ///
    /// Used when the response body carries no structured error code.
    pub fn from_http_status(status: StatusCode) -> Self {
        match status {
            s if s.is_success() => Self::Success,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::AlreadyExists,
            StatusCode::UNAUTHORIZED => Self::NotAuthenticated,
            StatusCode::FORBIDDEN => Self::PermissionDenied,
            StatusCode::PAYLOAD_TOO_LARGE => Self::FileTooLarge,
            StatusCode::UNSUPPORTED_MEDIA_TYPE => Self::UnsupportedFileFormat,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::ValidationFailed,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::TimeoutError,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => Self::NetworkError,
            _ => Self::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_ok() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn lookups_map_to_404() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::ProductNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::VariantNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn session_conflicts_map_to_409() {
        assert_eq!(ErrorCode::AlreadyExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::SaveInProgress.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn upload_errors_use_media_statuses() {
        assert_eq!(
            ErrorCode::FileTooLarge.http_status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ErrorCode::UnsupportedFileFormat.http_status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(ErrorCode::EmptyFile.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rule_violations_map_to_400() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ProductInvalidPrice.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::SizeLabelRequired.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn bare_statuses_are_classified() {
        assert_eq!(ErrorCode::from_http_status(StatusCode::OK), ErrorCode::Success);
        assert_eq!(
            ErrorCode::from_http_status(StatusCode::UNAUTHORIZED),
            ErrorCode::NotAuthenticated
        );
        assert_eq!(
            ErrorCode::from_http_status(StatusCode::UNPROCESSABLE_ENTITY),
            ErrorCode::ValidationFailed
        );
        assert_eq!(
            ErrorCode::from_http_status(StatusCode::SERVICE_UNAVAILABLE),
            ErrorCode::NetworkError
        );
        assert_eq!(
            ErrorCode::from_http_status(StatusCode::IM_A_TEAPOT),
            ErrorCode::InternalError
        );
    }
}
