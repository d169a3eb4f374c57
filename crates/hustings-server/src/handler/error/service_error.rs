//! Service error to HTTP error conversion.
//!
//! Service errors never carry client-facing detail, so every kind becomes a
//! 5xx and the original error is only logged.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::error::{Error as ServiceError, ErrorKind as ServiceErrorKind};

const TRACING_TARGET: &str = "hustings_server::handler::service";

impl From<ServiceError> for HttpError<'static> {
    fn from(error: ServiceError) -> Self {
        match error.kind() {
            ServiceErrorKind::Database => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "backing service failed"
                );
                ErrorKind::ServiceUnavailable.into_error()
            }
            kind => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = %kind,
                    "service operation failed"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_failures_are_unavailable() {
        let error: HttpError = ServiceError::new(ServiceErrorKind::Database, "down").into();
        assert_eq!(error.kind(), ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn internal_failures_hide_detail() {
        let error: HttpError = ServiceError::new(ServiceErrorKind::Internal, "overflow").into();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.message(), None);
    }
}
