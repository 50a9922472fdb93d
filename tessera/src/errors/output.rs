use super::Error;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    code: String,
    reason: String,
    message: String,
}

impl From<&Error> for ErrorOutput {
    fn from(err: &Error) -> Self {
        let reason = err.reason();
        ErrorOutput {
            error: ErrorDetail {
                code: reason.code().to_string(),
                reason: reason.to_string(),
                message: err.to_string(),
            },
        }
    }
}
