use derive_more::Display;

#[derive(Debug, Display, PartialEq, Eq, Clone, Copy)]
pub enum ErrorCode {
    #[display(fmt = "invalid-argument")]
    InvalidArgument,

    #[display(fmt = "failed-precondition")]
    FailedPrecondition,

    #[display(fmt = "permission-denied")]
    PermissionDenied,

    #[display(fmt = "not-found")]
    NotFound,

    #[display(fmt = "already-exists")]
    AlreadyExists,

    #[display(fmt = "internal")]
    Internal,
}

impl ErrorCode {
    /// Process exit status used by the runner.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::InvalidArgument => 2,
            ErrorCode::FailedPrecondition => 3,
            ErrorCode::PermissionDenied => 4,
            ErrorCode::NotFound => 5,
            ErrorCode::AlreadyExists => 6,
            ErrorCode::Internal => 1,
        }
    }
}
