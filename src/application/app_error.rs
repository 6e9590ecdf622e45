use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid billing cycle: {0}")]
    InvalidBillingCycle(String),

    #[error("Payment not completed: {0}")]
    PaymentNotCompleted(String),

    #[error("Payment provider error: {0}")]
    Provider(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether redelivering the same event could succeed later.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Database(_) | AppError::Internal(_) => true,

            AppError::InvalidCredentials
            | AppError::Forbidden
            | AppError::InvalidInput(_)
            | AppError::InvalidBillingCycle(_)
            | AppError::PaymentNotCompleted(_)
            | AppError::Provider(_)
            | AppError::NotFound => false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    DatabaseError,
    InvalidCredentials,
    Forbidden,
    InvalidInput,
    InvalidBillingCycle,
    PaymentNotCompleted,
    ProviderError,
    NotFound,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::InvalidBillingCycle => "INVALID_BILLING_CYCLE",
            ErrorCode::PaymentNotCompleted => "PAYMENT_NOT_COMPLETED",
            ErrorCode::ProviderError => "PROVIDER_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
