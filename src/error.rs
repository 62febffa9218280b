use std::{error::Error, fmt::Debug};

#[derive(thiserror::Error)]
pub enum CustomError {
    #[error("ENV '{0}' Not Found")]
    EnvError(String, #[source] std::env::VarError),

    #[error("ENV '{0}' has invalid value '{1}'")]
    InvalidConfig(String, String),

    #[error("Database error")]
    DBError(#[source] sqlx::Error),

    #[error("Database migration failed")]
    MigrateError(#[source] sqlx::migrate::MigrateError),

    #[error("Unsupported database backend '{0}'")]
    UnsupportedBackend(String),

    #[error("Account {0} not found")]
    AccountNotFound(String),

    #[error("Invalid value '{value}' for parameter '{param}'")]
    InvalidParam { param: String, value: String },

    #[error("Invalid account body: {0}")]
    InvalidBody(String),

    #[error("Account id '{body}' does not match path id '{path}'")]
    IdMismatch { path: String, body: String },

    #[error("Stored account row is corrupt: {0}")]
    CorruptRow(String),
}

impl CustomError {
    pub fn invalid_param(param: &str, value: &str) -> Self {
        CustomError::InvalidParam {
            param: param.to_string(),
            value: value.to_string(),
        }
    }

    /// Errors caused by the caller rather than by the service or its storage.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CustomError::InvalidParam { .. }
                | CustomError::InvalidBody(_)
                | CustomError::IdMismatch { .. }
        )
    }
}

impl From<serde_json::Error> for CustomError {
    fn from(err: serde_json::Error) -> Self {
        CustomError::InvalidBody(err.to_string())
    }
}

impl Debug for CustomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        if let Some(source) = self.source() {
            write!(f, " (Caused by: {})", source)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_includes_cause() {
        let err = CustomError::EnvError("DATABASE_URL".to_string(), std::env::VarError::NotPresent);
        let printed = format!("{:?}", err);
        assert!(printed.starts_with("ENV 'DATABASE_URL' Not Found"));
        assert!(printed.contains("Caused by"));
    }

    #[test]
    fn client_errors_are_classified() {
        assert!(CustomError::invalid_param("name", "abc1").is_client_error());
        assert!(!CustomError::AccountNotFound("1".to_string()).is_client_error());
        assert!(!CustomError::DBError(sqlx::Error::RowNotFound).is_client_error());
    }
}
