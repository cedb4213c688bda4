//! Terminal account credentials, held only in memory for one run.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("login must be a numeric account id, got '{0}'")]
    InvalidLogin(String),

    #[error("server name must not be empty")]
    EmptyServer,
}

/// Account login, password and trade server name.
///
/// `Debug` never prints the password.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub login: u64,
    pub password: String,
    pub server: String,
}

impl Credentials {
    /// Build credentials from raw prompt input.
    pub fn new(
        login: &str,
        password: impl Into<String>,
        server: &str,
    ) -> Result<Self, CredentialsError> {
        let login_trimmed = login.trim();
        let login = login_trimmed
            .parse::<u64>()
            .map_err(|_| CredentialsError::InvalidLogin(login_trimmed.to_string()))?;
        let server = server.trim();
        if server.is_empty() {
            return Err(CredentialsError::EmptyServer);
        }
        Ok(Self {
            login,
            password: password.into(),
            server: server.to_string(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("server", &self.server)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_login_and_trims_input() {
        let creds = Credentials::new(" 51234567\n", "s3cret", " Broker-Demo \n").unwrap();
        assert_eq!(creds.login, 51_234_567);
        assert_eq!(creds.server, "Broker-Demo");
        assert_eq!(creds.password, "s3cret");
    }

    #[test]
    fn rejects_non_numeric_login() {
        let err = Credentials::new("trader", "pw", "Broker-Demo").unwrap_err();
        assert_eq!(err, CredentialsError::InvalidLogin("trader".into()));
    }

    #[test]
    fn rejects_blank_server() {
        let err = Credentials::new("123", "pw", "   ").unwrap_err();
        assert_eq!(err, CredentialsError::EmptyServer);
    }

    #[test]
    fn debug_output_redacts_password() {
        let creds = Credentials::new("123", "hunter2", "Broker-Live").unwrap();
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }
}
