//! Configuration for the gRPC write path.

use crate::error::{ClientError, Result};

/// Protocol version sent in every write request.
pub const DEFAULT_WRITE_VERSION: u32 = 0;

/// Server endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Host name or IP.
    pub host: String,
    /// Port.
    pub port: u16,
}

impl Address {
    /// Creates an address.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// Authentication scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthType {
    /// Username and password.
    #[default]
    Password,
    /// Bearer token.
    Token,
}

/// Credentials for the server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthConfig {
    /// Scheme in use.
    pub auth_type: AuthType,
    /// Username, for [`AuthType::Password`].
    pub username: String,
    /// Password, for [`AuthType::Password`].
    pub password: String,
    /// Token, for [`AuthType::Token`].
    pub token: String,
}

impl AuthConfig {
    /// Password credentials.
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            auth_type: AuthType::Password,
            username: username.into(),
            password: password.into(),
            token: String::new(),
        }
    }

    /// Token credentials.
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            auth_type: AuthType::Token,
            token: token.into(),
            ..Self::default()
        }
    }

    /// Checks that the fields required by the scheme are set.
    pub fn validate(&self) -> Result<()> {
        match self.auth_type {
            AuthType::Password if self.username.is_empty() => Err(ClientError::Config(
                "invalid auth config due to empty username".to_string(),
            )),
            AuthType::Password if self.password.is_empty() => Err(ClientError::Config(
                "invalid auth config due to empty password".to_string(),
            )),
            AuthType::Token if self.token.is_empty() => Err(ClientError::Config(
                "invalid auth config due to empty token".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Configuration for gRPC writes.
#[derive(Debug, Clone)]
pub struct GrpcConfig {
    /// Server endpoints.
    pub addresses: Vec<Address>,
    /// Optional credentials.
    pub auth: Option<AuthConfig>,
    /// Retention policy for writes; empty selects the database default.
    pub retention_policy: String,
    /// Protocol version.
    pub version: u32,
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            addresses: Vec::new(),
            auth: None,
            retention_policy: String::new(),
            version: DEFAULT_WRITE_VERSION,
        }
    }
}

impl GrpcConfig {
    /// Creates a configuration for the given endpoints.
    pub fn new(addresses: Vec<Address>) -> Self {
        Self {
            addresses,
            ..Self::default()
        }
    }

    /// Sets credentials.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the retention policy.
    pub fn with_retention_policy(mut self, rp: impl Into<String>) -> Self {
        self.retention_policy = rp.into();
        self
    }

    /// Checks endpoints and credentials.
    pub fn validate(&self) -> Result<()> {
        if self.addresses.is_empty() {
            return Err(ClientError::Config(
                "must have at least one address".to_string(),
            ));
        }
        if let Some(auth) = &self.auth {
            auth.validate()?;
        }
        Ok(())
    }

    /// Username and password carried in write requests.
    ///
    /// Token credentials travel out of band, so they yield empty strings.
    pub fn credentials(&self) -> (&str, &str) {
        match &self.auth {
            Some(auth) if auth.auth_type == AuthType::Password => {
                (auth.username.as_str(), auth.password.as_str())
            }
            _ => ("", ""),
        }
    }
}
