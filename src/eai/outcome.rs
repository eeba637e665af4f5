use secrecy::SecretString;
use std::fmt;

/// Email value sent when the directory has no `userPrincipalName` for the account.
pub const NO_ACCESS_EMAIL: &str = "noaccess";

/// Redirect code for syntactically invalid input.
pub const INVALID_INPUT_CODE: u16 = 49;

/// Redirect code shared by every other failure.
pub const GENERIC_FAILURE_CODE: u16 = 50;

/// A username/password pair as posted by the proxy. Lives for one request.
#[derive(Debug)]
pub struct CredentialSubmission {
    pub identifier: String,
    pub secret: SecretString,
}

impl CredentialSubmission {
    #[must_use]
    pub fn new(identifier: impl Into<String>, secret: impl Into<SecretString>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

/// Proxy group assigned to an authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationGroup {
    Employee,
    Contractor,
    Finance,
}

impl AuthorizationGroup {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Contractor => "contractor",
            Self::Finance => "finance",
        }
    }
}

impl fmt::Display for AuthorizationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized identity handed to the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub sam_account_name: String,
    pub email_address: String,
    pub authorization_group: AuthorizationGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidInput,
    AuthenticationFailed,
    LookupFailed,
    UserNotFound,
    AccessDenied,
    DirectoryUnavailable,
}

impl ErrorCode {
    /// The value placed in `/login?error=`. Only invalid input is distinguishable.
    #[must_use]
    pub const fn redirect_code(self) -> u16 {
        match self {
            Self::InvalidInput => INVALID_INPUT_CODE,
            Self::AuthenticationFailed
            | Self::LookupFailed
            | Self::UserNotFound
            | Self::AccessDenied
            | Self::DirectoryUnavailable => GENERIC_FAILURE_CODE,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::AuthenticationFailed => "authentication_failed",
            Self::LookupFailed => "lookup_failed",
            Self::UserNotFound => "user_not_found",
            Self::AccessDenied => "access_denied",
            Self::DirectoryUnavailable => "directory_unavailable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(Credential),
    Rejected(ErrorCode),
}

impl Outcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Pipeline stages, used to label log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Authenticating,
    ResolvingAttributes,
    AuthorizingAndMapping,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Authenticating => "authenticating",
            Self::ResolvingAttributes => "resolving_attributes",
            Self::AuthorizingAndMapping => "authorizing_and_mapping",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
