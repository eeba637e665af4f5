//! Outcome state machine.
//!
//! `Validating → Authenticating → ResolvingAttributes → AuthorizingAndMapping`,
//! with every stage allowed to end the run with `Outcome::Rejected`. Stages run
//! one after another and nothing after the first rejection is attempted. There are
//! no retries; a failed directory call is final for the submission.

use super::{
    outcome::{CredentialSubmission, ErrorCode, Outcome, Stage},
    policy, validator,
};
use crate::directory::{Directory, DirectoryError};
use std::{fmt, sync::Arc};
use tracing::{info, instrument};

pub struct Pipeline {
    directory: Arc<dyn Directory>,
    domain_suffix: String,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("domain_suffix", &self.domain_suffix)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    #[must_use]
    pub fn new(directory: Arc<dyn Directory>, domain_suffix: impl Into<String>) -> Self {
        Self {
            directory,
            domain_suffix: domain_suffix.into(),
        }
    }

    /// Run one submission to its terminal outcome.
    ///
    /// The submission is consumed so the secret is dropped once authentication is done.
    #[instrument(skip_all, fields(identifier = %submission.identifier))]
    pub async fn run(&self, submission: CredentialSubmission) -> Outcome {
        let CredentialSubmission { identifier, secret } = submission;

        if let Err(code) = validator::validate_identifier(&identifier) {
            return reject(&identifier, Stage::Validating, code, None);
        }

        let principal = format!("{identifier}{}", self.domain_suffix);
        let authenticated = self.directory.authenticate(&principal, &secret).await;
        drop(secret);

        match authenticated {
            Ok(true) => info!("Successfully authenticated {principal}"),
            Ok(false) => {
                return reject(
                    &identifier,
                    Stage::Authenticating,
                    ErrorCode::AuthenticationFailed,
                    None,
                );
            }
            Err(err) => {
                return reject(
                    &identifier,
                    Stage::Authenticating,
                    authentication_error_code(&err),
                    Some(&err),
                );
            }
        }

        let attributes = match self.directory.lookup(&identifier).await {
            Ok(Some(attributes)) => attributes,
            Ok(None) => {
                return reject(
                    &identifier,
                    Stage::ResolvingAttributes,
                    ErrorCode::UserNotFound,
                    None,
                );
            }
            Err(err) => {
                return reject(
                    &identifier,
                    Stage::ResolvingAttributes,
                    ErrorCode::LookupFailed,
                    Some(&err),
                );
            }
        };

        match policy::resolve(&attributes) {
            Ok(credential) => {
                info!(
                    "Credential created for {}, group = {}, email = {}",
                    credential.sam_account_name,
                    credential.authorization_group,
                    credential.email_address
                );
                Outcome::Success(credential)
            }
            Err(code) => {
                info!(
                    "DN not valid for access: {}",
                    attributes.distinguished_name
                );
                reject(&identifier, Stage::AuthorizingAndMapping, code, None)
            }
        }
    }
}

/// Unreachable directories are told apart from rejected binds for logging only.
const fn authentication_error_code(err: &DirectoryError) -> ErrorCode {
    if err.is_unavailable() {
        ErrorCode::DirectoryUnavailable
    } else {
        ErrorCode::AuthenticationFailed
    }
}

fn reject(
    identifier: &str,
    stage: Stage,
    code: ErrorCode,
    err: Option<&DirectoryError>,
) -> Outcome {
    match err {
        Some(err) => info!(
            stage = %stage,
            code = %code,
            "Rejected {identifier}: {err}"
        ),
        None => info!(stage = %stage, code = %code, "Rejected {identifier}"),
    }

    Outcome::Rejected(code)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::directory::AttributeSet;
    use crate::eai::outcome::{AuthorizationGroup, Credential, NO_ACCESS_EMAIL};
    use async_trait::async_trait;
    use secrecy::{ExposeSecret, SecretString};
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };
    use tracing_test::traced_test;

    pub(crate) enum AuthReply {
        Accept,
        Reject,
        Fail(fn() -> DirectoryError),
    }

    pub(crate) enum LookupReply {
        Found(AttributeSet),
        Missing,
        Fail(fn() -> DirectoryError),
    }

    /// Scripted directory that counts calls and records bind principals.
    pub(crate) struct FakeDirectory {
        auth: AuthReply,
        lookup: LookupReply,
        pub(crate) auth_calls: AtomicUsize,
        pub(crate) lookup_calls: AtomicUsize,
        pub(crate) principals: Mutex<Vec<String>>,
    }

    impl FakeDirectory {
        pub(crate) fn new(auth: AuthReply, lookup: LookupReply) -> Self {
            Self {
                auth,
                lookup,
                auth_calls: AtomicUsize::new(0),
                lookup_calls: AtomicUsize::new(0),
                principals: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> (usize, usize) {
            (
                self.auth_calls.load(Ordering::SeqCst),
                self.lookup_calls.load(Ordering::SeqCst),
            )
        }
    }

    #[async_trait]
    impl Directory for FakeDirectory {
        async fn authenticate(
            &self,
            principal: &str,
            secret: &SecretString,
        ) -> Result<bool, DirectoryError> {
            self.auth_calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut principals) = self.principals.lock() {
                principals.push(principal.to_string());
            }
            match &self.auth {
                AuthReply::Accept => Ok(secret.expose_secret() == "correct"),
                AuthReply::Reject => Ok(false),
                AuthReply::Fail(err) => Err(err()),
            }
        }

        async fn lookup(&self, _identifier: &str) -> Result<Option<AttributeSet>, DirectoryError> {
            self.lookup_calls.fetch_add(1, Ordering::SeqCst);
            match &self.lookup {
                LookupReply::Found(attributes) => Ok(Some(attributes.clone())),
                LookupReply::Missing => Ok(None),
                LookupReply::Fail(err) => Err(err()),
            }
        }
    }

    pub(crate) fn attributes(dn: &str, upn: Option<&str>) -> AttributeSet {
        AttributeSet {
            sam_account_name: "jdoe".to_string(),
            user_principal_name: upn.map(str::to_string),
            distinguished_name: dn.to_string(),
        }
    }

    fn finance_user() -> LookupReply {
        LookupReply::Found(attributes(
            "CN=John Doe,OU=Finance,DC=corp,DC=example,DC=com",
            Some("JDoe@EXAMPLE.COM"),
        ))
    }

    fn pipeline(directory: &Arc<FakeDirectory>) -> Pipeline {
        Pipeline::new(directory.clone(), "@corp.example.com")
    }

    #[tokio::test]
    async fn finance_user_succeeds() {
        let directory = Arc::new(FakeDirectory::new(AuthReply::Accept, finance_user()));
        let outcome = pipeline(&directory)
            .run(CredentialSubmission::new("jdoe", "correct"))
            .await;

        assert_eq!(
            outcome,
            Outcome::Success(Credential {
                sam_account_name: "jdoe".to_string(),
                email_address: "jdoe@example.com".to_string(),
                authorization_group: AuthorizationGroup::Finance,
            })
        );
        assert_eq!(directory.calls(), (1, 1));
    }

    #[tokio::test]
    async fn bind_principal_carries_domain_suffix() {
        let directory = Arc::new(FakeDirectory::new(AuthReply::Accept, finance_user()));
        pipeline(&directory)
            .run(CredentialSubmission::new("jdoe", "correct"))
            .await;

        let principals = directory
            .principals
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default();
        assert_eq!(principals, vec!["jdoe@corp.example.com".to_string()]);
    }

    #[tokio::test]
    async fn invalid_identifiers_never_reach_directory() {
        let long = "a".repeat(46);
        for identifier in ["", "ab", "j!", "j.doe", "jdoe@corp", long.as_str()] {
            let directory = Arc::new(FakeDirectory::new(AuthReply::Accept, finance_user()));
            let outcome = pipeline(&directory)
                .run(CredentialSubmission::new(identifier, "correct"))
                .await;

            assert_eq!(
                outcome,
                Outcome::Rejected(ErrorCode::InvalidInput),
                "{identifier}"
            );
            assert_eq!(directory.calls(), (0, 0), "{identifier}");
        }
    }

    #[tokio::test]
    async fn wrong_password_stops_before_lookup() {
        let directory = Arc::new(FakeDirectory::new(AuthReply::Accept, finance_user()));
        let outcome = pipeline(&directory)
            .run(CredentialSubmission::new("jdoe", "wrong"))
            .await;

        assert_eq!(outcome, Outcome::Rejected(ErrorCode::AuthenticationFailed));
        assert_eq!(directory.calls(), (1, 0));
    }

    #[tokio::test]
    async fn directory_rejection() {
        let directory = Arc::new(FakeDirectory::new(AuthReply::Reject, finance_user()));
        let outcome = pipeline(&directory)
            .run(CredentialSubmission::new("jdoe", "correct"))
            .await;

        assert_eq!(outcome, Outcome::Rejected(ErrorCode::AuthenticationFailed));
        assert_eq!(directory.calls(), (1, 0));
    }

    #[tokio::test]
    async fn bind_error_is_authentication_failure() {
        let directory = Arc::new(FakeDirectory::new(
            AuthReply::Fail(|| DirectoryError::Bind("rc=53 unwilling to perform".to_string())),
            finance_user(),
        ));
        let outcome = pipeline(&directory)
            .run(CredentialSubmission::new("jdoe", "correct"))
            .await;

        assert_eq!(outcome, Outcome::Rejected(ErrorCode::AuthenticationFailed));
        assert_eq!(directory.calls(), (1, 0));
    }

    #[tokio::test]
    async fn timeout_is_directory_unavailable() {
        let directory = Arc::new(FakeDirectory::new(
            AuthReply::Fail(|| DirectoryError::Timeout),
            finance_user(),
        ));
        let outcome = pipeline(&directory)
            .run(CredentialSubmission::new("jdoe", "correct"))
            .await;

        assert_eq!(outcome, Outcome::Rejected(ErrorCode::DirectoryUnavailable));
        assert_eq!(directory.calls(), (1, 0));
    }

    #[tokio::test]
    async fn lookup_failures() {
        let directory = Arc::new(FakeDirectory::new(
            AuthReply::Accept,
            LookupReply::Fail(|| DirectoryError::Search("rc=1".to_string())),
        ));
        let outcome = pipeline(&directory)
            .run(CredentialSubmission::new("jdoe", "correct"))
            .await;
        assert_eq!(outcome, Outcome::Rejected(ErrorCode::LookupFailed));
        assert_eq!(directory.calls(), (1, 1));

        let directory = Arc::new(FakeDirectory::new(AuthReply::Accept, LookupReply::Missing));
        let outcome = pipeline(&directory)
            .run(CredentialSubmission::new("jdoe", "correct"))
            .await;
        assert_eq!(outcome, Outcome::Rejected(ErrorCode::UserNotFound));
        assert_eq!(directory.calls(), (1, 1));
    }

    #[tokio::test]
    async fn administrators_denied_even_with_finance() {
        let directory = Arc::new(FakeDirectory::new(
            AuthReply::Accept,
            LookupReply::Found(attributes(
                "CN=Root,OU=Finance,OU=Administrators,DC=corp",
                Some("root@corp"),
            )),
        ));
        let outcome = pipeline(&directory)
            .run(CredentialSubmission::new("jdoe", "correct"))
            .await;

        assert_eq!(outcome, Outcome::Rejected(ErrorCode::AccessDenied));
    }

    #[tokio::test]
    async fn missing_principal_name_uses_sentinel() {
        let directory = Arc::new(FakeDirectory::new(
            AuthReply::Accept,
            LookupReply::Found(attributes("CN=C,OU=Contractor,DC=corp", None)),
        ));
        let outcome = pipeline(&directory)
            .run(CredentialSubmission::new("jdoe", "correct"))
            .await;

        match outcome {
            Outcome::Success(credential) => {
                assert_eq!(credential.email_address, NO_ACCESS_EMAIL);
                assert_eq!(
                    credential.authorization_group,
                    AuthorizationGroup::Contractor
                );
            }
            Outcome::Rejected(code) => panic!("unexpected rejection: {code}"),
        }
    }

    #[tokio::test]
    async fn repeated_runs_are_identical() {
        let directory = Arc::new(FakeDirectory::new(AuthReply::Accept, finance_user()));
        let pipeline = pipeline(&directory);

        let first = pipeline
            .run(CredentialSubmission::new("jdoe", "correct"))
            .await;
        for _ in 0..5 {
            let next = pipeline
                .run(CredentialSubmission::new("jdoe", "correct"))
                .await;
            assert_eq!(next, first);
        }
        assert_eq!(directory.calls(), (6, 6));
    }

    #[tokio::test]
    #[traced_test]
    async fn rejection_is_logged_with_stage_and_code() {
        let directory = Arc::new(FakeDirectory::new(AuthReply::Reject, finance_user()));
        let outcome = pipeline(&directory)
            .run(CredentialSubmission::new("jdoe", "Tr0ub4dor-and-3"))
            .await;

        assert_eq!(outcome, Outcome::Rejected(ErrorCode::AuthenticationFailed));
        assert!(logs_contain("Rejected jdoe"));
        assert!(logs_contain("stage=authenticating"));
        assert!(logs_contain("code=authentication_failed"));
        assert!(!logs_contain("Tr0ub4dor-and-3"));
    }

    #[tokio::test]
    #[traced_test]
    async fn lookup_error_is_logged_with_cause() {
        let directory = Arc::new(FakeDirectory::new(
            AuthReply::Accept,
            LookupReply::Fail(|| DirectoryError::Search("rc=1 operationsError".to_string())),
        ));
        let outcome = pipeline(&directory)
            .run(CredentialSubmission::new("jdoe", "correct"))
            .await;

        assert_eq!(outcome, Outcome::Rejected(ErrorCode::LookupFailed));
        assert!(logs_contain("stage=resolving_attributes"));
        assert!(logs_contain("code=lookup_failed"));
        assert!(logs_contain("rc=1 operationsError"));
        assert!(!logs_contain("correct"));
    }
}
