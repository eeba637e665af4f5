//! # ADEAI (Active Directory External Authentication Interface)
//!
//! `adeai` is invoked by a front-end reverse proxy (`WebSEAL` style EAI trigger) to
//! authenticate a submitted username/password against Active Directory and hand
//! the resulting identity back to the proxy as trust headers. The proxy mints its
//! own session from those headers; `adeai` keeps no sessions.
//!
//! ## Pipeline
//!
//! A `POST /login` runs strictly in order and stops at the first failure:
//!
//! 1. **Validate** the username (alphanumeric, 3 to 45 characters). No directory
//!    call is made for malformed input.
//! 2. **Authenticate** with a simple bind as `username + domain suffix`.
//! 3. **Lookup** the account attributes with the service account.
//! 4. **Authorize & map**: accounts under an `Administrators` container are
//!    denied, then the DN selects the proxy group (`finance`, `contractor`,
//!    `employee`, first match wins) and the `userPrincipalName` becomes the email.
//! 5. **Emit** `am-eai-*` headers on success.
//!
//! ## Failure signalling
//!
//! Every failure is logged with its internal reason but the caller only ever sees
//! one of two redirects: `/login?error=49` for malformed input, and a single
//! generic code for anything else. Which stage failed is never revealed.

pub mod api;
pub mod cli;
pub mod directory;
pub mod eai;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
