//! External authentication core: validation, directory calls, policy and the
//! proxy-facing response.

pub mod outcome;
pub mod pipeline;
pub mod policy;
pub mod response;
pub mod router;
pub mod validator;

pub use outcome::{AuthorizationGroup, Credential, CredentialSubmission, ErrorCode, Outcome};
pub use pipeline::Pipeline;
