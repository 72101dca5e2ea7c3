pub mod authenticator;
pub mod gate;

pub use authenticator::AccessGrant;
pub use authenticator::CredentialAuthenticator;
pub use gate::AccessGate;
