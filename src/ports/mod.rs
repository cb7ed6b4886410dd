pub mod credentials;
pub mod dialer;

pub use credentials::{CredentialsPort, TlsCredentials};
pub use dialer::DialerPort;
