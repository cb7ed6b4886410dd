mod pem;

pub use pem::PemFileCredentials;
