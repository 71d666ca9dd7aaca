mod secure_forwarder;
pub mod tls;

pub use secure_forwarder::SecureForwarder;
pub use tls::TlsConfigError;
