mod services;

pub use services::ProxyServices;
