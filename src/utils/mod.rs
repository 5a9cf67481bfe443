pub mod cipher;
pub mod error;
pub mod logger;
pub mod validation;
