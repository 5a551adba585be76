// showcase-mail: Async client for the EmailJS REST delivery endpoint

pub mod client;
pub mod error;

pub use client::{EmailJsClient, EmailJsCredentials, TemplateParams};
pub use error::Error;
