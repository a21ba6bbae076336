pub mod common;
pub mod manifest;
pub mod progress;
pub mod request;
pub mod rules;

use super::error::DomainError;
