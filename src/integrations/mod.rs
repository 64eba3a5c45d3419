//! External service integrations.

pub mod validation_client {
    pub use crate::validation_client::*;
}
