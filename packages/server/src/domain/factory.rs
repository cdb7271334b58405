//! Domain factories for creating domain entities and value objects.

use super::{ConnectionId, error::ValueObjectError};

/// Factory for generating ConnectionId instances.
///
/// This factory encapsulates the logic for generating new connection identifiers,
/// separating the generation concern from the validation logic in ConnectionId.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<ConnectionId, ValueObjectError> {
        ConnectionId::new(uuid::Uuid::new_v4().to_string())
    }
}
