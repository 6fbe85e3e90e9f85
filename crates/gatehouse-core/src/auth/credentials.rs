use std::fmt;

use secrecy::SecretString;

/// Login identifier and secret for one submit.
///
/// Never persisted: the value is moved into the flow and dropped when the
/// attempt completes. The secret is only exposed when serialized into a
/// login request body.
pub struct Credentials {
    pub identifier: String,
    pub secret: SecretString,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: SecretString::from(secret.into()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
