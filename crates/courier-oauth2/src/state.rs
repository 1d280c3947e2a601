//! CSRF state generation.
//!
//! The `state` parameter travels through the authorization redirect and must
//! be unguessable. Generation sits behind [`StateGenerator`] so tests can
//! substitute a deterministic source.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Source of opaque CSRF state values.
pub trait StateGenerator: Send + Sync + fmt::Debug {
    /// Returns a fresh state value.
    fn generate(&self) -> String;
}

/// State generator backed by the operating system CSPRNG.
///
/// Produces 32 random bytes encoded as URL-safe Base64 without padding.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomStateGenerator;

impl RandomStateGenerator {
    const STATE_BYTES: usize = 32;
}

impl StateGenerator for RandomStateGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; Self::STATE_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

/// Deterministic generator producing `"{prefix}{n}"` for n = 1, 2, ...
///
/// Intended for tests.
#[derive(Debug)]
pub struct SequentialStateGenerator {
    prefix: String,
    counter: AtomicU32,
}

impl SequentialStateGenerator {
    /// Creates a generator with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU32::new(0),
        }
    }
}

impl StateGenerator for SequentialStateGenerator {
    fn generate(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}{n}", self.prefix)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_random_state_shape() {
        let state = RandomStateGenerator.generate();
        // 32 bytes -> 43 base64 chars without padding
        assert_eq!(state.len(), 43);
        assert!(
            state
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_random_state_unique() {
        let generator = RandomStateGenerator;
        assert_ne!(generator.generate(), generator.generate());
    }

    #[test]
    fn test_sequential_state() {
        let generator = SequentialStateGenerator::new("state-");
        assert_eq!(generator.generate(), "state-1");
        assert_eq!(generator.generate(), "state-2");
    }
}
