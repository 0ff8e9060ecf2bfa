use rand::distributions::{Alphanumeric, DistString};
use sha2::{Digest, Sha512};
use std::fmt::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A type with the ability to mint session identifiers.
///
/// Generators are shared by all requests handled by one adapter, so they
/// take `&self` and keep whatever state they need behind interior
/// mutability.
pub trait SidGenerator: Send + Sync {
    /// Generate a session id: a fixed-length, URL-safe string.
    fn generate(&self) -> String;
}

/// The default session id generator with focus on security.
/// It uses [`rand::thread_rng`] as a random source and the [`Alphanumeric`]
/// distribution to generate id strings.
/// This gives `log_2(26+26+10) ≥ 5.95` bits of entropy per character.
#[derive(Debug, Clone, Copy)]
pub struct RandomSidGenerator {
    byte_length: usize,
}

impl RandomSidGenerator {
    /// Create a generator whose ids carry at least `byte_length` bytes of
    /// entropy.
    pub fn new(byte_length: usize) -> Self {
        Self { byte_length }
    }
}

impl SidGenerator for RandomSidGenerator {
    fn generate(&self) -> String {
        let mut sid = String::new();
        // 5 bits per character undershoots the actual 5.95, so the id is
        // never weaker than the configured byte length.
        let length = (self.byte_length * 8).div_ceil(5);
        Alphanumeric.append_string(&mut rand::thread_rng(), &mut sid, length);
        sid
    }
}

/// A debug session id generator that generates an ascending sequence of
/// integers, formatted as strings padded with zeroes.
#[derive(Debug, Default)]
pub struct DebugSidGenerator {
    next_index: AtomicUsize,
}

/// Length of the ids produced by [`DebugSidGenerator`].
pub const DEBUG_SID_LENGTH: usize = 32;

impl SidGenerator for DebugSidGenerator {
    fn generate(&self) -> String {
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        let mut sid = String::new();
        write!(&mut sid, "{:0width$}", index, width = DEBUG_SID_LENGTH)
            .expect("writing to a string cannot fail");
        sid
    }
}

/// Compute the diagnostic digest exposed for a session id that the store
/// rejected: the lowercase hex SHA-512 of the id.
///
/// The digest lets application code correlate a rejection with client-side
/// state without the raw id ever being logged or returned in cleartext.
/// It is never used for lookup.
///
/// # Example
///
/// ```rust
/// # use stored_session::failed_sid_digest;
/// let digest = failed_sid_digest("abc");
/// assert_eq!(digest.len(), 128);
/// assert!(digest.starts_with("ddaf35a1"));
/// ```
pub fn failed_sid_digest(sid: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(sid.as_bytes());
    format!("{:x}", hasher.finalize())
}
