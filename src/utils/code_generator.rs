//! Short code generation.
//!
//! Codes are 7 characters drawn uniformly from a 61-character alphabet.
//! The digit `0` is deliberately absent from the alphabet.

use rand::Rng;

/// Length of every generated short code.
pub const CODE_LENGTH: usize = 7;

/// Characters a generated code may contain.
pub const CODE_ALPHABET: &[u8] =
    b"123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Source of candidate short codes.
///
/// Implementations are pure generators and never touch storage. Uniqueness
/// is enforced by the store; the shortening service retries on collision.
pub trait CodeGenerator: Send + Sync + 'static {
    /// Produces a new candidate code.
    fn generate(&self) -> String;
}

/// Generates codes from the thread-local random number generator.
///
/// Codes are not meant to be cryptographically unpredictable.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl RandomCodeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Generates a random short code of [`CODE_LENGTH`] characters.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 7);
/// assert!(!code.contains('0'));
/// ```
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Returns true if `code` has the shape of a generated code.
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| CODE_ALPHABET.contains(&b))
}
