//! Random password generation.
//!
//! Stateless and outside the vault's security boundary: nothing here
//! touches stored data.

use rand::seq::{IndexedRandom, SliceRandom};

use crate::errors::{Result, VaultError};

pub const MIN_LENGTH: usize = 4;
pub const MAX_LENGTH: usize = 64;

const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Which character classes to draw from, and how many characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordOptions {
    pub length: usize,
    pub use_upper: bool,
    pub use_lower: bool,
    pub use_numbers: bool,
    pub use_special: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: 16,
            use_upper: true,
            use_lower: true,
            use_numbers: true,
            use_special: true,
        }
    }
}

impl PasswordOptions {
    fn classes(&self) -> Vec<&'static [u8]> {
        [
            (self.use_upper, UPPER),
            (self.use_lower, LOWER),
            (self.use_numbers, DIGITS),
            (self.use_special, SPECIAL),
        ]
        .into_iter()
        .filter_map(|(enabled, set)| enabled.then_some(set))
        .collect()
    }
}

/// Generate a password from the selected character classes.
///
/// Contains at least one character of every selected class.  Fails for a
/// length outside 4..=64 or when no class is selected.
pub fn generate_password(options: &PasswordOptions) -> Result<String> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&options.length) {
        return Err(VaultError::Validation(format!(
            "length must be between {MIN_LENGTH} and {MAX_LENGTH}, got {}",
            options.length
        )));
    }

    let classes = options.classes();
    if classes.is_empty() {
        return Err(VaultError::Validation(
            "select at least one character class".into(),
        ));
    }

    let pool: Vec<u8> = classes.concat();
    let mut rng = rand::rng();
    let mut password: Vec<u8> = Vec::with_capacity(options.length);

    // One from each class first, then fill from the whole pool.
    for class in &classes {
        if let Some(&c) = class.choose(&mut rng) {
            password.push(c);
        }
    }
    while password.len() < options.length {
        if let Some(&c) = pool.choose(&mut rng) {
            password.push(c);
        }
    }

    password.shuffle(&mut rng);

    // Every byte comes from the ASCII tables above.
    Ok(password.into_iter().map(char::from).collect())
}
