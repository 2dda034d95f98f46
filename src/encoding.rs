use alloc::vec::Vec;
use core::fmt;

/// Size of the Latin alphabet the ciphertext is drawn from
pub const ALPHABET_LEN: usize = 26;

/// Shortest ciphertext that can hold a single trigram
pub const MIN_CIPHERTEXT_LEN: usize = 3;

#[derive(Debug, PartialEq)]
pub enum Error {
    Empty,
    EmptyKey,
    NonAlphabetic { index: usize, byte: u8 },
    TooShort(usize),
    TooLong { len: usize, max: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Empty => write!(f, "ciphertext is empty"),
            Error::EmptyKey => write!(f, "key is empty"),
            Error::NonAlphabetic { index, byte } => write!(
                f,
                "non-alphabetic character 0x{:02x} at index {} (expected A-Z)",
                byte, index
            ),
            Error::TooShort(len) => write!(
                f,
                "ciphertext of length {} is too short, at least {} characters are needed to form a trigram",
                len, MIN_CIPHERTEXT_LEN
            ),
            Error::TooLong { len, max } => {
                write!(f, "ciphertext of length {} exceeds the limit of {}", len, max)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Check if a byte is in the uppercase alphabet A-Z
pub fn is_upper(byte: u8) -> bool {
    (b'A'..=b'Z').contains(&byte)
}

/// Validate ciphertext at the input boundary
///
/// errors: returns Error on empty input, any byte outside A-Z, or fewer than three characters
///
/// The length limit is applied by the caller, see [`check_len`]
pub fn validate(text: &[u8]) -> Result<&[u8], Error> {
    if text.is_empty() {
        return Err(Error::Empty);
    }

    if let Some((index, &byte)) = text.iter().enumerate().find(|&(_, &b)| !is_upper(b)) {
        return Err(Error::NonAlphabetic { index, byte });
    }

    if text.len() < MIN_CIPHERTEXT_LEN {
        return Err(Error::TooShort(text.len()));
    }

    Ok(text)
}

/// Reject ciphertexts longer than `max` characters
pub fn check_len(text: &[u8], max: usize) -> Result<&[u8], Error> {
    if text.len() > max {
        Err(Error::TooLong {
            len: text.len(),
            max,
        })
    } else {
        Ok(text)
    }
}

/// Strip leading and trailing ASCII whitespace, e.g. the newline ending a ciphertext file
pub fn trim(text: &[u8]) -> &[u8] {
    let start = text
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(text.len());
    let end = text
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &text[start..end]
}

/// Keep only ASCII letters, converted to uppercase
///
/// Useful for ciphertexts copied with spacing and punctuation
pub fn clean(text: &[u8]) -> Vec<u8> {
    text.iter()
        .filter(|b| b.is_ascii_alphabetic())
        .map(|b| b.to_ascii_uppercase())
        .collect()
}

/// Vigenere encrypt an uppercase plaintext with an uppercase key
///
/// Key repeats every key_len bytes, e.g.
///
/// b"ATTACKATDAWN"
/// b"LEMONLEMONLE"
pub fn vigenere_encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, Error> {
    let key_len = key.len();
    if key_len == 0 {
        return Err(Error::EmptyKey);
    }

    for (index, &byte) in plaintext.iter().chain(key.iter()).enumerate() {
        if !is_upper(byte) {
            return Err(Error::NonAlphabetic { index, byte });
        }
    }

    let mut res = Vec::with_capacity(plaintext.len());
    for (i, &byte) in plaintext.iter().enumerate() {
        let shift = key[i % key_len] - b'A';
        res.push(b'A' + (byte - b'A' + shift) % ALPHABET_LEN as u8);
    }

    Ok(res)
}
