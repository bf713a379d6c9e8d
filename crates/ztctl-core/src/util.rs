//! Small generic helpers.
//!
//! `contains`, `file_exists` and `read_head` back the formatter and the
//! config loader. The random string helpers are exported for library users.

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rand::seq::SliceRandom;

use crate::error::{Error, Result};

const CHARSETS: [&str; 4] = [
    "0123456789",
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
];

/// Returns true if `needle` is equal to any element of `items`.
pub fn contains<T, U>(items: &[T], needle: &U) -> bool
where
    T: PartialEq<U>,
    U: ?Sized,
{
    items.iter().any(|item| item == needle)
}

/// Minimum number of bits needed to represent `num` (at least one).
#[must_use]
pub const fn repr_bits_len(num: u64) -> u32 {
    let bits = u64::BITS - num.leading_zeros();
    if bits == 0 {
        1
    } else {
        bits
    }
}

/// Concatenation of the first `n` ASCII character classes: digits, lower
/// case, upper case, punctuation. `n` is clamped to the number of classes.
#[must_use]
pub fn charset(n: usize) -> String {
    CHARSETS[..n.min(CHARSETS.len())].concat()
}

/// Source of characters for [`random_string`].
///
/// Either an explicit set of characters or the number of built-in classes
/// passed to [`charset`].
pub trait CharSource {
    /// Characters to draw from.
    fn pool(&self) -> Cow<'_, str>;
}

impl CharSource for str {
    fn pool(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl CharSource for String {
    fn pool(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl CharSource for usize {
    fn pool(&self) -> Cow<'_, str> {
        Cow::Owned(charset(*self))
    }
}

/// Random string of `len` characters drawn uniformly from `source`.
///
/// An empty source yields an empty string.
pub fn random_string<S>(len: usize, source: &S) -> String
where
    S: CharSource + ?Sized,
{
    let pool: Vec<char> = source.pool().chars().collect();
    let mut rng = rand::thread_rng();
    (0..len)
        .filter_map(|_| pool.choose(&mut rng).copied())
        .collect()
}

/// Returns true if something exists at `path`.
#[must_use]
pub fn file_exists(path: &Path) -> bool {
    path.try_exists().unwrap_or(true)
}

/// Read at most `limit` bytes from the start of the file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] naming the path when the file cannot be opened or read.
pub fn read_head(path: &Path, limit: usize) -> Result<Vec<u8>> {
    let with_path = |err: std::io::Error| Error::Io(format!("{}: {err}", path.display()));

    let file = File::open(path).map_err(with_path)?;
    let mut buf = Vec::with_capacity(limit);
    file.take(limit as u64)
        .read_to_end(&mut buf)
        .map_err(with_path)?;
    Ok(buf)
}
