use alloc::{vec, vec::Vec};
use core::fmt;

use crate::encoding::{is_upper, ALPHABET_LEN};

#[derive(Debug, PartialEq)]
pub enum Error {
    ZeroKeyLength,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroKeyLength => write!(f, "cannot split ciphertext into zero columns"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Split ciphertext into key length columns
///
/// Returns a MxN two-dimensional matrix, (M = key length, N = ceil(cipher length / key length)).
/// The byte at index i lands in column i % key length, so trailing columns
/// are one byte shorter when the key length does not divide the ciphertext length.
///
/// errors: returns Error for a zero key length
pub fn columnize(ciphertext: &[u8], key_len: usize) -> Result<Vec<Vec<u8>>, Error> {
    if key_len == 0 {
        return Err(Error::ZeroKeyLength);
    }

    let ciphertext_len = ciphertext.len();
    let mut columns: Vec<Vec<u8>> =
        vec![Vec::with_capacity(ciphertext_len / key_len + 1); key_len];

    for (i, &byte) in ciphertext.iter().enumerate() {
        columns[i % key_len].push(byte);
    }

    Ok(columns)
}

/// Interleave columns back into a single ciphertext, inverse of [`columnize`]
pub fn interleave<C: AsRef<[u8]>>(columns: &[C]) -> Vec<u8> {
    let total = columns.iter().map(|c| c.as_ref().len()).sum();
    let rows = columns.iter().map(|c| c.as_ref().len()).max().unwrap_or(0);

    let mut res = Vec::with_capacity(total);
    for row in 0..rows {
        for column in columns {
            if let Some(&byte) = column.as_ref().get(row) {
                res.push(byte);
            }
        }
    }

    res
}

/// Per-column letter counts, a 26 x key length matrix
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    counts: Vec<[usize; ALPHABET_LEN]>,
}

impl Histogram {
    /// Count the letters A-Z in every column
    ///
    /// Bytes outside A-Z are skipped without error and contribute to no count.
    pub fn from_columns<C: AsRef<[u8]>>(columns: &[C]) -> Self {
        let counts = columns
            .iter()
            .map(|column| {
                let mut counts = [0usize; ALPHABET_LEN];
                for &byte in column.as_ref().iter().filter(|&&b| is_upper(b)) {
                    counts[(byte - b'A') as usize] += 1;
                }
                counts
            })
            .collect();

        Self { counts }
    }

    /// Number of columns, equal to the key length
    pub fn key_len(&self) -> usize {
        self.counts.len()
    }

    /// Letter counts of a single column, indexed by letter offset from 'A'
    pub fn column(&self, idx: usize) -> Option<&[usize; ALPHABET_LEN]> {
        self.counts.get(idx)
    }

    pub fn columns(&self) -> &[[usize; ALPHABET_LEN]] {
        self.counts.as_ref()
    }

    /// Counts of one letter across every column
    ///
    /// Returns None for bytes outside A-Z
    pub fn row(&self, letter: u8) -> Option<Vec<usize>> {
        if !is_upper(letter) {
            return None;
        }
        let idx = (letter - b'A') as usize;
        Some(self.counts.iter().map(|c| c[idx]).collect())
    }

    /// Number of counted letters in a column
    pub fn column_total(&self, idx: usize) -> usize {
        self.counts.get(idx).map_or(0, |c| c.iter().sum())
    }
}

impl fmt::Display for Histogram {
    /// One line per letter: `A: [c0, c1, ..., c(k-1)]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in b'A'..=b'Z' {
            let idx = (letter - b'A') as usize;
            write!(f, "{}: [", letter as char)?;
            for (col, counts) in self.counts.iter().enumerate() {
                if col > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", counts[idx])?;
            }
            f.write_str("]\n")?;
        }
        Ok(())
    }
}

/// Build the letter histogram of every column
pub fn histogram<C: AsRef<[u8]>>(columns: &[C]) -> Histogram {
    Histogram::from_columns(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn check_columnize() {
        let exp_key = b"TheKey".to_vec();
        let key_rpt = b"TheKeyTheKeyTheKey".to_vec();
        let columns = columnize(&key_rpt, exp_key.len()).unwrap();

        assert_eq!(columns.len(), exp_key.len());
        for (i, column) in columns.iter().enumerate() {
            assert_eq!(column.len(), key_rpt.len() / exp_key.len());
            for &byte in column {
                assert_eq!(exp_key[i], byte);
            }
        }
    }

    #[test]
    fn check_columnize_uneven() {
        let columns = columnize(b"ABCDEFGH", 3).unwrap();
        assert_eq!(columns, vec![b"ADG".to_vec(), b"BEH".to_vec(), b"CF".to_vec()]);

        assert_eq!(columnize(b"ABC", 0), Err(Error::ZeroKeyLength));
        assert_eq!(columnize(b"ABC", 1).unwrap(), vec![b"ABC".to_vec()]);
    }

    #[test]
    fn check_interleave() {
        let text = b"LXFOPVEFRNHR";
        for key_len in 1..=text.len() {
            let columns = columnize(text, key_len).unwrap();
            assert_eq!(interleave(&columns)[..], text[..], "key length {}", key_len);
        }
    }

    #[test]
    fn check_histogram() {
        let columns = columnize(b"ABCABCABD", 3).unwrap();
        let hist = histogram(&columns);

        assert_eq!(hist.key_len(), 3);
        assert_eq!(hist.row(b'A'), Some(vec![3, 0, 0]));
        assert_eq!(hist.row(b'C'), Some(vec![0, 0, 2]));
        assert_eq!(hist.row(b'D'), Some(vec![0, 0, 1]));
        assert_eq!(hist.row(b'a'), None);
        for idx in 0..3 {
            assert_eq!(hist.column_total(idx), columns[idx].len());
        }
    }

    #[test]
    fn check_histogram_skips_non_alphabetic() {
        let hist = histogram(&[b"A-B c".to_vec()]);
        assert_eq!(hist.column_total(0), 2);
        assert_eq!(hist.column(0).unwrap()[0], 1);
        assert_eq!(hist.column(0).unwrap()[1], 1);
    }

    #[test]
    fn check_histogram_display() {
        let hist = histogram(&columnize(b"ABZ", 2).unwrap());
        let out = hist.to_string();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 26);
        assert_eq!(lines[0], "A: [1, 0]");
        assert_eq!(lines[1], "B: [0, 1]");
        assert_eq!(lines[2], "C: [0, 0]");
        assert_eq!(lines[25], "Z: [1, 0]");
    }
}
