use alloc::vec::Vec;

use libm::fabs;

use crate::encoding::ALPHABET_LEN;

/// Unigram frequencies of English letters A-Z
///
/// Frequencies from: https://en.wikipedia.org/wiki/Letter_frequency
pub const ENGLISH_FREQUENCIES: [f64; ALPHABET_LEN] = [
    0.08167, 0.01492, 0.02782, 0.04253, 0.12702, 0.02228, 0.02015, 0.06094, 0.06966, 0.00153,
    0.00772, 0.04025, 0.02406, 0.06749, 0.07507, 0.01929, 0.00095, 0.05987, 0.06327, 0.09056,
    0.02758, 0.00978, 0.02360, 0.00150, 0.01974, 0.00074,
];

/// Expected index of coincidence of English text
pub const ENGLISH_IOC: f64 = 0.0667;

/// Index of coincidence of uniformly random letters (1 / 26)
pub const RANDOM_IOC: f64 = 1.0 / ALPHABET_LEN as f64;

/// Frequency of an uppercase letter in English text (case-insensitive)
pub fn english_frequency(byte: u8) -> f64 {
    match byte {
        b'A'..=b'Z' => ENGLISH_FREQUENCIES[(byte - b'A') as usize],
        b'a'..=b'z' => ENGLISH_FREQUENCIES[(byte - b'a') as usize],
        _ => 0.0,
    }
}

/// Probability that two letters drawn without replacement from a column are equal
///
/// Returns None for columns with fewer than two letters
pub fn index_of_coincidence(counts: &[usize; ALPHABET_LEN]) -> Option<f64> {
    let total: usize = counts.iter().sum();
    if total < 2 {
        return None;
    }

    let pairs: usize = counts.iter().map(|&c| c * c.saturating_sub(1)).sum();
    Some(pairs as f64 / (total * (total - 1)) as f64)
}

/// Absolute distance of an index of coincidence from English text
pub fn english_ioc_delta(ioc: f64) -> f64 {
    fabs(ENGLISH_IOC - ioc)
}

/// Index of coincidence of every column, plus their mean over the columns that have one
pub fn column_coincidence(columns: &[[usize; ALPHABET_LEN]]) -> (Vec<Option<f64>>, Option<f64>) {
    let iocs: Vec<Option<f64>> = columns.iter().map(index_of_coincidence).collect();

    let known: Vec<f64> = iocs.iter().filter_map(|&x| x).collect();
    let mean = if known.is_empty() {
        None
    } else {
        Some(known.iter().sum::<f64>() / known.len() as f64)
    };

    (iocs, mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_english_frequencies() {
        let total: f64 = ENGLISH_FREQUENCIES.iter().sum();
        assert!(fabs(total - 1.0) < 0.001);
        assert_eq!(english_frequency(b'E'), 0.12702);
        assert_eq!(english_frequency(b'e'), 0.12702);
        assert_eq!(english_frequency(b'!'), 0.0);
    }

    #[test]
    fn check_index_of_coincidence() {
        let mut counts = [0usize; ALPHABET_LEN];
        assert_eq!(index_of_coincidence(&counts), None);

        counts[0] = 4;
        assert_eq!(index_of_coincidence(&counts), Some(1.0));

        // one of each letter never repeats
        let flat = [1usize; ALPHABET_LEN];
        assert_eq!(index_of_coincidence(&flat), Some(0.0));

        // AABB: 2 * (2 * 1) / (4 * 3)
        let mut counts = [0usize; ALPHABET_LEN];
        counts[0] = 2;
        counts[1] = 2;
        let ioc = index_of_coincidence(&counts).unwrap();
        assert!(fabs(ioc - 1.0 / 3.0) < 1e-12);
    }

    #[test]
    fn check_column_coincidence() {
        let mut single = [0usize; ALPHABET_LEN];
        single[3] = 1;
        let mut pair = [0usize; ALPHABET_LEN];
        pair[3] = 2;

        let (iocs, mean) = column_coincidence(&[single, pair]);
        assert_eq!(iocs, [None, Some(1.0)]);
        assert_eq!(mean, Some(1.0));

        let (iocs, mean) = column_coincidence(&[]);
        assert!(iocs.is_empty());
        assert_eq!(mean, None);
    }
}
