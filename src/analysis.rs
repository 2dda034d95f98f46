use alloc::vec::Vec;
use core::fmt;

use log::{debug, trace};

use crate::columns::{self, columnize, histogram, Histogram};
use crate::encoding;
use crate::kasiski::{self, divisors, Locator, MIN_OFFSET};
use crate::language::{
    column_coincidence, english_frequency, english_ioc_delta, ENGLISH_IOC, RANDOM_IOC,
};
use crate::vote::{self, vote, VoteTable, Window};

/// Longest ciphertext accepted by default, the exhaustive locator is quadratic in the length
pub const MAX_CIPHERTEXT_LEN: usize = 16_384;

/// Internal misuse of a pipeline stage
#[derive(Debug, PartialEq)]
pub enum InvalidArgument {
    Offset(kasiski::Error),
    Window(vote::Error),
    Columns(columns::Error),
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidArgument::Offset(e) => write!(f, "{}", e),
            InvalidArgument::Window(e) => write!(f, "{}", e),
            InvalidArgument::Columns(e) => write!(f, "{}", e),
        }
    }
}

/// Legitimate outcome where no key length can be inferred
#[derive(Debug, PartialEq)]
pub enum Degenerate {
    NoRepeatedTrigrams,
    NoVotes,
}

#[derive(Debug, PartialEq)]
pub enum Error {
    InvalidInput(encoding::Error),
    InvalidArgument(InvalidArgument),
    Degenerate(Degenerate),
}

impl Error {
    /// Process exit code reported by the command line tool
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidInput(_) => 1,
            Error::Degenerate(_) => 2,
            Error::InvalidArgument(_) => 3,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(e) => write!(f, "invalid input: {}", e),
            Error::InvalidArgument(e) => write!(f, "invalid argument: {}", e),
            Error::Degenerate(Degenerate::NoRepeatedTrigrams) => write!(
                f,
                "no key length could be inferred: the ciphertext contains no repeated trigram"
            ),
            Error::Degenerate(Degenerate::NoVotes) => write!(
                f,
                "no key length could be inferred: no offset has a divisor in the candidate window"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Settings of a single pipeline run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub window: Window,
    pub locator: Locator,
    pub max_len: usize,
}

impl Config {
    /// Create a config inspecting candidate key lengths 2..=max_key_len
    ///
    /// errors: returns Error if max_key_len is below two
    pub fn new(max_key_len: usize, locator: Locator, max_len: usize) -> Result<Self, Error> {
        let window = Window::new(vote::DEFAULT_MIN_KEY_LENGTH, max_key_len)
            .map_err(|e| Error::InvalidArgument(InvalidArgument::Window(e)))?;

        Ok(Self {
            window,
            locator,
            max_len,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: Window::default(),
            locator: Locator::default(),
            max_len: MAX_CIPHERTEXT_LEN,
        }
    }
}

/// Result of a Kasiski examination of one ciphertext
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    offsets: Vec<usize>,
    votes: VoteTable,
    key_len: usize,
    columns: Vec<Vec<u8>>,
    histogram: Histogram,
}

impl Analysis {
    /// Offsets between every pair of equal trigrams, in discovery order
    pub fn offsets(&self) -> &[usize] {
        self.offsets.as_ref()
    }

    pub fn votes(&self) -> &VoteTable {
        &self.votes
    }

    /// Estimated key length, always inside the candidate window
    pub fn key_len(&self) -> usize {
        self.key_len
    }

    pub fn columns(&self) -> &[Vec<u8>] {
        self.columns.as_ref()
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Index of coincidence of every column
    pub fn coincidence(&self) -> Coincidence {
        let (iocs, mean) = column_coincidence(self.histogram.columns());
        Coincidence { iocs, mean }
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let window = self.votes.window();
        writeln!(
            f,
            "frequencies of divisors from {} - {}:",
            window.min(),
            window.max()
        )?;
        for (candidate, count) in self.votes.iter() {
            writeln!(f, "{}: {}", candidate, count)?;
        }

        writeln!(f, "\nKey length is {}\n", self.key_len)?;

        writeln!(f, "Histograms:")?;
        write!(f, "{}", self.histogram)
    }
}

/// Per-column index of coincidence, rendered next to the English reference profile
#[derive(Clone, Debug, PartialEq)]
pub struct Coincidence {
    iocs: Vec<Option<f64>>,
    mean: Option<f64>,
}

impl Coincidence {
    pub fn columns(&self) -> &[Option<f64>] {
        self.iocs.as_ref()
    }

    pub fn mean(&self) -> Option<f64> {
        self.mean
    }
}

impl fmt::Display for Coincidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Index of coincidence (english {:.4}, random {:.4}):",
            ENGLISH_IOC, RANDOM_IOC
        )?;
        for (col, ioc) in self.iocs.iter().enumerate() {
            match ioc {
                Some(ioc) => writeln!(
                    f,
                    "column {}: {:.4} (english delta {:.4})",
                    col,
                    ioc,
                    english_ioc_delta(*ioc)
                )?,
                None => writeln!(f, "column {}: n/a", col)?,
            }
        }
        match self.mean {
            Some(mean) => writeln!(f, "mean: {:.4}", mean)?,
            None => writeln!(f, "mean: n/a")?,
        }

        writeln!(f, "\nEnglish letter frequencies:")?;
        for letter in b'A'..=b'Z' {
            writeln!(f, "{}: {:.5}", letter as char, english_frequency(letter))?;
        }
        Ok(())
    }
}

/// Tally the divisors of every offset, skipping offsets without non-trivial divisors
fn tally(offsets: &[usize], config: &Config) -> Result<VoteTable, Error> {
    let divisor_sets = offsets
        .iter()
        .filter(|&&o| o >= MIN_OFFSET)
        .map(|&o| divisors(o))
        .collect::<Result<Vec<Vec<usize>>, kasiski::Error>>()
        .map_err(|e| Error::InvalidArgument(InvalidArgument::Offset(e)))?;

    let skipped = offsets.len() - divisor_sets.len();
    if skipped > 0 {
        trace!("skipped {} offsets below {}", skipped, MIN_OFFSET);
    }

    let votes = match config.locator {
        #[cfg(feature = "parallel")]
        Locator::Parallel => vote::vote_parallel(&divisor_sets, config.window),
        _ => vote(&divisor_sets, config.window),
    };

    debug!(
        "{} divisor sets cast {} votes in [{}, {}]",
        divisor_sets.len(),
        votes.total(),
        config.window.min(),
        config.window.max()
    );

    Ok(votes)
}

/// Estimate the key length of a Vigenere ciphertext and build its column histograms
///
/// errors: returns Error for invalid ciphertexts, and when no key length can be inferred
pub fn analyse(ciphertext: &[u8], config: &Config) -> Result<Analysis, Error> {
    let text = encoding::validate(ciphertext)
        .and_then(|text| encoding::check_len(text, config.max_len))
        .map_err(Error::InvalidInput)?;

    let offsets = config.locator.locate(text);
    debug!(
        "{:?} locator found {} repeated trigram offsets in {} characters",
        config.locator,
        offsets.len(),
        text.len()
    );

    if offsets.is_empty() {
        return Err(Error::Degenerate(Degenerate::NoRepeatedTrigrams));
    }

    let votes = tally(&offsets, config)?;

    let key_len = votes.estimate().map_err(|e| match e {
        vote::Error::NoVotes => Error::Degenerate(Degenerate::NoVotes),
        e => Error::InvalidArgument(InvalidArgument::Window(e)),
    })?;

    let columns = columnize(text, key_len)
        .map_err(|e| Error::InvalidArgument(InvalidArgument::Columns(e)))?;
    let histogram = histogram(&columns);

    Ok(Analysis {
        offsets,
        votes,
        key_len,
        columns,
        histogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::ToString, vec};

    #[test]
    fn check_analyse_tie_break() {
        // offsets [3, 6, 3, 3, 3]: only 6 has divisors, 2 and 3 tie
        let analysis = analyse(b"ABCABCABC", &Config::default()).unwrap();
        assert_eq!(analysis.offsets(), &[3, 6, 3, 3, 3]);
        assert_eq!(analysis.votes().count(2), 1);
        assert_eq!(analysis.votes().count(3), 1);
        assert_eq!(analysis.key_len(), 2);
    }

    #[test]
    fn check_analyse_period_three() {
        let analysis = analyse(b"ABCABCABCABC", &Config::default()).unwrap();
        assert_eq!(analysis.votes().count(2), 4);
        assert_eq!(analysis.votes().count(3), 5);
        assert_eq!(analysis.key_len(), 3);
        assert_eq!(
            analysis.columns(),
            &[b"AAAA".to_vec(), b"BBBB".to_vec(), b"CCCC".to_vec()][..]
        );
        assert_eq!(analysis.histogram().row(b'B'), Some(vec![0, 4, 0]));
    }

    #[test]
    fn check_analyse_invalid_input() {
        let config = Config::default();
        assert_eq!(
            analyse(b"", &config),
            Err(Error::InvalidInput(encoding::Error::Empty))
        );
        assert_eq!(
            analyse(b"AB", &config),
            Err(Error::InvalidInput(encoding::Error::TooShort(2)))
        );
        assert_eq!(
            analyse(b"ABC ABC", &config),
            Err(Error::InvalidInput(encoding::Error::NonAlphabetic {
                index: 3,
                byte: b' '
            }))
        );

        let small = Config::new(15, Locator::Exhaustive, 8).unwrap();
        assert_eq!(
            analyse(b"ABCABCABC", &small),
            Err(Error::InvalidInput(encoding::Error::TooLong { len: 9, max: 8 }))
        );
    }

    #[test]
    fn check_analyse_degenerate() {
        let config = Config::default();
        let err = analyse(b"ABCDEFGHIJKLMNOPQRSTUVWXYZ", &config).unwrap_err();
        assert_eq!(err, Error::Degenerate(Degenerate::NoRepeatedTrigrams));
        assert_eq!(err.exit_code(), 2);

        // a single repeat at prime distance 5 casts no vote
        let err = analyse(b"ABCDEABC", &config).unwrap_err();
        assert_eq!(err, Error::Degenerate(Degenerate::NoVotes));

        // a run of four only repeats at distance one
        let err = analyse(b"AAAA", &config).unwrap_err();
        assert_eq!(err, Error::Degenerate(Degenerate::NoVotes));
    }

    #[test]
    fn check_config() {
        assert_eq!(Config::default().window, Window::default());
        assert_eq!(
            Config::new(1, Locator::Exhaustive, MAX_CIPHERTEXT_LEN).map(|c| c.max_len),
            Err(Error::InvalidArgument(InvalidArgument::Window(
                vote::Error::InvalidWindow { min: 2, max: 1 }
            )))
        );
        assert_eq!(
            Config::new(1, Locator::Exhaustive, MAX_CIPHERTEXT_LEN)
                .unwrap_err()
                .exit_code(),
            3
        );
    }

    #[test]
    fn check_report() {
        let analysis = analyse(b"ABCABCABCABC", &Config::default()).unwrap();
        let report = analysis.to_string();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "frequencies of divisors from 2 - 15:");
        assert_eq!(lines[1], "2: 4");
        assert_eq!(lines[2], "3: 5");
        assert_eq!(lines[14], "15: 0");
        assert_eq!(lines[15], "");
        assert_eq!(lines[16], "Key length is 3");
        assert_eq!(lines[17], "");
        assert_eq!(lines[18], "Histograms:");
        assert_eq!(lines[19], "A: [4, 0, 0]");
        assert_eq!(lines[20], "B: [0, 4, 0]");
        assert_eq!(lines[44], "Z: [0, 0, 0]");
        assert_eq!(lines.len(), 45);
    }

    #[test]
    fn check_coincidence() {
        let analysis = analyse(b"ABCABCABCABC", &Config::default()).unwrap();
        let coincidence = analysis.coincidence();
        assert_eq!(coincidence.columns(), &[Some(1.0), Some(1.0), Some(1.0)]);
        assert_eq!(coincidence.mean(), Some(1.0));

        let report = coincidence.to_string();
        assert!(report.contains("column 0: 1.0000 (english delta 0.9333)\n"));
        assert!(report.contains("E: 0.12702"));
        assert!(report.contains("Z: 0.00074"));
    }

    #[test]
    fn check_config_rejects_oversized_window() {
        let err = Config::new(usize::MAX, Locator::Exhaustive, MAX_CIPHERTEXT_LEN).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidArgument(InvalidArgument::Window(vote::Error::InvalidWindow {
                min: 2,
                max: usize::MAX
            }))
        );
        assert_eq!(err.exit_code(), 3);

        let config = Config::new(vote::MAX_KEY_LENGTH, Locator::Exhaustive, MAX_CIPHERTEXT_LEN)
            .unwrap();
        let analysis = analyse(b"ABCABCABCABC", &config).unwrap();
        assert_eq!(analysis.key_len(), 3);
    }
}
