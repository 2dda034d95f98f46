use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use log::trace;

/// Length of the repeated patterns searched for in the ciphertext
pub const TRIGRAM_LEN: usize = 3;

/// Smallest offset with a non-trivial divisor candidate range
pub const MIN_OFFSET: usize = 2;

#[derive(Debug, PartialEq)]
pub enum Error {
    InvalidOffset(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidOffset(offset) => write!(
                f,
                "divisors requested for offset {}, offsets must be at least {}",
                offset, MIN_OFFSET
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Strategy used to find repeated trigrams
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Locator {
    /// Pairwise comparison of every trigram window, O(n^2)
    Exhaustive,
    /// Trigram start positions grouped in a hash map
    Indexed,
    /// Exhaustive scan with the outer loop spread over a thread pool
    #[cfg(feature = "parallel")]
    Parallel,
}

impl Default for Locator {
    fn default() -> Self {
        Locator::Exhaustive
    }
}

impl Locator {
    /// Run the selected strategy, all strategies return the same offsets in the same order
    pub fn locate(self, text: &[u8]) -> Vec<usize> {
        match self {
            Locator::Exhaustive => locate(text),
            Locator::Indexed => locate_indexed(text),
            #[cfg(feature = "parallel")]
            Locator::Parallel => locate_parallel(text),
        }
    }
}

/// Offsets to every later window equal to the trigram starting at `i`
fn scan_from(text: &[u8], i: usize) -> impl Iterator<Item = usize> + '_ {
    let window = &text[i..i + TRIGRAM_LEN];
    (i + 1..=text.len() - TRIGRAM_LEN)
        .filter(move |&j| &text[j..j + TRIGRAM_LEN] == window)
        .map(move |j| j - i)
}

/// Find the offset between every ordered pair of equal trigrams
///
/// Records are ordered by the earlier window's index, then by the later window's index.
/// A trigram occurring m times yields m * (m - 1) / 2 offsets.
pub fn locate(text: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::new();

    if text.len() < TRIGRAM_LEN {
        return offsets;
    }

    for i in 0..=text.len() - TRIGRAM_LEN {
        offsets.extend(scan_from(text, i));
    }

    trace!("exhaustive locator found {} offsets", offsets.len());
    offsets
}

/// Find the same offsets as [`locate`] by first indexing trigram start positions
///
/// Cost is linear in the text length plus the number of offsets found.
pub fn locate_indexed(text: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::new();

    if text.len() < TRIGRAM_LEN {
        return offsets;
    }

    let windows = text.len() - TRIGRAM_LEN + 1;
    let mut positions: HashMap<&[u8], Vec<usize>> = HashMap::with_capacity(windows);
    for i in 0..windows {
        positions
            .entry(&text[i..i + TRIGRAM_LEN])
            .or_insert_with(Vec::new)
            .push(i);
    }

    // positions are pushed in ascending order, so later matches follow i in its list
    for i in 0..windows {
        if let Some(starts) = positions.get(&text[i..i + TRIGRAM_LEN]) {
            offsets.extend(starts.iter().filter(|&&j| j > i).map(|&j| j - i));
        }
    }

    trace!(
        "indexed locator found {} offsets over {} distinct trigrams",
        offsets.len(),
        positions.len()
    );
    offsets
}

/// Find the same offsets as [`locate`], scanning start indices in parallel
#[cfg(feature = "parallel")]
pub fn locate_parallel(text: &[u8]) -> Vec<usize> {
    use rayon::prelude::*;

    if text.len() < TRIGRAM_LEN {
        return Vec::new();
    }

    // collect keeps the sequential order of the outer loop
    let offsets: Vec<usize> = (0..=text.len() - TRIGRAM_LEN)
        .into_par_iter()
        .flat_map_iter(|i| scan_from(text, i))
        .collect();

    trace!("parallel locator found {} offsets", offsets.len());
    offsets
}

/// List the divisors d of an offset with 1 < d < offset, in ascending order
///
/// errors: returns Error for offsets less than two
///
/// Empty for prime offsets
pub fn divisors(offset: usize) -> Result<Vec<usize>, Error> {
    if offset < MIN_OFFSET {
        return Err(Error::InvalidOffset(offset));
    }

    Ok((MIN_OFFSET..offset).filter(|d| offset % d == 0).collect())
}
