use alloc::{vec, vec::Vec};
use core::fmt;

use log::debug;

/// Smallest key length inspected by default
pub const DEFAULT_MIN_KEY_LENGTH: usize = 2;

/// Largest key length inspected by default, keys are assumed to be short
pub const DEFAULT_MAX_KEY_LENGTH: usize = 15;

/// Upper bound on any candidate window, no key can be longer than the longest accepted ciphertext
pub const MAX_KEY_LENGTH: usize = 16_384;

#[derive(Debug, PartialEq)]
pub enum Error {
    InvalidWindow { min: usize, max: usize },
    WindowMismatch,
    NoVotes,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidWindow { min, max } => write!(
                f,
                "invalid candidate window [{}, {}], expected 2 <= min <= max <= {}",
                min, max, MAX_KEY_LENGTH
            ),
            Error::WindowMismatch => write!(f, "cannot merge vote tables over different windows"),
            Error::NoVotes => write!(f, "no divisor fell inside the candidate window"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Inclusive range of candidate key lengths
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    min: usize,
    max: usize,
}

impl Window {
    /// Create a candidate window [min, max]
    ///
    /// errors: returns Error if min < 2, min > max or max > MAX_KEY_LENGTH
    pub fn new(min: usize, max: usize) -> Result<Self, Error> {
        if min < DEFAULT_MIN_KEY_LENGTH || min > max || max > MAX_KEY_LENGTH {
            return Err(Error::InvalidWindow { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn contains(&self, candidate: usize) -> bool {
        (self.min..=self.max).contains(&candidate)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_KEY_LENGTH,
            max: DEFAULT_MAX_KEY_LENGTH,
        }
    }
}

/// Tally of divisor occurrences per candidate key length
///
/// Indexed directly by candidate, entries below the window minimum stay zero.
#[derive(Clone, Debug, PartialEq)]
pub struct VoteTable {
    window: Window,
    counts: Vec<usize>,
}

impl VoteTable {
    /// Create an empty table over the given window
    pub fn new(window: Window) -> Self {
        Self {
            window,
            counts: vec![0; window.max + 1],
        }
    }

    pub fn window(&self) -> Window {
        self.window
    }

    /// Add one vote for every divisor inside the window, divisors outside it are ignored
    pub fn record(&mut self, divisors: &[usize]) {
        for &d in divisors {
            if self.window.contains(d) {
                self.counts[d] += 1;
            }
        }
    }

    /// Votes for a candidate, zero for candidates outside the window
    pub fn count(&self, candidate: usize) -> usize {
        if self.window.contains(candidate) {
            self.counts[candidate]
        } else {
            0
        }
    }

    /// Iterate over (candidate, votes) in ascending candidate order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.window.min..=self.window.max).map(move |c| (c, self.counts[c]))
    }

    /// Total number of votes cast
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Sum the votes of two tables over the same window
    pub fn merge(mut self, other: &VoteTable) -> Result<Self, Error> {
        if self.window != other.window {
            return Err(Error::WindowMismatch);
        }
        self.absorb(other);
        Ok(self)
    }

    fn absorb(&mut self, other: &VoteTable) {
        for (count, other) in self.counts.iter_mut().zip(other.counts.iter()) {
            *count += other;
        }
    }

    /// Select the candidate with the most votes
    ///
    /// Candidates are scanned in ascending order and only a strictly greater
    /// count replaces the current best, so the smallest candidate wins a tie.
    ///
    /// errors: returns Error if no candidate received a vote
    pub fn estimate(&self) -> Result<usize, Error> {
        let mut best = (0, 0);
        for (candidate, count) in self.iter() {
            if count > best.1 {
                best = (candidate, count);
            }
        }

        if best.1 == 0 {
            return Err(Error::NoVotes);
        }

        debug!("key length estimate {} with {} votes", best.0, best.1);
        Ok(best.0)
    }
}

/// Tally every divisor set into a fresh table
pub fn vote<D: AsRef<[usize]>>(divisor_sets: &[D], window: Window) -> VoteTable {
    let mut table = VoteTable::new(window);
    for divisors in divisor_sets {
        table.record(divisors.as_ref());
    }
    table
}

/// Tally divisor sets on a thread pool, each worker fills its own table before merging
#[cfg(feature = "parallel")]
pub fn vote_parallel<D: AsRef<[usize]> + Sync>(divisor_sets: &[D], window: Window) -> VoteTable {
    use rayon::prelude::*;

    divisor_sets
        .par_iter()
        .fold(
            || VoteTable::new(window),
            |mut table, divisors| {
                table.record(divisors.as_ref());
                table
            },
        )
        .reduce(
            || VoteTable::new(window),
            // windows are identical by construction
            |mut left, right| {
                left.absorb(&right);
                left
            },
        )
}
