//! Page parameters and poll interval
//!
//! Value types whose constructors enforce the pagination invariants: a page
//! size always belongs to the allowed set and a poll interval is never zero.

use crate::api::PageOptions;
use crate::consts::cli_consts::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use std::fmt::{Display, Formatter};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("page size {0} is not one of 10, 20, 30, 60, 100")]
    InvalidPageSize(usize),

    #[error("poll interval must be at least one second")]
    ZeroPollInterval,
}

/// Number of rows per page, restricted to [`PAGE_SIZE_OPTIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(usize);

impl PageSize {
    pub fn new(size: usize) -> Result<Self, ParamError> {
        if PAGE_SIZE_OPTIONS.contains(&size) {
            Ok(Self(size))
        } else {
            Err(ParamError::InvalidPageSize(size))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// The next allowed size, wrapping from the largest back to the smallest.
    pub fn next(self) -> Self {
        let idx = PAGE_SIZE_OPTIONS
            .iter()
            .position(|&s| s == self.0)
            .unwrap_or(0);
        Self(PAGE_SIZE_OPTIONS[(idx + 1) % PAGE_SIZE_OPTIONS.len()])
    }

    pub fn options() -> impl Iterator<Item = PageSize> {
        PAGE_SIZE_OPTIONS.iter().map(|&s| PageSize(s))
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

impl Display for PageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Largest page index whose 1-based page number still fits in a `usize`.
pub const MAX_PAGE_INDEX: usize = usize::MAX - 1;

/// Zero-based page index plus page size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    pub page_index: usize,
    pub page_size: PageSize,
}

impl PageParams {
    /// Indexes past [`MAX_PAGE_INDEX`] are clamped to it.
    pub fn new(page_index: usize, page_size: PageSize) -> Self {
        Self {
            page_index: page_index.min(MAX_PAGE_INDEX),
            page_size,
        }
    }

    /// Request options for the API, which numbers pages from 1.
    pub fn to_page_options(self) -> PageOptions {
        PageOptions {
            page: self.page_index.saturating_add(1),
            size: self.page_size.get(),
        }
    }

    /// Number of pages needed for `total` items; never less than one.
    pub fn page_count(self, total: u64) -> usize {
        let size = self.page_size.get() as u64;
        (total.div_ceil(size) as usize).max(1)
    }

    /// 1-based inclusive range of the items shown on this page, if any.
    pub fn item_range(self, total: u64) -> Option<(u64, u64)> {
        let size = self.page_size.get() as u64;
        let first = (self.page_index as u64).checked_mul(size)?.checked_add(1)?;
        if first > total {
            return None;
        }
        Some((first, first.saturating_add(size - 1).min(total)))
    }
}

/// Period of the recurring fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollInterval(Duration);

impl PollInterval {
    pub fn from_secs(secs: u64) -> Result<Self, ParamError> {
        if secs == 0 {
            return Err(ParamError::ZeroPollInterval);
        }
        Ok(Self(Duration::from_secs(secs)))
    }

    pub fn as_duration(self) -> Duration {
        self.0
    }

    #[cfg(test)]
    pub fn as_secs(self) -> u64 {
        self.0.as_secs()
    }
}

impl Display for PollInterval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0.as_secs())
    }
}
