//! Page-number pagination primitives shared by listing endpoints.
//!
//! A [`PageRequest`] pairs a 1-based [`PageNumber`] with a fixed
//! [`PageSize`] and derives the `skip`/`limit` window a store query needs.
//! Once the store has answered, [`PageRequest::resolve`] decides whether the
//! fetched page can be shown or whether the caller asked for a page past the
//! end and must be sent to the last valid one.
//!
//! # Examples
//! ```
//! use pagination::{PageNumber, PageRequest, PageResolution, PageSize};
//!
//! let size = PageSize::new(6).expect("non-zero size");
//! let request = PageRequest::new(PageNumber::parse_lenient(Some("5")), size);
//! assert_eq!(request.skip(), 24);
//!
//! // Only seven records exist, so page five came back empty.
//! let resolution = request.resolve(0, 7);
//! assert_eq!(resolution, PageResolution::RedirectTo(PageNumber::new(2).expect("page")));
//! ```

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

mod envelope;

pub use envelope::Page;

/// Errors raised when constructing pagination values from raw integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Page numbers are 1-based.
    #[error("page number must be at least 1")]
    ZeroPage,
    /// A page must hold at least one record.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// A 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Validate a raw page number.
    pub fn new(value: u32) -> Result<Self, PaginationError> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(PaginationError::ZeroPage)
    }

    /// Parse a page number from untrusted text.
    ///
    /// Missing, non-numeric, zero, and negative inputs all clamp to the first
    /// page; values beyond `u32::MAX` saturate.
    ///
    /// ```
    /// use pagination::PageNumber;
    ///
    /// assert_eq!(PageNumber::parse_lenient(Some("3")).get(), 3);
    /// assert_eq!(PageNumber::parse_lenient(Some("-2")), PageNumber::FIRST);
    /// assert_eq!(PageNumber::parse_lenient(Some("two")), PageNumber::FIRST);
    /// assert_eq!(PageNumber::parse_lenient(None), PageNumber::FIRST);
    /// ```
    #[must_use]
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
            return Self::FIRST;
        };
        if text.starts_with('-') || !text.chars().all(|c| c.is_ascii_digit()) {
            return Self::FIRST;
        }
        let value = text.parse::<u32>().unwrap_or(u32::MAX);
        Self::new(value).unwrap_or(Self::FIRST)
    }

    /// Saturating conversion from a page count.
    ///
    /// Counts of zero map to the first page so a redirect target is always a
    /// page that can be rendered.
    #[must_use]
    pub fn from_count(count: u64) -> Self {
        let value = u32::try_from(count).unwrap_or(u32::MAX);
        Self::new(value).unwrap_or(Self::FIRST)
    }

    /// Raw page number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for PageNumber {
    type Error = PaginationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageNumber> for u32 {
    fn from(value: PageNumber) -> Self {
        value.get()
    }
}

/// Fixed number of records shown per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(NonZeroU32);

impl PageSize {
    /// Six records per page.
    pub const DEFAULT: Self = match NonZeroU32::new(6) {
        Some(size) => Self(size),
        None => Self(NonZeroU32::MIN),
    };

    /// Validate a raw page size.
    pub fn new(value: u32) -> Result<Self, PaginationError> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(PaginationError::ZeroPageSize)
    }

    /// Raw page size.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for PageSize {
    type Error = PaginationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u32 {
    fn from(value: PageSize) -> Self {
        value.get()
    }
}

/// Number of pages needed to show `total` records, i.e. `ceil(total / size)`.
///
/// ```
/// use pagination::{PageSize, page_count};
///
/// let size = PageSize::new(6).expect("size");
/// assert_eq!(page_count(0, size), 0);
/// assert_eq!(page_count(6, size), 1);
/// assert_eq!(page_count(7, size), 2);
/// ```
#[must_use]
pub fn page_count(total: u64, size: PageSize) -> u64 {
    total.div_ceil(u64::from(size.get()))
}

/// What the caller should do with a fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageResolution {
    /// The page is valid (possibly empty on the first page) and can be shown.
    Render,
    /// The requested page lies past the end; send the caller here instead.
    RedirectTo(PageNumber),
}

/// A page number paired with the page size, yielding an offset window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: PageNumber,
    size: PageSize,
}

impl PageRequest {
    /// Pair a page number with a page size.
    #[must_use]
    pub const fn new(page: PageNumber, size: PageSize) -> Self {
        Self { page, size }
    }

    /// Requested page.
    #[must_use]
    pub const fn page(&self) -> PageNumber {
        self.page
    }

    /// Configured page size.
    #[must_use]
    pub const fn size(&self) -> PageSize {
        self.size
    }

    /// Records to skip: `(page - 1) * size`. Never negative.
    #[must_use]
    pub fn skip(&self) -> u64 {
        u64::from(self.page.get() - 1) * u64::from(self.size.get())
    }

    /// Maximum records to fetch.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.size.get()
    }

    /// Decide whether a fetched page can be shown.
    ///
    /// `returned` is the number of records the store produced for this
    /// window and `total` the number of records matching the filter. An
    /// empty page is only an overflow when records were skipped; the first
    /// page is always renderable, even when nothing exists yet.
    #[must_use]
    pub fn resolve(&self, returned: usize, total: u64) -> PageResolution {
        if returned == 0 && self.skip() > 0 {
            PageResolution::RedirectTo(PageNumber::from_count(page_count(total, self.size)))
        } else {
            PageResolution::Render
        }
    }
}
