//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Handle`] - Validated GitHub username used as the lookup key
//! - [`PageSize`] - Number of repositories fetched per lookup
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so the fetchers never see a blank handle or a
//! zero page size.
//!
//! # Examples
//!
//! ```
//! use githunts::core::types::{Handle, PageSize};
//!
//! let handle = Handle::new("  octocat ").unwrap();
//! assert_eq!(handle.as_str(), "octocat");
//!
//! assert!(Handle::new("   ").is_err());
//! assert!(PageSize::new(0).is_err());
//! assert_eq!(PageSize::default().get(), 5);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("handle cannot be blank")]
    BlankHandle,

    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    #[error("invalid page size: {0}")]
    InvalidPageSize(String),
}

/// Maximum length of a GitHub login.
const MAX_HANDLE_LEN: usize = 39;

/// A validated GitHub handle (username).
///
/// Surrounding whitespace is trimmed. The remaining text must be non-empty
/// and must not contain characters that would escape the `/users/{handle}`
/// path segment.
///
/// # Example
///
/// ```
/// use githunts::core::types::Handle;
///
/// let handle = Handle::new("rust-lang").unwrap();
/// assert_eq!(handle.to_string(), "rust-lang");
///
/// assert!(Handle::new("").is_err());
/// assert!(Handle::new("owner/repo").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Create a new validated handle.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::BlankHandle` for empty or whitespace-only input
    /// and `TypeError::InvalidHandle` for malformed input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = raw.as_ref().trim();
        Self::validate(trimmed)?;
        Ok(Self(trimmed.to_string()))
    }

    /// Parse user input, treating blank input as "no handle".
    ///
    /// Returns `Ok(None)` for blank input so callers can short-circuit
    /// without issuing a request.
    pub fn parse_input(raw: &str) -> Result<Option<Self>, TypeError> {
        match Self::new(raw) {
            Ok(handle) => Ok(Some(handle)),
            Err(TypeError::BlankHandle) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::BlankHandle);
        }

        if name.len() > MAX_HANDLE_LEN {
            return Err(TypeError::InvalidHandle(format!(
                "handle cannot be longer than {MAX_HANDLE_LEN} characters"
            )));
        }

        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(TypeError::InvalidHandle(format!(
                "handle cannot contain '{c}'"
            )));
        }

        Ok(())
    }

    /// Get the handle as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Handle {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of repositories to fetch for a lookup.
///
/// Any positive integer is accepted. [`PageSize::CHOICES`] lists the sizes
/// offered by the dashboard selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Page sizes offered by the selector.
    pub const CHOICES: [u32; 4] = [5, 10, 15, 20];

    /// Largest `per_page` value the GitHub API honours.
    pub const API_MAX: u32 = 100;

    /// Create a page size.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPageSize` for zero.
    pub fn new(size: u32) -> Result<Self, TypeError> {
        if size == 0 {
            return Err(TypeError::InvalidPageSize(
                "page size must be a positive integer".into(),
            ));
        }
        Ok(Self(size))
    }

    /// Get the requested size.
    pub fn get(self) -> u32 {
        self.0
    }

    /// The `per_page` value to send upstream.
    pub fn per_page(self) -> u32 {
        self.0.min(Self::API_MAX)
    }

    /// Whether this size is one of the selector choices.
    pub fn is_standard(self) -> bool {
        Self::CHOICES.contains(&self.0)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(Self::CHOICES[0])
    }
}

impl TryFrom<u32> for PageSize {
    type Error = TypeError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

impl std::str::FromStr for PageSize {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u32 = s
            .trim()
            .parse()
            .map_err(|_| TypeError::InvalidPageSize(format!("'{s}' is not a positive integer")))?;
        Self::new(n)
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
