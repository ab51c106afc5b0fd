//! Remote content boundary.
//!
//! The crate itself never talks to a repository host; callers that
//! diff a (base ref, head ref) pair implement [`ContentSource`] and
//! feed the fetched texts to [`crate::diff_sources`]. The error set is
//! the contract: fatal conditions must surface as explicit failures,
//! never be masked as empty content.

use error_set::error_set;

error_set! {
    /// Failures a remote content source must surface
    FetchError := {
        /// The path names a directory, not a file
        #[display("'{path}' is a directory, not a file")]
        IsDirectory { path: String },
        /// The object exists but has no retrievable content
        #[display("No content available for '{path}' at {reference}")]
        MissingContent { path: String, reference: String },
        /// The file exceeds the source's size ceiling
        #[display("'{path}' exceeds the {limit} byte content ceiling")]
        TooLarge { path: String, limit: u64 },
        /// The transport layer failed
        #[display("Transport failure: {message}")]
        Transport { message: String },
    }
}

/// File-content provider for a repository at a given reference.
pub trait ContentSource {
    /// Fetch the full text of one file at `reference`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the path is a directory, the
    /// content is missing or oversized, or the transport fails.
    fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<String, FetchError>;
}
