//! Driven port for looking up a postal code in the national directory.
//!
//! The directory answers with the structured address for an 8-digit code or
//! reports that the code is unknown. Unknown codes are an ordinary outcome,
//! not an error.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{AddressFields, PostalCode};

/// Result of a successful directory round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryLookup {
    /// The directory knows the code.
    Found(AddressFields),
    /// The directory answered but has no entry for the code.
    NotFound,
}

define_port_error! {
    /// Errors surfaced while calling the postal code directory.
    pub enum PostalCodeDirectoryError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "postal code directory transport failed: {message}",
        /// The lookup exceeded its time budget.
        Timeout { message: String } =>
            "postal code directory timeout: {message}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "postal code directory response decode failed: {message}",
        /// The adapter rejected the request before execution.
        InvalidRequest { message: String } =>
            "postal code directory request invalid: {message}",
    }
}

/// Port for resolving postal codes into addresses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostalCodeDirectory: Send + Sync {
    /// Look up one postal code.
    ///
    /// # Examples
    ///
    /// ```
    /// use intake::domain::PostalCode;
    /// use intake::domain::ports::{
    ///     DirectoryLookup, FixturePostalCodeDirectory, PostalCodeDirectory,
    /// };
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let code = PostalCode::parse("01310-000").expect("valid postal code");
    /// let lookup = FixturePostalCodeDirectory.lookup(&code).await;
    /// assert_eq!(lookup, Ok(DirectoryLookup::NotFound));
    /// # });
    /// ```
    async fn lookup(
        &self,
        postal_code: &PostalCode,
    ) -> Result<DirectoryLookup, PostalCodeDirectoryError>;
}

/// Fixture implementation that knows no postal codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePostalCodeDirectory;

#[async_trait]
impl PostalCodeDirectory for FixturePostalCodeDirectory {
    async fn lookup(
        &self,
        _postal_code: &PostalCode,
    ) -> Result<DirectoryLookup, PostalCodeDirectoryError> {
        Ok(DirectoryLookup::NotFound)
    }
}
