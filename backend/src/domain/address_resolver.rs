//! First stage of the resolution chain: postal code to structured address.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::ports::{DirectoryLookup, PostalCodeDirectory, PostalCodeDirectoryError};
use super::{AddressFields, PostalCode};

/// Outcome of [`AddressResolver::resolve_address`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressResolution {
    /// The directory returned an address; `composite` is the geocoder query.
    Found {
        address: AddressFields,
        composite: String,
    },
    /// The directory has no entry for the code.
    NotFound,
}

/// Queries the postal code directory with a bounded wait.
#[derive(Clone)]
pub struct AddressResolver {
    directory: Arc<dyn PostalCodeDirectory>,
    timeout: Duration,
}

impl AddressResolver {
    pub fn new(directory: Arc<dyn PostalCodeDirectory>, timeout: Duration) -> Self {
        Self { directory, timeout }
    }

    /// Look up `postal_code` once. No retry; failures are logged and returned.
    pub async fn resolve_address(
        &self,
        postal_code: &PostalCode,
    ) -> Result<AddressResolution, PostalCodeDirectoryError> {
        let lookup = match tokio::time::timeout(self.timeout, self.directory.lookup(postal_code))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(PostalCodeDirectoryError::timeout(format!(
                "no answer within {}ms",
                self.timeout.as_millis()
            ))),
        };

        match lookup {
            Ok(DirectoryLookup::Found(address)) => {
                let composite = address.composite();
                debug!(%postal_code, %composite, "postal code resolved");
                Ok(AddressResolution::Found { address, composite })
            }
            Ok(DirectoryLookup::NotFound) => {
                debug!(%postal_code, "postal code not in directory");
                Ok(AddressResolution::NotFound)
            }
            Err(error) => {
                warn!(%postal_code, %error, "postal code lookup failed");
                Err(error)
            }
        }
    }
}
