//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use intake::domain::FormController;
use intake::domain::ports::{ChartSurface, SavedRecordRepository};

/// Everything the HTTP server needs once the form has been mounted.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) form: FormController,
    pub(crate) saved_records: Arc<dyn SavedRecordRepository>,
    pub(crate) charts: Arc<dyn ChartSurface>,
}

impl ServerConfig {
    /// Construct a server configuration around a mounted form.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        form: FormController,
        saved_records: Arc<dyn SavedRecordRepository>,
        charts: Arc<dyn ChartSurface>,
    ) -> Self {
        Self {
            bind_addr,
            form,
            saved_records,
            charts,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
