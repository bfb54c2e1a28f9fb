//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on the form controller and domain ports.

use std::sync::Arc;

use crate::domain::FormController;
use crate::domain::ports::{ChartSurface, SavedRecordRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// The single in-process form session.
    pub form: FormController,
    /// Parent-held saved record, shared with the form.
    pub saved_records: Arc<dyn SavedRecordRepository>,
    /// Surface receiving dashboard series.
    pub charts: Arc<dyn ChartSurface>,
}

impl HttpState {
    pub fn new(
        form: FormController,
        saved_records: Arc<dyn SavedRecordRepository>,
        charts: Arc<dyn ChartSurface>,
    ) -> Self {
        Self {
            form,
            saved_records,
            charts,
        }
    }
}
