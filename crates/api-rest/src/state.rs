use intake_core::TotpVerifier;
use intake_files::UploadPipeline;
use std::sync::Arc;

use crate::page::render_landing_page;

/// Surface options for the REST server.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Attach the permissive CORS layer
    pub cors: bool,

    /// Serve the upload page on `GET /`
    pub landing_page: bool,

    /// Base URL the landing page links stored files under
    pub images_url: Option<String>,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            cors: false,
            landing_page: true,
            images_url: None,
        }
    }
}

/// Application state shared across REST API handlers
///
/// Everything in here is read-only once the server starts. The verifier holds the shared
/// secret loaded at startup; the pipeline knows where and how much to store.
#[derive(Clone)]
pub struct AppState {
    verifier: Arc<TotpVerifier>,
    pipeline: Arc<UploadPipeline>,
    rest: Arc<RestConfig>,
    landing_page: Arc<str>,
}

impl AppState {
    pub fn new(verifier: TotpVerifier, pipeline: UploadPipeline, rest: RestConfig) -> Self {
        let landing_page = render_landing_page(rest.images_url.as_deref());
        Self {
            verifier: Arc::new(verifier),
            pipeline: Arc::new(pipeline),
            rest: Arc::new(rest),
            landing_page: landing_page.into(),
        }
    }

    pub fn verifier(&self) -> &TotpVerifier {
        &self.verifier
    }

    pub fn pipeline(&self) -> &Arc<UploadPipeline> {
        &self.pipeline
    }

    pub fn rest(&self) -> &RestConfig {
        &self.rest
    }

    pub(crate) fn landing_page(&self) -> &str {
        &self.landing_page
    }
}
