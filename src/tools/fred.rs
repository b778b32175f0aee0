//! FRED (Federal Reserve Economic Data) tools. The adapter carries the
//! `api_key` and `file_type` defaults; per-call parameters ride through
//! [`RequestOptions`].

use crate::client::{ApiAdapter, RequestOptions, Verb};
use crate::tools::render;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Identifies a release of economic data.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReleaseSeriesKey {
    /// The FRED release identifier.
    pub release_id: String,
}

#[derive(Debug, Clone)]
pub struct FredTools {
    adapter: Arc<ApiAdapter>,
}

impl FredTools {
    #[must_use]
    pub const fn new(adapter: Arc<ApiAdapter>) -> Self {
        Self { adapter }
    }

    /// All releases of economic data.
    #[instrument(skip(self))]
    pub async fn data_releases(&self) -> String {
        render(
            self.adapter.get("releases").await,
            "Unable to fetch FRED economic data releases, or no data found.",
        )
    }

    /// The series on a release of economic data.
    #[instrument(skip(self))]
    pub async fn release_series(&self, key: &ReleaseSeriesKey) -> String {
        let options = RequestOptions::new().param("release_id", key.release_id.as_str());
        render(
            self.adapter.invoke(Verb::Get, "release/series", options).await,
            "Unable to fetch FRED economic data sources, or no data found.",
        )
    }
}
