// HTTP implementation of the console API
//
// Endpoints are resolved against the dashboard page URL the same way a browser resolves
// relative links, so a console served from `/dashboard/` reads `/entity/allActivity`.

use super::{ActivityRecord, BreadcrumbEntry, ConsoleApi, EntityId};
use crate::config::ConsoleConfig;
use crate::{ConsoleError, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

pub const ALL_ACTIVITY_PATH: &str = "../entity/allActivity";
pub const BREADCRUMBS_PATH: &str = "../entity/breadcrumbs";

#[derive(Clone)]
pub struct HttpConsoleApi {
    http: Client,
    page_url: Url,
}

impl HttpConsoleApi {
    pub fn new(page_url: &str, request_timeout_ms: Option<u64>) -> Result<Self> {
        let page_url = Url::parse(page_url).map_err(|e| ConsoleError::InvalidUrl {
            url: page_url.to_string(),
            reason: e.to_string(),
        })?;

        let mut builder =
            Client::builder().user_agent(concat!("brooklyn-console/", env!("CARGO_PKG_VERSION")));
        if let Some(ms) = request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder.build()?;

        Ok(Self { http, page_url })
    }

    pub fn from_config(config: &ConsoleConfig) -> Result<Self> {
        Self::new(&config.page_url, config.request_timeout_ms)
    }

    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    pub fn all_activity_url(&self) -> Result<Url> {
        self.resolve(ALL_ACTIVITY_PATH)
    }

    pub fn breadcrumbs_url(&self, id: &EntityId) -> Result<Url> {
        let mut url = self.resolve(BREADCRUMBS_PATH)?;
        url.query_pairs_mut().append_pair("id", id.as_str());
        Ok(url)
    }

    fn resolve(&self, relative: &str) -> Result<Url> {
        self.page_url
            .join(relative)
            .map_err(|e| ConsoleError::InvalidUrl {
                url: relative.to_string(),
                reason: e.to_string(),
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(target: "api", url = %url, "GET");

        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            warn!(target: "api", url = %url, error = %e, "Request failed");
            ConsoleError::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(target: "api", url = %url, status = %status, "Server returned error");
            return Err(ConsoleError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!(target: "api", url = %url, error = %e, "Failed to decode response");
            ConsoleError::MalformedResponse(format!("{url}: {e}"))
        })
    }
}

#[async_trait]
impl ConsoleApi for HttpConsoleApi {
    async fn all_activity(&self) -> Result<Vec<ActivityRecord>> {
        let url = self.all_activity_url()?;
        self.get_json(url).await
    }

    async fn breadcrumbs(&self, id: &EntityId) -> Result<Vec<BreadcrumbEntry>> {
        let url = self.breadcrumbs_url(id)?;
        self.get_json(url).await
    }
}
