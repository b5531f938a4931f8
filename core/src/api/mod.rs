// Management server API
//
// Typed records returned by the server and the seam widgets fetch them through.

mod http;
mod types;

pub use http::{HttpConsoleApi, ALL_ACTIVITY_PATH, BREADCRUMBS_PATH};
pub use types::{ActivityRecord, BreadcrumbEntry, EntityId};

use crate::Result;
use async_trait::async_trait;

/// Data source for the console widgets
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    /// Recent tasks across all entities, in server order
    async fn all_activity(&self) -> Result<Vec<ActivityRecord>>;

    /// Ancestor path of an entity, in server order
    async fn breadcrumbs(&self, id: &EntityId) -> Result<Vec<BreadcrumbEntry>>;
}
