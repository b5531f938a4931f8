// Dashboard widgets

mod activity;

pub use activity::{ActivityWidget, RefreshToggle, ACTIVITY_COLUMNS, RECENT_ACTIVITY_FAILURE};
