pub mod assistant;
pub mod config;
pub mod format;
pub mod geo;
pub mod history;
pub mod http;
pub mod location;
pub mod run;

pub use assistant::{AssistantEvent, AssistantSettings, AssistantTrigger, Announcer, PaceMode};
pub use config::Config;
pub use format::{format_distance, format_duration, format_pace, format_speed};
pub use geo::{haversine_distance, GeoPoint};
pub use history::ActivityLog;
pub use http::{create_router, AppState};
pub use location::{LocationSource, LocationSourceFactory, LocationSourceKind, RandomWalkSource};
pub use run::{
    LocationSample, RunOutcome, RunSession, RunSnapshot, RunState, RunSummary, RunTimings,
    RunTracker, RunUpdate,
};
