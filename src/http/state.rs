use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::assistant::AssistantSettings;
use crate::config::TrackerConfig;
use crate::history::ActivityLog;
use crate::location::LocationSourceFactory;
use crate::run::{RunOutcome, RunSession, RunTracker};

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Runs in progress (run_id → session)
    pub runs: Arc<RwLock<HashMap<String, Arc<RunSession>>>>,

    /// Finished runs, most recent first
    pub activities: Arc<RwLock<ActivityLog>>,

    /// Current assistant settings, snapshotted into each new run
    pub settings: Arc<RwLock<AssistantSettings>>,

    /// Tracker timings, start position and seed
    pub tracker: TrackerConfig,
}

impl AppState {
    pub fn new(settings: AssistantSettings, tracker: TrackerConfig) -> Self {
        Self {
            runs: Arc::new(RwLock::new(HashMap::new())),
            activities: Arc::new(RwLock::new(ActivityLog::new())),
            settings: Arc::new(RwLock::new(settings)),
            tracker,
        }
    }

    /// Create a run from the current settings and the latest activity, start
    /// its countdown and register it. A watcher moves the run into the
    /// activity log when it finishes.
    pub async fn start_run(&self) -> Result<Arc<RunSession>> {
        let settings = self.settings.read().await.clone();
        let last_run = self.activities.read().await.latest().cloned();
        let source = LocationSourceFactory::create(self.tracker.source_kind())?;

        let tracker = RunTracker::new(
            settings,
            last_run.as_ref(),
            source,
            self.tracker.start_position(),
        );
        let session = Arc::new(RunSession::new(tracker, self.tracker.timings()));

        let outcome_rx = session
            .take_outcome()
            .await
            .ok_or_else(|| anyhow::anyhow!("run outcome already taken"))?;

        session.start().await?;

        let run_id = session.run_id().to_string();
        self.runs
            .write()
            .await
            .insert(run_id.clone(), Arc::clone(&session));

        let runs = Arc::clone(&self.runs);
        let activities = Arc::clone(&self.activities);
        tokio::spawn(async move {
            match outcome_rx.await {
                Ok(RunOutcome::Finished(summary)) => {
                    let id = summary.id.clone();
                    activities.write().await.record(summary);
                    runs.write().await.remove(&id);
                }
                Ok(RunOutcome::Cancelled { run_id }) => {
                    info!("Run {} cancelled, discarding", run_id);
                    runs.write().await.remove(&run_id);
                }
                Err(_) => {
                    warn!("Run {} ended without an outcome", run_id);
                    runs.write().await.remove(&run_id);
                }
            }
        });

        Ok(session)
    }

    pub async fn get_run(&self, run_id: &str) -> Option<Arc<RunSession>> {
        self.runs.read().await.get(run_id).cloned()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AssistantSettings::default(), TrackerConfig::default())
    }
}
