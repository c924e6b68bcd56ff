//! Scheduled job trigger
//!
//! The trigger owns *when* a rotation run happens; the scheduler owns
//! *what* a run does. It fires once per day at a configured local time,
//! supports manual "run now" invocation, and broadcasts run outcomes
//! over a tokio channel. Retry policy lives here: a failed scheduled run
//! is logged and left for the next firing.

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use super::error::{RotationError, RotationResult};
use super::scheduler::{RotationScheduler, RunResult};

// ============================================================================
// Trigger Configuration
// ============================================================================

/// Configuration for the daily job trigger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Time of day to fire (24h format, e.g., "09:00"), local time
    pub post_time: String,

    /// Whether to run a rotation immediately on startup
    pub run_on_startup: bool,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            post_time: "09:00".to_string(),
            run_on_startup: false,
        }
    }
}

impl TriggerConfig {
    /// Create a new config builder
    pub fn builder() -> TriggerConfigBuilder {
        TriggerConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> RotationResult<()> {
        if NaiveTime::parse_from_str(&self.post_time, "%H:%M").is_err() {
            return Err(RotationError::trigger_config(
                "post_time",
                format!("Invalid time format '{}'. Expected HH:MM", self.post_time),
            ));
        }

        Ok(())
    }

    /// Parse the configured post time
    pub fn parse_post_time(&self) -> RotationResult<NaiveTime> {
        NaiveTime::parse_from_str(&self.post_time, "%H:%M").map_err(|_| {
            RotationError::trigger_config("post_time", format!("Invalid time: {}", self.post_time))
        })
    }
}

/// Builder for TriggerConfig
#[derive(Debug, Default)]
pub struct TriggerConfigBuilder {
    post_time: Option<String>,
    run_on_startup: Option<bool>,
}

impl TriggerConfigBuilder {
    /// Set the daily firing time
    pub fn post_time(mut self, time: impl Into<String>) -> Self {
        self.post_time = Some(time.into());
        self
    }

    /// Set whether to run on startup
    pub fn run_on_startup(mut self, value: bool) -> Self {
        self.run_on_startup = Some(value);
        self
    }

    /// Build the config
    pub fn build(self) -> RotationResult<TriggerConfig> {
        let config = TriggerConfig {
            post_time: self.post_time.unwrap_or_else(|| "09:00".to_string()),
            run_on_startup: self.run_on_startup.unwrap_or(false),
        };
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Trigger Events
// ============================================================================

/// Events emitted by the trigger
#[derive(Debug, Clone)]
pub enum TriggerEvent {
    /// A rotation run completed
    RunCompleted {
        result: RunResult,
        manual: bool,
        triggered_at: DateTime<Utc>,
    },

    /// A rotation run failed
    RunFailed {
        reason: String,
        manual: bool,
        triggered_at: DateTime<Utc>,
    },
}

// ============================================================================
// Job Trigger
// ============================================================================

/// Timer-driven entry point for the rotation scheduler
pub struct JobTrigger {
    config: TriggerConfig,
    scheduler: Arc<RotationScheduler>,
    event_sender: broadcast::Sender<TriggerEvent>,
    is_running: Arc<RwLock<bool>>,
}

impl JobTrigger {
    /// Create a new trigger
    pub fn new(config: TriggerConfig, scheduler: Arc<RotationScheduler>) -> RotationResult<Self> {
        config.validate()?;

        let (event_sender, _) = broadcast::channel(64);

        Ok(Self {
            config,
            scheduler,
            event_sender,
            is_running: Arc::new(RwLock::new(false)),
        })
    }

    /// Create with default config
    pub fn with_defaults(scheduler: Arc<RotationScheduler>) -> RotationResult<Self> {
        Self::new(TriggerConfig::default(), scheduler)
    }

    /// Subscribe to trigger events
    pub fn subscribe(&self) -> broadcast::Receiver<TriggerEvent> {
        self.event_sender.subscribe()
    }

    /// Calculate duration until the next firing time
    pub fn duration_until_next_run(&self) -> RotationResult<Duration> {
        let post_time = self.config.parse_post_time()?;
        let now = Local::now();
        let today = now.date_naive();

        let target_today = today.and_time(post_time);
        let target_dt = Local.from_local_datetime(&target_today).unwrap();

        if now < target_dt {
            Ok(target_dt.signed_duration_since(now))
        } else {
            let tomorrow = today + Duration::days(1);
            let target_tomorrow = tomorrow.and_time(post_time);
            let target_dt = Local.from_local_datetime(&target_tomorrow).unwrap();
            Ok(target_dt.signed_duration_since(now))
        }
    }

    /// Start the trigger loop (runs until stopped)
    pub async fn start(&self) -> RotationResult<()> {
        *self.is_running.write().await = true;

        if self.config.run_on_startup {
            self.execute_run(false).await;
        }

        while *self.is_running.read().await {
            let sleep_duration = self.duration_until_next_run()?;
            tracing::debug!(
                seconds = sleep_duration.num_seconds(),
                "sleeping until next scheduled run"
            );

            tokio::select! {
                _ = tokio::time::sleep(sleep_duration.to_std().unwrap_or(std::time::Duration::from_secs(60))) => {
                    self.execute_run(false).await;
                }
                _ = self.wait_for_stop() => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Stop the trigger loop
    pub async fn stop(&self) {
        *self.is_running.write().await = false;
    }

    /// Check if the trigger loop is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Run a rotation immediately, outside the schedule
    ///
    /// Carries the documented race: a manual run overlapping a scheduled
    /// firing can produce two posts with the same category.
    pub async fn run_now(&self) -> RotationResult<RunResult> {
        let result = self.scheduler.run_once().await;
        self.publish_outcome(&result, true);
        result
    }

    // Internal: wait for stop signal
    async fn wait_for_stop(&self) {
        loop {
            if !*self.is_running.read().await {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    }

    // Internal: run the scheduler and log/broadcast the outcome
    async fn execute_run(&self, manual: bool) {
        let result = self.scheduler.run_once().await;

        match &result {
            Ok(run) => {
                tracing::info!(category = %run.category, post_id = %run.post_id, "scheduled run completed");
            }
            Err(e) => {
                // Left for the next firing; the rotation did not advance
                tracing::error!(error = %e, recoverable = e.is_recoverable(), "scheduled run failed");
            }
        }

        self.publish_outcome(&result, manual);
    }

    fn publish_outcome(&self, result: &RotationResult<RunResult>, manual: bool) {
        let event = match result {
            Ok(run) => TriggerEvent::RunCompleted {
                result: run.clone(),
                manual,
                triggered_at: Utc::now(),
            },
            Err(e) => TriggerEvent::RunFailed {
                reason: e.to_string(),
                manual,
                triggered_at: Utc::now(),
            },
        };
        let _ = self.event_sender.send(event);
    }

    /// Get trigger status
    pub async fn status(&self) -> TriggerStatus {
        let is_running = *self.is_running.read().await;
        let until_next = self.duration_until_next_run().ok();

        TriggerStatus {
            is_running,
            config: self.config.clone(),
            seconds_until_next_run: until_next.map(|d| d.num_seconds()),
        }
    }
}

/// Trigger status information
#[derive(Debug, Clone, Serialize)]
pub struct TriggerStatus {
    pub is_running: bool,
    pub config: TriggerConfig,
    pub seconds_until_next_run: Option<i64>,
}

impl TriggerStatus {
    /// Format as display string
    pub fn display(&self) -> String {
        let mut output = String::from("Trigger Status\n");
        output.push_str(&format!("{:-<40}\n", ""));
        output.push_str(&format!("Running: {}\n", self.is_running));
        output.push_str(&format!("Post Time: {}\n", self.config.post_time));
        output.push_str(&format!("Run On Startup: {}\n", self.config.run_on_startup));

        if let Some(secs) = self.seconds_until_next_run {
            let hours = secs / 3600;
            let mins = (secs % 3600) / 60;
            output.push_str(&format!("Until Next Run: {hours}h {mins}m\n"));
        }

        output
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::TemplateContentCreator;
    use crate::models::BlogCategory;
    use crate::storage::MemoryPostStore;

    fn test_scheduler() -> Arc<RotationScheduler> {
        let store = Arc::new(MemoryPostStore::new());
        let creator = Arc::new(TemplateContentCreator::new(store.clone()));
        Arc::new(RotationScheduler::new(store, creator))
    }

    #[test]
    fn test_trigger_config_default() {
        let config = TriggerConfig::default();
        assert_eq!(config.post_time, "09:00");
        assert!(!config.run_on_startup);
    }

    #[test]
    fn test_trigger_config_validate() {
        let valid = TriggerConfig::default();
        assert!(valid.validate().is_ok());

        let invalid = TriggerConfig {
            post_time: "not a time".to_string(),
            ..Default::default()
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_trigger_config_builder() {
        let config = TriggerConfig::builder()
            .post_time("22:30")
            .run_on_startup(true)
            .build()
            .unwrap();

        assert_eq!(config.post_time, "22:30");
        assert!(config.run_on_startup);
    }

    #[test]
    fn test_builder_rejects_invalid_time() {
        let result = TriggerConfig::builder().post_time("25:99").build();
        assert!(matches!(result, Err(RotationError::TriggerConfig { .. })));
    }

    #[tokio::test]
    async fn test_trigger_creation_not_running() {
        let trigger = JobTrigger::with_defaults(test_scheduler()).unwrap();
        assert!(!trigger.is_running().await);
    }

    #[tokio::test]
    async fn test_duration_until_next_run_bounds() {
        let trigger = JobTrigger::with_defaults(test_scheduler()).unwrap();
        let duration = trigger.duration_until_next_run().unwrap();

        assert!(duration.num_seconds() >= 0);
        assert!(duration.num_seconds() <= 24 * 3600);
    }

    #[tokio::test]
    async fn test_run_now_emits_completed_event() {
        let trigger = JobTrigger::with_defaults(test_scheduler()).unwrap();
        let mut receiver = trigger.subscribe();

        let result = trigger.run_now().await.unwrap();
        assert_eq!(result.category, BlogCategory::AiModels);

        match receiver.try_recv().unwrap() {
            TriggerEvent::RunCompleted { result, manual, .. } => {
                assert!(manual);
                assert_eq!(result.category, BlogCategory::AiModels);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_now_emits_failed_event_on_outage() {
        let store = Arc::new(MemoryPostStore::new());
        let creator = Arc::new(TemplateContentCreator::new(store.clone()));
        let scheduler = Arc::new(RotationScheduler::new(store.clone(), creator));
        let trigger = JobTrigger::with_defaults(scheduler).unwrap();
        let mut receiver = trigger.subscribe();

        store.set_available(false);
        assert!(trigger.run_now().await.is_err());

        match receiver.try_recv().unwrap() {
            TriggerEvent::RunFailed { manual, .. } => assert!(manual),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_trigger_status() {
        let trigger = JobTrigger::with_defaults(test_scheduler()).unwrap();
        let status = trigger.status().await;

        assert!(!status.is_running);
        assert_eq!(status.config.post_time, "09:00");
        assert!(status.seconds_until_next_run.is_some());
        assert!(status.display().contains("09:00"));
    }

    #[tokio::test]
    async fn test_stop_terminates_loop() {
        let trigger = Arc::new(JobTrigger::with_defaults(test_scheduler()).unwrap());

        let loop_handle = {
            let trigger = trigger.clone();
            tokio::spawn(async move { trigger.start().await })
        };

        // Let the loop observe the running flag, then stop it
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(trigger.is_running().await);

        trigger.stop().await;
        let result = tokio::time::timeout(std::time::Duration::from_secs(2), loop_handle)
            .await
            .expect("trigger loop did not stop")
            .unwrap();
        assert!(result.is_ok());
    }
}
