use std::convert::TryFrom;
use std::fmt;

use marketing_dashboard::loader::{load_marketing_data, LoadError};
use marketing_dashboard::preprocess::ProcessedData;
use marketing_dashboard::store::{Action, Records};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::app::App;

// Phases of a dataset load driven from the render loop
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoadPhase {
    Idle,
    Fetching,
    Processing,
    Ready,
    Failed,
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Fetching => write!(f, "Fetching"),
            Self::Processing => write!(f, "Processing"),
            Self::Ready => write!(f, "Ready"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum LoadEvent {
    Start,
    Fetched(Records),
    Processed(ProcessedData),
    Failed(String),
    Reset,
}

impl fmt::Display for LoadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Fetched(records) => write!(f, "Fetched({} records)", records.len()),
            Self::Processed(processed) => {
                write!(f, "Processed({} records)", processed.data.len())
            }
            Self::Failed(msg) => write!(f, "Failed({msg})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
pub struct StateTransitionError {
    from: LoadPhase,
    event: LoadEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

type FetchHandle = JoinHandle<Result<Records, LoadError>>;

/// Drives one load at a time: the file read runs on a tokio task, the
/// preprocessing on the app's worker. Nothing here blocks the render loop.
pub struct LoadMachine {
    state: LoadPhase,
    fetch: Option<FetchHandle>,
}

impl LoadMachine {
    pub const fn new() -> Self {
        Self {
            state: LoadPhase::Idle,
            fetch: None,
        }
    }

    pub const fn state(&self) -> LoadPhase {
        self.state
    }

    pub fn process_event(
        &mut self,
        event: &LoadEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        if next_state.0 != self.state {
            info!(from = %self.state, to = %next_state.0, "load phase changed");
        }
        self.state = next_state.0;
        Ok(())
    }

    /// Advances the load by at most one step.
    pub async fn poll(&mut self, app: &mut App) {
        match self.state {
            LoadPhase::Idle => {
                if app.reload_requested {
                    app.reload_requested = false;
                    self.start(app);
                }
            }
            LoadPhase::Fetching => {
                if !self.fetch.as_ref().is_some_and(JoinHandle::is_finished) {
                    return;
                }
                let Some(handle) = self.fetch.take() else {
                    return;
                };
                let event = match handle.await {
                    Ok(Ok(records)) => LoadEvent::Fetched(records),
                    Ok(Err(err)) => LoadEvent::Failed(err.to_string()),
                    Err(err) => LoadEvent::Failed(format!("data load task failed: {err}")),
                };
                self.fire(&event, app);
            }
            LoadPhase::Processing => {
                let event = match app.worker.try_recv() {
                    Some(Ok(processed)) => LoadEvent::Processed(processed),
                    Some(Err(err)) => LoadEvent::Failed(err.to_string()),
                    None => return,
                };
                self.fire(&event, app);
            }
            LoadPhase::Ready | LoadPhase::Failed => {
                if app.reload_requested {
                    self.fire(&LoadEvent::Reset, app);
                }
            }
        }
    }

    fn start(&mut self, app: &mut App) {
        if self.process_event(&LoadEvent::Start, app).is_err() {
            return;
        }
        let path = app.config.data_path.clone();
        self.fetch = Some(tokio::spawn(async move {
            load_marketing_data(&path).await
        }));
    }

    fn fire(&mut self, event: &LoadEvent, app: &mut App) {
        if let Err(err) = self.process_event(event, app) {
            warn!(error = %err, "ignored load event");
        }
    }
}

impl Default for LoadMachine {
    fn default() -> Self {
        Self::new()
    }
}

struct NextState(LoadPhase);

impl NextState {
    const fn new(state: LoadPhase) -> Self {
        Self(state)
    }
}

impl LoadPhase {
    const fn next_state(self) -> NextState {
        NextState::new(self)
    }
}

impl TryFrom<(LoadPhase, &LoadEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(
        value: (LoadPhase, &LoadEvent, &mut App),
    ) -> std::result::Result<Self, Self::Error> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (LoadPhase::Idle, LoadEvent::Start) => {
                app.dispatch(Action::SetError(None));
                app.dispatch(Action::SetLoading(true));
                app.status_message = format!("Loading {}", app.config.data_path.display());
                Ok(LoadPhase::Fetching.next_state())
            }
            (LoadPhase::Fetching, LoadEvent::Fetched(records)) => {
                match app.worker.submit(records.clone()) {
                    Ok(()) => {
                        app.status_message = format!("Preprocessing {} records", records.len());
                        Ok(LoadPhase::Processing.next_state())
                    }
                    Err(err) => {
                        let message = err.to_string();
                        app.status_message = format!("Error: {message}");
                        app.dispatch(Action::SetError(Some(message)));
                        Ok(LoadPhase::Failed.next_state())
                    }
                }
            }
            (LoadPhase::Processing, LoadEvent::Processed(processed)) => {
                info!(
                    records = processed.metadata.total_records,
                    channels = processed.metadata.unique_channels.len(),
                    regions = processed.metadata.unique_regions.len(),
                    "dataset ready"
                );
                app.dispatch(Action::SetData(processed.data.clone()));
                app.metadata = Some(processed.metadata.clone());
                app.status_message = format!("Loaded {} records", processed.data.len());
                Ok(LoadPhase::Ready.next_state())
            }
            (LoadPhase::Fetching | LoadPhase::Processing, LoadEvent::Failed(error)) => {
                warn!(%error, "dataset load failed");
                app.status_message = format!("Error: {error}");
                app.dispatch(Action::SetError(Some(error.clone())));
                Ok(LoadPhase::Failed.next_state())
            }
            (LoadPhase::Ready | LoadPhase::Failed, LoadEvent::Reset) => {
                Ok(LoadPhase::Idle.next_state())
            }
            _ => Err(StateTransitionError {
                from: current_state,
                event: event.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketing_dashboard::config::AppConfig;
    use marketing_dashboard::preprocess::PreprocessWorker;
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::Duration;

    fn app_for(path: PathBuf) -> App {
        let config = AppConfig {
            data_path: path,
            ..AppConfig::default()
        };
        App::with_worker(config, PreprocessWorker::spawn().unwrap())
    }

    async fn drive(machine: &mut LoadMachine, app: &mut App, until: LoadPhase) {
        for _ in 0..2000 {
            machine.poll(app).await;
            if machine.state() == until {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("load never reached {until}, stuck in {}", machine.state());
    }

    #[tokio::test]
    async fn load_runs_to_ready_and_publishes_data() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"[{"id": 1, "channel": "Search", "region": "US", "spend": 10.0, "impressions": 100, "clicks": 5, "conversions": 1}]"#,
        )
        .unwrap();
        let mut app = app_for(file.path().to_path_buf());
        let mut machine = LoadMachine::new();

        machine.poll(&mut app).await;
        assert_eq!(machine.state(), LoadPhase::Fetching);
        assert!(app.state().is_loading);
        assert!(!app.reload_requested);

        drive(&mut machine, &mut app, LoadPhase::Ready).await;
        assert!(!app.state().is_loading);
        assert_eq!(app.state().raw_data.len(), 1);
        assert_eq!(app.metadata.as_ref().map(|m| m.total_records), Some(1));
        assert_eq!(app.status_message, "Loaded 1 records");
    }

    #[tokio::test]
    async fn missing_file_fails_and_retry_restarts() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_for(dir.path().join("absent.json"));
        let mut machine = LoadMachine::new();

        drive(&mut machine, &mut app, LoadPhase::Failed).await;
        assert!(app
            .state()
            .error
            .as_deref()
            .is_some_and(|message| message.starts_with("failed to read")));

        app.request_reload();
        machine.poll(&mut app).await;
        assert_eq!(machine.state(), LoadPhase::Idle);
        machine.poll(&mut app).await;
        assert_eq!(machine.state(), LoadPhase::Fetching);
        assert_eq!(app.state().error, None);
    }

    #[tokio::test]
    async fn out_of_order_events_are_rejected() {
        let mut app = app_for(PathBuf::from("unused.json"));
        let mut machine = LoadMachine::new();

        let err = machine
            .process_event(&LoadEvent::Reset, &mut app)
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid transition from Idle with event Reset");
        assert_eq!(machine.state(), LoadPhase::Idle);

        let stray = LoadEvent::Failed("late".to_string());
        assert!(machine.process_event(&stray, &mut app).is_err());
        assert_eq!(app.state().error, None);
    }

    #[tokio::test]
    async fn terminated_worker_fails_the_load() {
        let mut app = app_for(PathBuf::from("unused.json"));
        app.worker.terminate();
        let mut machine = LoadMachine::new();

        machine.process_event(&LoadEvent::Start, &mut app).unwrap();
        machine
            .process_event(&LoadEvent::Fetched(Records::from(Vec::new())), &mut app)
            .unwrap();

        assert_eq!(machine.state(), LoadPhase::Failed);
        assert_eq!(
            app.state().error.as_deref(),
            Some("preprocess worker has been terminated")
        );
    }
}
