use std::time::Duration;

use reqwest::{Client, StatusCode};
use thermd_common::{ScheduleError, ScheduleUpdate, StatusReport};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote authority answered {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// The service that owns the schedule and receives status reports.
#[allow(async_fn_in_trait)]
pub trait RemoteAuthority {
    async fn pull(&mut self) -> Result<ScheduleUpdate, SyncError>;
    async fn push(&mut self, report: &StatusReport) -> Result<(), SyncError>;
}

/// `GET` pulls the schedule, `POST` pushes the status, both against one endpoint.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    endpoint: String,
    setpoints: usize,
    client: Client,
}

impl HttpRemote {
    pub fn new(
        endpoint: impl Into<String>,
        setpoints: usize,
        timeout: Duration,
    ) -> Result<Self, SyncError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            setpoints,
            client,
        })
    }
}

impl RemoteAuthority for HttpRemote {
    async fn pull(&mut self) -> Result<ScheduleUpdate, SyncError> {
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status));
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "schedule pulled");
        Ok(ScheduleUpdate::from_slice(&body, self.setpoints)?)
    }

    async fn push(&mut self, report: &StatusReport) -> Result<(), SyncError> {
        let response = self.client.post(&self.endpoint).json(report).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode as AxumStatus, routing::get, Json, Router};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use thermd_common::HeaterStatus;
    use tokio::net::TcpListener;

    use super::*;

    #[derive(Clone, Default)]
    struct FakeAuthority {
        schedule: Arc<Mutex<Value>>,
        reports: Arc<Mutex<Vec<Value>>>,
        status: Arc<Mutex<Option<u16>>>,
    }

    async fn handle_get(State(state): State<FakeAuthority>) -> (AxumStatus, Json<Value>) {
        let code = state.status.lock().unwrap().unwrap_or(200);
        let body = state.schedule.lock().unwrap().clone();
        (AxumStatus::from_u16(code).unwrap(), Json(body))
    }

    async fn handle_post(
        State(state): State<FakeAuthority>,
        Json(report): Json<Value>,
    ) -> AxumStatus {
        state.reports.lock().unwrap().push(report);
        let code = state.status.lock().unwrap().unwrap_or(200);
        AxumStatus::from_u16(code).unwrap()
    }

    async fn serve(state: FakeAuthority) -> String {
        let app = Router::new()
            .route("/", get(handle_get).post(handle_post))
            .with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    fn remote(url: String, setpoints: usize) -> HttpRemote {
        HttpRemote::new(url, setpoints, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn pulls_schedule_fields() {
        let state = FakeAuthority::default();
        *state.schedule.lock().unwrap() = json!({
            "time1": "06:00:00", "temp1": "65",
            "time2": "12:00:00", "temp2": "70",
            "time3": "18:00:00", "temp3": "60",
        });
        let mut remote = remote(serve(state).await, 3);

        let update = remote.pull().await.unwrap();

        assert_eq!(update.pairs[1], ("12:00:00".to_string(), "70".to_string()));
        assert_eq!(update.pairs.len(), 3);
    }

    #[tokio::test]
    async fn partial_schedule_is_protocol_error() {
        let state = FakeAuthority::default();
        *state.schedule.lock().unwrap() = json!({"time1": "06:00:00", "temp1": "65"});
        let mut remote = remote(serve(state).await, 3);

        assert!(matches!(
            remote.pull().await,
            Err(SyncError::Schedule(ScheduleError::Protocol(_)))
        ));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let state = FakeAuthority::default();
        *state.status.lock().unwrap() = Some(503);
        let mut remote = remote(serve(state).await, 3);

        assert!(matches!(
            remote.pull().await,
            Err(SyncError::Status(StatusCode::SERVICE_UNAVAILABLE))
        ));
    }

    #[tokio::test]
    async fn unreachable_authority_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let mut remote = remote(format!("http://{addr}/"), 3);

        assert!(matches!(remote.pull().await, Err(SyncError::Transport(_))));
    }

    #[tokio::test]
    async fn pushes_status_report() {
        let state = FakeAuthority::default();
        let mut remote = remote(serve(state.clone()).await, 3);

        remote
            .push(&StatusReport::new(68.0, HeaterStatus::On))
            .await
            .unwrap();

        assert_eq!(
            *state.reports.lock().unwrap(),
            vec![json!({"current_temp": "68.00", "status": "ON"})]
        );
    }
}
