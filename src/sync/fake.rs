//! In-memory [`StatusRepository`] for driving the synchronizer in tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::oneshot;

use crate::client::StatusRepository;
use crate::error::{ActionError, FetchError};
use crate::model::{ServiceAction, ServiceStatusRecord};

type Snapshot = Result<Vec<ServiceStatusRecord>, FetchError>;

enum Reply {
    Ready(Snapshot),
    Held(oneshot::Receiver<Snapshot>),
}

#[derive(Default)]
pub(crate) struct FakeRepository {
    snapshots: Mutex<VecDeque<Reply>>,
    action_results: Mutex<VecDeque<Result<Value, ActionError>>>,
    calls: Mutex<Vec<String>>,
    fetches: Mutex<usize>,
}

impl FakeRepository {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_snapshot(&self, snapshot: Snapshot) {
        self.snapshots.lock().unwrap().push_back(Reply::Ready(snapshot));
    }

    /// Queue a fetch that only completes when the returned sender fires.
    pub(crate) fn push_held_snapshot(&self) -> oneshot::Sender<Snapshot> {
        let (tx, rx) = oneshot::channel();
        self.snapshots.lock().unwrap().push_back(Reply::Held(rx));
        tx
    }

    pub(crate) fn push_action_result(&self, result: Result<Value, ActionError>) {
        self.action_results.lock().unwrap().push_back(result);
    }

    pub(crate) fn fetch_count(&self) -> usize {
        *self.fetches.lock().unwrap()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Spin until `n` fetches have started, so tests can order overlapping fetches.
    pub(crate) fn wait_for_fetches(&self, n: usize, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        while self.fetch_count() < n && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn record_call(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl StatusRepository for FakeRepository {
    async fn fetch_snapshot(&self) -> Result<Vec<ServiceStatusRecord>, FetchError> {
        let reply = self.snapshots.lock().unwrap().pop_front();
        *self.fetches.lock().unwrap() += 1;
        self.record_call("fetch".to_string());
        match reply {
            Some(Reply::Ready(snapshot)) => snapshot,
            Some(Reply::Held(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Transport("held reply dropped".into()))),
            None => Err(FetchError::Transport("no canned snapshot".into())),
        }
    }

    async fn invoke_action(
        &self,
        hostname: &str,
        service: &str,
        action: ServiceAction,
    ) -> Result<Value, ActionError> {
        self.record_call(format!("{} {}/{}", action, hostname, service));
        let result = self.action_results.lock().unwrap().pop_front();
        result.unwrap_or(Ok(Value::Null))
    }

    async fn unfollow_service(&self, hostname: &str, service: &str) -> Result<(), ActionError> {
        self.record_call(format!("unfollow {}/{}", hostname, service));
        Ok(())
    }

    async fn service_status(&self, hostname: &str, service: &str) -> Result<Vec<String>, ActionError> {
        self.record_call(format!("status {}/{}", hostname, service));
        Ok(vec![
            format!("● {} - test unit", service),
            "   Active: active (running)".to_string(),
        ])
    }

    async fn service_properties(
        &self,
        hostname: &str,
        service: &str,
    ) -> Result<BTreeMap<String, String>, ActionError> {
        self.record_call(format!("show {}/{}", hostname, service));
        let mut props = BTreeMap::new();
        props.insert("MainPID".to_string(), "812".to_string());
        props.insert("ActiveState".to_string(), "active".to_string());
        props.insert("Id".to_string(), service.to_string());
        Ok(props)
    }
}

pub(crate) fn record(hostname: &str, name: &str, active_status: &str) -> ServiceStatusRecord {
    ServiceStatusRecord {
        hostname: hostname.into(),
        name: name.into(),
        description: Some(format!("{} service", name)),
        enabled: Some(true),
        active_status: Some(active_status.into()),
        last_check: None,
    }
}

pub(crate) fn runtime() -> Arc<tokio::runtime::Runtime> {
    Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap(),
    )
}
