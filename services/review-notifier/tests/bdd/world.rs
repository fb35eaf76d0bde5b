//! BDD test world for the review notifier

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use cucumber::World;
use review_notifier::io::{HttpClient, HttpResponse};
use review_notifier::notifier::Notifier;
use review_notifier::poller::{CycleOutcome, Poller};
use review_notifier::{Credentials, NotifierError};
use serde_json::Value;

#[derive(Debug, Default, World)]
pub struct NotifierWorld {
    // Credential check
    pub env: HashMap<String, String>,
    pub credentials_result: Option<review_notifier::Result<Credentials>>,

    // Response and record parsing
    pub response: Option<Value>,
    pub check_result: Option<Result<Option<i64>, String>>,
    pub record: Option<Value>,
    pub parse_result: Option<review_notifier::Result<String>>,

    // Poll loop
    pub start_cursor: Option<i64>,
    pub http: Arc<ScriptedHttp>,
    pub notifier: Arc<RecordingNotifier>,
    pub poller: Option<Poller>,
    pub outcomes: Vec<CycleOutcome>,
}

/// HTTP client answering GETs from a queue filled by the steps
#[derive(Debug, Default)]
pub struct ScriptedHttp {
    pub responses: Mutex<VecDeque<review_notifier::Result<HttpResponse>>>,
    pub requests: Mutex<Vec<Vec<(String, String)>>>,
}

impl ScriptedHttp {
    pub fn push(&self, response: review_notifier::Result<HttpResponse>) {
        self.responses.lock().unwrap().push_back(response);
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedHttp {
    async fn get(
        &self,
        _url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> review_notifier::Result<HttpResponse> {
        let request = headers
            .iter()
            .chain(query.iter())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(NotifierError::Http("no scripted response".to_string())))
    }

    async fn post_form(
        &self,
        _url: &str,
        _params: &[(&str, &str)],
    ) -> review_notifier::Result<HttpResponse> {
        Err(NotifierError::Http("unexpected POST".to_string()))
    }
}

/// Notifier recording every attempted message
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub attempts: Mutex<Vec<String>>,
    pub failing: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    fn type_name(&self) -> &str {
        "recording"
    }

    async fn send_message(&self, text: &str) -> review_notifier::Result<()> {
        self.attempts.lock().unwrap().push(text.to_string());
        if *self.failing.lock().unwrap() {
            Err(NotifierError::Telegram("status 403: Forbidden".to_string()))
        } else {
            Ok(())
        }
    }
}
