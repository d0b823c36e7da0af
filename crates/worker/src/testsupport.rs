//! Scripted network for proxy tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use shltr_core::{Error, Request, Response};

use crate::fetch::Network;

/// Fake transport keyed by URL. Each scripted outcome is consumed once, in
/// order; an unscripted URL behaves like a dead network.
#[derive(Default)]
pub struct FakeNetwork {
    scripted: Mutex<HashMap<String, VecDeque<Result<Response, Error>>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful transport outcome for the URL.
    pub fn respond(&self, url: &str, response: Response) {
        self.scripted
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(Ok(response));
    }

    /// Queue a transport-level failure for the URL.
    pub fn fail(&self, url: &str) {
        self.scripted
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(Err(Error::NetworkUnreachable("scripted transport failure".to_string())));
    }

    /// URLs fetched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        self.calls.lock().unwrap().push(request.url.to_string());
        let mut scripted = self.scripted.lock().unwrap();
        match scripted.get_mut(request.url.as_str()).and_then(|queue| queue.pop_front()) {
            Some(outcome) => outcome,
            None => Err(Error::NetworkUnreachable(format!(
                "no scripted response for {}",
                request.url
            ))),
        }
    }
}
