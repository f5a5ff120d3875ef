use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ShopApi, ShopResponse};

/// A scripted shop API for tests. Returns pre-defined answers in order and
/// records every `(domain, token)` it was called with.
pub struct MockShopApi {
    answers: Vec<std::result::Result<ShopResponse, String>>,
    index: AtomicUsize,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockShopApi {
    pub fn new(answers: Vec<std::result::Result<ShopResponse, String>>) -> Self {
        Self {
            answers,
            index: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with one response.
    pub fn respond(status: u16, body: impl Into<String>) -> Self {
        Self::new(vec![Ok(ShopResponse::new(status, body))])
    }

    /// Fail as if the connection could not be made.
    pub fn unreachable(message: &str) -> Self {
        Self::new(vec![Err(message.to_string())])
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShopApi for MockShopApi {
    async fn fetch_shop(&self, domain: &str, access_token: &str) -> Result<ShopResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((domain.to_string(), access_token.to_string()));

        let i = self.index.fetch_add(1, Ordering::SeqCst);
        let answer = self
            .answers
            .get(i)
            .or_else(|| self.answers.last())
            .ok_or_else(|| anyhow::anyhow!("MockShopApi: no answers scripted"))?;
        answer.clone().map_err(|message| anyhow::anyhow!(message))
    }
}
