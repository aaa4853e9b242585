use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::model::{EnhanceConfig, Schedule};

/// Error type for prompt enhancement
#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    #[error("nothing to enhance: the prompt is empty")]
    EmptyPrompt,
    /// The service answered with a non-2xx status
    #[error("{message}")]
    Service { status: u16, message: String },
    #[error("could not reach the enhancement service: {0}")]
    Network(String),
    #[error("unexpected response from the enhancement service: {0}")]
    Decode(String),
}

/// A prompt scheduled before the one being enhanced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviousPrompt {
    pub frame: u32,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_prompt: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub previous_prompts: Vec<PreviousPrompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
}

impl EnhanceRequest {
    pub fn new(prompt: &str) -> Self {
        EnhanceRequest {
            prompt: prompt.trim().to_string(),
            previous_prompt: None,
            previous_prompts: Vec::new(),
            openai_api_key: None,
        }
    }

    /// Request for a prompt at `frame`, carrying every earlier scheduled
    /// prompt as context for continuity.
    pub fn for_frame(prompt: &str, schedule: &Schedule, frame: u32) -> Self {
        let previous_prompts: Vec<PreviousPrompt> = schedule
            .entries_before(frame)
            .into_iter()
            .map(|p| PreviousPrompt {
                frame: p.frame,
                prompt: p.text,
            })
            .collect();
        EnhanceRequest {
            previous_prompt: previous_prompts.last().map(|p| p.prompt.clone()),
            previous_prompts,
            ..EnhanceRequest::new(prompt)
        }
    }
}

#[derive(Debug, Deserialize)]
struct EnhanceResponse {
    #[serde(rename = "enhancedPrompt")]
    enhanced_prompt: Option<String>,
    error: Option<String>,
}

/// Blocking client for the enhancement endpoint
pub struct EnhanceClient {
    url: String,
    api_key: Option<String>,
    agent: ureq::Agent,
}

impl EnhanceClient {
    pub fn new(config: &EnhanceConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build();
        let api_key = Some(config.api_key.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string);
        EnhanceClient {
            url: config.url.clone(),
            api_key,
            agent,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and wait for the enhanced text.
    pub fn enhance(&self, mut request: EnhanceRequest) -> Result<String, EnhanceError> {
        if request.prompt.trim().is_empty() {
            return Err(EnhanceError::EmptyPrompt);
        }
        if request.openai_api_key.is_none() {
            request.openai_api_key = self.api_key.clone();
        }
        let body =
            serde_json::to_value(&request).map_err(|e| EnhanceError::Decode(e.to_string()))?;

        let response = match self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_json(body)
        {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, resp)) => {
                let message = resp
                    .into_json::<EnhanceResponse>()
                    .ok()
                    .and_then(|r| r.error)
                    .unwrap_or_else(|| "Failed to enhance prompt".to_string());
                return Err(EnhanceError::Service { status, message });
            }
            Err(ureq::Error::Transport(t)) => return Err(EnhanceError::Network(t.to_string())),
        };

        let parsed: EnhanceResponse = response
            .into_json()
            .map_err(|e| EnhanceError::Decode(e.to_string()))?;
        parse_success(parsed)
    }
}

fn parse_success(parsed: EnhanceResponse) -> Result<String, EnhanceError> {
    match parsed.enhanced_prompt.map(|s| s.trim().to_string()) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(EnhanceError::Decode(
            parsed
                .error
                .unwrap_or_else(|| "missing enhancedPrompt".to_string()),
        )),
    }
}

/// Result of a background enhancement, tagged with the ticket it was
/// requested under so stale answers can be dropped.
#[derive(Debug)]
pub struct EnhanceOutcome {
    pub ticket: u64,
    pub result: Result<String, EnhanceError>,
}

/// Runs enhancement requests off the UI thread. One thread per request;
/// results come back through [`EnhanceWorker::poll`].
pub struct EnhanceWorker {
    client: Arc<EnhanceClient>,
    tx: mpsc::Sender<EnhanceOutcome>,
    rx: mpsc::Receiver<EnhanceOutcome>,
    next_ticket: u64,
}

impl EnhanceWorker {
    pub fn new(client: EnhanceClient) -> Self {
        let (tx, rx) = mpsc::channel();
        EnhanceWorker {
            client: Arc::new(client),
            tx,
            rx,
            next_ticket: 1,
        }
    }

    /// Fire off a request; returns its ticket.
    pub fn request(&mut self, request: EnhanceRequest) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        info!("enhancing prompt (ticket {})", ticket);
        thread::spawn(move || {
            let result = client.enhance(request);
            if let Err(e) = &result {
                error!("prompt enhancement failed: {}", e);
            }
            let _ = tx.send(EnhanceOutcome { ticket, result });
        });
        ticket
    }

    /// Non-blocking poll for finished requests
    pub fn poll(&self) -> Vec<EnhanceOutcome> {
        let mut out = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            out.push(outcome);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_earlier_prompts_only() {
        let schedule: Schedule = [(0, "temple"), (60, "dragon"), (120, "knights")]
            .into_iter()
            .collect();
        let req = EnhanceRequest::for_frame("  fire  ", &schedule, 120);
        assert_eq!(req.prompt, "fire");
        assert_eq!(req.previous_prompt.as_deref(), Some("dragon"));
        let frames: Vec<u32> = req.previous_prompts.iter().map(|p| p.frame).collect();
        assert_eq!(frames, vec![0, 60]);
    }

    #[test]
    fn request_json_shape() {
        let schedule: Schedule = [(0, "temple")].into_iter().collect();
        let req = EnhanceRequest::for_frame("dragon", &schedule, 30);
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "prompt": "dragon",
                "previousPrompt": "temple",
                "previousPrompts": [{"frame": 0, "prompt": "temple"}]
            })
        );
    }

    #[test]
    fn first_prompt_has_no_context_fields() {
        let req = EnhanceRequest::for_frame("temple", &Schedule::new(), 0);
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v, serde_json::json!({"prompt": "temple"}));
    }

    #[test]
    fn empty_prompt_is_not_sent() {
        let client = EnhanceClient::new(&EnhanceConfig {
            url: "http://127.0.0.1:1/never".into(),
            ..Default::default()
        });
        assert!(matches!(
            client.enhance(EnhanceRequest::new("   ")),
            Err(EnhanceError::EmptyPrompt)
        ));
    }

    #[test]
    fn success_needs_text() {
        let ok: EnhanceResponse =
            serde_json::from_str(r#"{"enhancedPrompt":" misty temple at dawn "}"#).unwrap();
        assert_eq!(parse_success(ok).unwrap(), "misty temple at dawn");

        let blank: EnhanceResponse = serde_json::from_str(r#"{"enhancedPrompt":""}"#).unwrap();
        assert!(matches!(parse_success(blank), Err(EnhanceError::Decode(_))));
    }
}
