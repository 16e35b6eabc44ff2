//! HTTP transport for the completion service.
//!
//! Speaks the service's JSON endpoints directly. Authentication is the
//! `Basic {apiKey}-{sessionId}` header derived from request metadata.
//! Fetches block, which is fine: the engine only ever calls a provider from
//! its worker thread. Acceptance reports run on their own short-lived
//! thread so the caller never waits on them.

use std::thread;

use tracing::debug;

use crate::protocol::{AcceptCompletionRequest, GetCompletionsRequest, GetCompletionsResponse};
use crate::worker::{CompletionProvider, FetchError};

const GET_COMPLETIONS_PATH: &str = "/exa.language_server_pb.LanguageServerService/GetCompletions";
const ACCEPT_COMPLETION_PATH: &str =
    "/exa.language_server_pb.LanguageServerService/AcceptCompletion";

pub struct HttpCompletionProvider {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpCompletionProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            agent: ureq::Agent::new_with_defaults(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn authorization(api_key: &str, session_id: &str) -> String {
        format!("Basic {api_key}-{session_id}")
    }
}

impl CompletionProvider for HttpCompletionProvider {
    fn completions(
        &self,
        request: &GetCompletionsRequest,
    ) -> Result<GetCompletionsResponse, FetchError> {
        let url = format!("{}{}", self.base_url, GET_COMPLETIONS_PATH);
        let authorization =
            Self::authorization(&request.metadata.api_key, &request.metadata.session_id);
        let response = self
            .agent
            .post(&url)
            .header("Authorization", &authorization)
            .send_json(request)
            .map_err(|e| FetchError::Transport(format!("{url}: {e}")))?;
        response
            .into_body()
            .read_json::<GetCompletionsResponse>()
            .map_err(|e| FetchError::Transport(format!("{url}: {e}")))
    }

    fn completion_accepted(&self, request: &AcceptCompletionRequest) {
        let url = format!("{}{}", self.base_url, ACCEPT_COMPLETION_PATH);
        let authorization =
            Self::authorization(&request.metadata.api_key, &request.metadata.session_id);
        let agent = self.agent.clone();
        let request = request.clone();
        thread::spawn(move || {
            let result = agent
                .post(&url)
                .header("Authorization", &authorization)
                .send_json(&request);
            if let Err(e) = result {
                debug!(url, error = %e, "accept report failed");
            }
        });
    }
}
