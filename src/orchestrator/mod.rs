//! Runs the reducer, performs its effects, and publishes every state.

use serde_json::json;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::clipboard::DynClipboard;
use crate::errors::ClipboardError;
use crate::log::Transcript;
use crate::service::DynService;
use crate::state::{reduce, AppState, Effect, Msg, Transition};

pub struct Orchestrator {
    state: AppState,
    service: DynService,
    clipboard: DynClipboard,
    transcript: Option<Transcript>,
    tx: watch::Sender<AppState>,
}

impl Orchestrator {
    pub fn new(service: DynService, clipboard: DynClipboard) -> Self {
        let (tx, _rx) = watch::channel(AppState::default());
        Self { state: AppState::default(), service, clipboard, transcript: None, tx }
    }

    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = Some(transcript);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Receiver that observes every state the orchestrator emits.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.tx.subscribe()
    }

    /// Apply a user action and every effect it triggers, in order, until the
    /// state settles.
    pub async fn dispatch(&mut self, msg: Msg) -> &AppState {
        let mut next = Some(msg);
        while let Some(msg) = next.take() {
            debug!(msg = msg.label(), pending = ?self.state.pending(), "dispatch");
            let Transition { state, effect } = reduce(&self.state, msg);
            self.state = state;
            if let Some(err) = &self.state.error {
                debug!(error = %err, "state carries error");
            }
            self.tx.send_replace(self.state.clone());

            if let Some(effect) = effect {
                next = Some(self.perform(effect).await);
            }
        }
        &self.state
    }

    async fn perform(&mut self, effect: Effect) -> Msg {
        debug!(id = ?effect.id(), ?effect, "perform");
        match effect {
            Effect::FetchCategories { id } => {
                let result = self.service.categories().await;
                match &result {
                    Ok(cats) => info!(count = cats.len(), "categories loaded"),
                    Err(e) => warn!(error = %e, "categories fetch failed"),
                }
                Msg::CategoriesFetched { id, result }
            }
            Effect::FetchPrompts { id, category } => {
                let result = self.service.prompts(&category).await;
                match &result {
                    Ok(prompts) => info!(%category, count = prompts.len(), "prompts loaded"),
                    Err(e) => warn!(%category, error = %e, "prompts fetch failed"),
                }
                Msg::PromptsFetched { id, result }
            }
            Effect::Generate { id, request } => {
                let result = self.service.generate(&request).await;
                let outcome = match &result {
                    Ok(text) => json!({ "response": text }),
                    Err(e) => json!({ "error": e.to_string() }),
                };
                self.archive("generate", &request, outcome);
                Msg::Generated { id, result }
            }
            Effect::CopyToClipboard { id, text } => {
                // Copy tools block on process IO; keep them off the runtime.
                let clipboard = Arc::clone(&self.clipboard);
                let result = tokio::task::spawn_blocking(move || clipboard.copy(&text))
                    .await
                    .map_err(ClipboardError::from)
                    .and_then(|r| r);
                if let Err(e) = &result {
                    warn!(error = %e, "clipboard copy failed");
                }
                Msg::Copied { id, result }
            }
            Effect::SendEmail { id, request } => {
                let result = self.service.send_email(&request).await;
                let outcome = match &result {
                    Ok(()) => json!({ "sent": true }),
                    Err(e) => json!({ "error": e.to_string() }),
                };
                self.archive("email", &request, outcome);
                Msg::EmailSent { id, result }
            }
        }
    }

    fn archive<T: serde::Serialize>(&mut self, stage: &str, request: &T, outcome: serde_json::Value) {
        if let Some(t) = self.transcript.as_mut() {
            match t.save(stage, request, outcome) {
                Ok(path) => debug!(path = %path.display(), "transcript saved"),
                Err(e) => warn!(error = %e, "could not save transcript"),
            }
        }
    }
}
