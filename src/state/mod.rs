//! Application state and the reducer that drives it.
//!
//! `reduce` is pure: it takes the current state and one message and returns
//! the next state plus at most one effect for the orchestrator to perform.
//! Effect outcomes come back in as messages carrying the `RequestId` they
//! were issued with; anything not matching the pending request is dropped.

use tracing::debug;

use crate::errors::{ClipboardError, ServiceError};
use crate::template::{fill_template, Assignment};
use crate::wire::{EmailRequest, GenerateRequest, Prompt};

const BUSY: &str = "Please wait for the current request to finish";
const NO_RESPONSE: &str = "No response available yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Idle,
    CategoriesLoaded,
    PromptsLoaded,
    VariablesPending,
    ReadyToGenerate,
    ResponseReady,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub stage: Stage,
    pub categories: Vec<String>,
    pub selected_category: Option<String>,
    pub prompts: Vec<Prompt>,
    pub selected_prompt: Option<Prompt>,
    pub variables: Assignment,
    pub response: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pending: Option<RequestId>,
    issued: u64,
}

impl AppState {
    /// Whether a generate action would be accepted right now.
    pub fn can_generate(&self) -> bool {
        !self.loading && self.selected_prompt.is_some() && self.variables.all_filled()
    }

    pub fn has_response(&self) -> bool {
        self.stage == Stage::ResponseReady && self.response.is_some()
    }

    pub fn response_lines(&self) -> Vec<&str> {
        self.response.as_deref().map(|r| r.split('\n').collect()).unwrap_or_default()
    }

    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    fn begin_request(&mut self) -> RequestId {
        self.issued += 1;
        let id = RequestId(self.issued);
        self.pending = Some(id);
        self.loading = true;
        id
    }

    /// Clears the loading flag if `id` is the outstanding request.
    fn settle(&mut self, id: RequestId) -> bool {
        if self.pending != Some(id) {
            debug!(?id, pending = ?self.pending, "dropping stale result");
            return false;
        }
        self.pending = None;
        self.loading = false;
        true
    }

    fn clear_prompt(&mut self) {
        self.selected_prompt = None;
        self.variables = Assignment::default();
        self.response = None;
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

#[derive(Debug)]
pub enum Msg {
    Start,
    SelectCategory(String),
    SelectPrompt(String),
    EditVariable { name: String, value: String },
    Generate,
    Copy,
    Email { address: String },
    DismissError,
    CategoriesFetched { id: RequestId, result: Result<Vec<String>, ServiceError> },
    PromptsFetched { id: RequestId, result: Result<Vec<Prompt>, ServiceError> },
    Generated { id: RequestId, result: Result<String, ServiceError> },
    Copied { id: RequestId, result: Result<(), ClipboardError> },
    EmailSent { id: RequestId, result: Result<(), ServiceError> },
}

impl Msg {
    pub fn label(&self) -> &'static str {
        match self {
            Msg::Start => "start",
            Msg::SelectCategory(_) => "select_category",
            Msg::SelectPrompt(_) => "select_prompt",
            Msg::EditVariable { .. } => "edit_variable",
            Msg::Generate => "generate",
            Msg::Copy => "copy",
            Msg::Email { .. } => "email",
            Msg::DismissError => "dismiss_error",
            Msg::CategoriesFetched { .. } => "categories_fetched",
            Msg::PromptsFetched { .. } => "prompts_fetched",
            Msg::Generated { .. } => "generated",
            Msg::Copied { .. } => "copied",
            Msg::EmailSent { .. } => "email_sent",
        }
    }

    fn is_user_action(&self) -> bool {
        matches!(
            self,
            Msg::Start
                | Msg::SelectCategory(_)
                | Msg::SelectPrompt(_)
                | Msg::EditVariable { .. }
                | Msg::Generate
                | Msg::Copy
                | Msg::Email { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchCategories { id: RequestId },
    FetchPrompts { id: RequestId, category: String },
    Generate { id: RequestId, request: GenerateRequest },
    CopyToClipboard { id: RequestId, text: String },
    SendEmail { id: RequestId, request: EmailRequest },
}

impl Effect {
    pub fn id(&self) -> RequestId {
        match self {
            Effect::FetchCategories { id }
            | Effect::FetchPrompts { id, .. }
            | Effect::Generate { id, .. }
            | Effect::CopyToClipboard { id, .. }
            | Effect::SendEmail { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: AppState,
    pub effect: Option<Effect>,
}

pub fn reduce(state: &AppState, msg: Msg) -> Transition {
    let mut next = state.clone();

    if msg.is_user_action() {
        if next.loading {
            next.fail(BUSY);
            return Transition { state: next, effect: None };
        }
        next.error = None;
        next.notice = None;
    }

    let effect = match msg {
        Msg::Start => Some(Effect::FetchCategories { id: next.begin_request() }),

        Msg::SelectCategory(category) => select_category(&mut next, category),

        Msg::SelectPrompt(name) => {
            select_prompt(&mut next, &name);
            None
        }

        Msg::EditVariable { name, value } => {
            if !next.variables.set(&name, value) {
                next.fail(format!("Unknown variable: {name}"));
            }
            None
        }

        Msg::Generate => generate(&mut next),

        Msg::Copy => match next.response.clone() {
            Some(text) if next.stage == Stage::ResponseReady => {
                Some(Effect::CopyToClipboard { id: next.begin_request(), text })
            }
            _ => {
                next.fail(NO_RESPONSE);
                None
            }
        },

        Msg::Email { address } => email(&mut next, &address),

        Msg::DismissError => {
            next.error = None;
            next.notice = None;
            None
        }

        Msg::CategoriesFetched { id, result } => {
            if next.settle(id) {
                match result {
                    Ok(categories) => {
                        next.categories = categories;
                        if next.stage == Stage::Idle {
                            next.stage = Stage::CategoriesLoaded;
                        }
                    }
                    Err(e) => next.fail(e.fixed_message("Failed to fetch categories")),
                }
            }
            None
        }

        Msg::PromptsFetched { id, result } => {
            if next.settle(id) {
                match result {
                    Ok(prompts) => {
                        next.prompts = prompts;
                        next.clear_prompt();
                        next.stage = Stage::PromptsLoaded;
                    }
                    Err(e) => next.fail(e.fixed_message("Failed to fetch prompts")),
                }
            }
            None
        }

        Msg::Generated { id, result } => {
            if next.settle(id) {
                match result {
                    Ok(text) => {
                        next.response = Some(text);
                        next.stage = Stage::ResponseReady;
                    }
                    Err(e) => next.fail(e.user_message("Failed to generate response")),
                }
            }
            None
        }

        Msg::Copied { id, result } => {
            if next.settle(id) {
                match result {
                    Ok(()) => next.notice = Some("Copied to clipboard!".into()),
                    Err(_) => next.fail("Failed to copy to clipboard"),
                }
            }
            None
        }

        Msg::EmailSent { id, result } => {
            if next.settle(id) {
                match result {
                    Ok(()) => next.notice = Some("Email sent successfully!".into()),
                    Err(e) => next.fail(e.user_message("Failed to send email")),
                }
            }
            None
        }
    };

    Transition { state: next, effect }
}

fn select_category(next: &mut AppState, category: String) -> Option<Effect> {
    if category.trim().is_empty() {
        next.selected_category = None;
        next.prompts.clear();
        next.clear_prompt();
        next.stage = if next.categories.is_empty() { Stage::Idle } else { Stage::CategoriesLoaded };
        return None;
    }
    if !next.categories.iter().any(|c| *c == category) {
        next.fail(format!("Unknown category: {category}"));
        return None;
    }

    next.selected_category = Some(category.clone());
    next.prompts.clear();
    next.clear_prompt();
    next.stage = Stage::CategoriesLoaded;
    Some(Effect::FetchPrompts { id: next.begin_request(), category })
}

fn select_prompt(next: &mut AppState, name: &str) {
    if name.trim().is_empty() {
        next.clear_prompt();
        if next.selected_category.is_some() {
            next.stage = Stage::PromptsLoaded;
        }
        return;
    }
    let found = next.prompts.iter().find(|p| p.prompt_name == name).cloned();
    let Some(prompt) = found else {
        next.fail(format!("Unknown prompt: {name}"));
        return;
    };

    next.variables = Assignment::from_template(&prompt.prompt_template);
    next.response = None;
    next.stage = if next.variables.is_empty() { Stage::ReadyToGenerate } else { Stage::VariablesPending };
    next.selected_prompt = Some(prompt);
}

fn generate(next: &mut AppState) -> Option<Effect> {
    if next.selected_prompt.is_none() {
        next.fail("Select a prompt first");
        return None;
    }
    if !next.variables.all_filled() {
        next.fail("Please fill in all variables");
        return None;
    }

    let request = next.selected_prompt.as_ref().map(|prompt| GenerateRequest {
        prompt: fill_template(&prompt.prompt_template, &next.variables),
        prompt_name: prompt.prompt_name.clone(),
    })?;
    Some(Effect::Generate { id: next.begin_request(), request })
}

fn email(next: &mut AppState, address: &str) -> Option<Effect> {
    if !next.has_response() || next.selected_prompt.is_none() {
        next.fail(NO_RESPONSE);
        return None;
    }
    let address = address.trim();
    if address.is_empty() || !address.contains('@') {
        next.fail("Please enter a valid email address");
        return None;
    }

    let request = match (next.response.as_deref(), next.selected_prompt.as_ref()) {
        (Some(content), Some(prompt)) => EmailRequest::for_response(address, &prompt.prompt_name, content),
        _ => return None,
    };
    Some(Effect::SendEmail { id: next.begin_request(), request })
}
