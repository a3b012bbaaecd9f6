//! Drivers that turn terminal input or command line flags into messages.

use anyhow::{bail, Result};

use crate::orchestrator::Orchestrator;
use crate::state::{AppState, Msg, Stage};
use crate::ux;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Category,
    Prompt,
    Fill,
    Generate,
    Copy,
    Email,
    Dismiss,
    Reload,
    Quit,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Category => "Select category",
            Action::Prompt => "Select prompt",
            Action::Fill => "Fill in the variables",
            Action::Generate => "Generate response",
            Action::Copy => "Copy to clipboard",
            Action::Email => "Email response",
            Action::Dismiss => "Dismiss message",
            Action::Reload => "Reload categories",
            Action::Quit => "Quit",
        }
    }
}

/// Menu entries that make sense for `state`.
pub fn available_actions(state: &AppState) -> Vec<Action> {
    let mut out = Vec::new();
    if !state.categories.is_empty() {
        out.push(Action::Category);
    }
    if state.selected_category.is_some() && !state.prompts.is_empty() {
        out.push(Action::Prompt);
    }
    if state.selected_prompt.is_some() && !state.variables.is_empty() {
        out.push(Action::Fill);
    }
    if state.selected_prompt.is_some() {
        out.push(Action::Generate);
    }
    if state.has_response() {
        out.push(Action::Copy);
        out.push(Action::Email);
    }
    if state.error.is_some() || state.notice.is_some() {
        out.push(Action::Dismiss);
    }
    out.push(Action::Reload);
    out.push(Action::Quit);
    out
}

pub async fn run_interactive(o: &mut Orchestrator) -> Result<()> {
    ux::banner();
    o.dispatch(Msg::Start).await;

    loop {
        ux::render(o.state());
        let actions = available_actions(o.state());
        let labels: Vec<String> = actions.iter().map(|a| a.label().to_string()).collect();
        let Some(choice) = choose("What next?", labels).await else { break };

        match actions[choice] {
            Action::Category => {
                let categories = o.state().categories.clone();
                if let Some(i) = choose("Select Category:", categories.clone()).await {
                    o.dispatch(Msg::SelectCategory(categories[i].clone())).await;
                }
            }
            Action::Prompt => {
                let names: Vec<String> = o.state().prompts.iter().map(|p| p.prompt_name.clone()).collect();
                if let Some(i) = choose("Select Prompt:", names.clone()).await {
                    let state = o.dispatch(Msg::SelectPrompt(names[i].clone())).await;
                    if state.stage == Stage::VariablesPending {
                        fill_variables(o).await;
                    }
                }
            }
            Action::Fill => fill_variables(o).await,
            Action::Generate => {
                o.dispatch(Msg::Generate).await;
            }
            Action::Copy => {
                o.dispatch(Msg::Copy).await;
            }
            Action::Email => {
                if let Some(address) = read_line("Enter your email address".to_string()).await {
                    o.dispatch(Msg::Email { address }).await;
                }
            }
            Action::Dismiss => {
                o.dispatch(Msg::DismissError).await;
            }
            Action::Reload => {
                o.dispatch(Msg::Start).await;
            }
            Action::Quit => break,
        }
    }
    Ok(())
}

// Terminal reads block, so they run on the blocking pool while the spinner
// task keeps its worker.
async fn choose(title: &'static str, options: Vec<String>) -> Option<usize> {
    tokio::task::spawn_blocking(move || ux::choose(title, &options)).await.ok().flatten()
}

async fn read_line(label: String) -> Option<String> {
    tokio::task::spawn_blocking(move || ux::read_line(&label)).await.ok().flatten()
}

/// Prompt for each variable; blank input keeps the current value.
async fn fill_variables(o: &mut Orchestrator) {
    println!("\nFill in the Variables:");
    let current: Vec<(String, String)> =
        o.state().variables.iter().map(|(n, v)| (n.to_string(), v.to_string())).collect();
    for (name, value) in current {
        let label = if value.is_empty() { name.clone() } else { format!("{name} [{value}, {CLEAR} clears]") };
        let Some(input) = read_line(label).await else { return };
        if let Some(value) = edit_from_input(&input) {
            o.dispatch(Msg::EditVariable { name, value }).await;
        }
    }
}

const CLEAR: &str = "-";

/// `None` keeps the current value; a lone `-` clears it.
fn edit_from_input(input: &str) -> Option<String> {
    match input.trim() {
        "" => None,
        CLEAR => Some(String::new()),
        _ => Some(input.to_string()),
    }
}

/// One-shot run described entirely by flags.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub category: String,
    pub prompt: String,
    pub vars: Vec<(String, String)>,
    pub copy: bool,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub response: String,
    pub notices: Vec<String>,
}

pub async fn run_scripted(o: &mut Orchestrator, script: &Script) -> Result<Outcome> {
    settle(o.dispatch(Msg::Start).await)?;
    settle(o.dispatch(Msg::SelectCategory(script.category.clone())).await)?;
    settle(o.dispatch(Msg::SelectPrompt(script.prompt.clone())).await)?;
    for (name, value) in &script.vars {
        settle(o.dispatch(Msg::EditVariable { name: name.clone(), value: value.clone() }).await)?;
    }

    let missing = o.state().variables.missing().join(", ");
    if !missing.is_empty() {
        bail!("Please fill in all variables (missing: {missing})");
    }
    let state = settle(o.dispatch(Msg::Generate).await)?;
    let response = state.response.clone().unwrap_or_default();

    let mut notices = Vec::new();
    if script.copy {
        let state = settle(o.dispatch(Msg::Copy).await)?;
        notices.extend(state.notice.clone());
    }
    if let Some(address) = &script.email {
        let state = settle(o.dispatch(Msg::Email { address: address.clone() }).await)?;
        notices.extend(state.notice.clone());
    }

    Ok(Outcome { response, notices })
}

fn settle(state: &AppState) -> Result<&AppState> {
    match &state.error {
        Some(err) => bail!("{err}"),
        None => Ok(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::fake::MemoryClipboard;
    use crate::service::fake::FakeService;
    use crate::wire::Prompt;

    fn orchestrator(service: &FakeService) -> Orchestrator {
        Orchestrator::new(Box::new(service.clone()), std::sync::Arc::new(MemoryClipboard::default()))
    }

    fn script(vars: &[(&str, &str)]) -> Script {
        Script {
            category: "Listings".into(),
            prompt: "Intro".into(),
            vars: vars.iter().map(|(n, v)| (n.to_string(), v.to_string())).collect(),
            ..Script::default()
        }
    }

    #[test]
    fn menu_grows_with_state() {
        let mut state = AppState::default();
        assert_eq!(available_actions(&state), vec![Action::Reload, Action::Quit]);

        state.categories = vec!["Listings".into()];
        state.selected_category = Some("Listings".into());
        state.prompts = vec![Prompt { prompt_name: "Intro".into(), prompt_template: "{{city}}".into() }];
        state.selected_prompt = state.prompts.first().cloned();
        state.variables = crate::template::Assignment::from_template("{{city}}");
        assert_eq!(
            available_actions(&state),
            vec![Action::Category, Action::Prompt, Action::Fill, Action::Generate, Action::Reload, Action::Quit]
        );

        state.stage = Stage::ResponseReady;
        state.response = Some("done".into());
        let actions = available_actions(&state);
        assert!(actions.contains(&Action::Copy));
        assert!(actions.contains(&Action::Email));
        assert!(!actions.contains(&Action::Dismiss));

        state.error = Some("Failed to send email".into());
        assert!(available_actions(&state).contains(&Action::Dismiss));
    }

    #[test]
    fn variable_input_keeps_clears_or_sets() {
        assert_eq!(edit_from_input(""), None);
        assert_eq!(edit_from_input("   "), None);
        assert_eq!(edit_from_input(" - "), Some(String::new()));
        assert_eq!(edit_from_input("Austin"), Some("Austin".to_string()));
        assert_eq!(edit_from_input("-5 degrees"), Some("-5 degrees".to_string()));
    }

    #[tokio::test]
    async fn scripted_run_generates_and_emails() {
        let service = FakeService::listings();
        let mut o = orchestrator(&service);
        let s = Script { email: Some("agent@example.com".into()), copy: true, ..script(&[("city", "Austin")]) };

        let out = run_scripted(&mut o, &s).await.unwrap();
        assert_eq!(out.response, "Generated text\nSecond line");
        assert_eq!(out.notices, vec!["Copied to clipboard!", "Email sent successfully!"]);
        assert_eq!(service.generated.lock().unwrap()[0].prompt, "Welcome to Austin!");
    }

    #[tokio::test]
    async fn scripted_run_names_missing_variables() {
        let service = FakeService::listings();
        let mut o = orchestrator(&service);
        let err = run_scripted(&mut o, &script(&[])).await.unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all variables (missing: city)");
        assert!(!service.calls().contains(&"generate".to_string()));
    }

    #[tokio::test]
    async fn scripted_run_reports_unknown_prompt() {
        let service = FakeService::listings();
        let mut o = orchestrator(&service);
        let s = Script { prompt: "Nope".into(), ..script(&[]) };
        let err = run_scripted(&mut o, &s).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown prompt: Nope");
    }

    #[tokio::test]
    async fn scripted_run_rejects_bad_address() {
        let service = FakeService::listings();
        let mut o = orchestrator(&service);
        let s = Script { email: Some("not-an-address".into()), ..script(&[("city", "Austin")]) };
        let err = run_scripted(&mut o, &s).await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid email address");
        assert!(!service.calls().contains(&"email".to_string()));
    }
}
