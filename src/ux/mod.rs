use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::state::{AppState, Stage};

pub fn banner() {
    println!("\n{}", "━━━━━━━━━━━━━━━ Real Estate AI Prompt Generator ━━━━━━━━━━━━━━━".bold());
}

pub fn stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::Idle => "waiting for categories",
        Stage::CategoriesLoaded => "choose a category",
        Stage::PromptsLoaded => "choose a prompt",
        Stage::VariablesPending => "fill in the variables",
        Stage::ReadyToGenerate => "ready to generate",
        Stage::ResponseReady => "response ready",
    }
}

/// Print the current state: messages first, then the selection trail and
/// whatever the current stage needs.
pub fn render(state: &AppState) {
    if let Some(err) = &state.error {
        println!("{} {}", "error:".red().bold(), err.red());
    }
    if let Some(notice) = &state.notice {
        println!("{} {}", "ok:".green().bold(), notice.green());
    }

    println!("\n{} {}", "Status:".bold(), stage_label(state.stage).dimmed());
    if let Some(c) = &state.selected_category {
        println!("{} {}", "Category:".bold(), c.cyan());
    }
    if let Some(p) = &state.selected_prompt {
        println!("{} {}", "Prompt:".bold(), p.prompt_name.cyan());
    }

    if state.selected_prompt.is_some() && !state.variables.is_empty() {
        println!("\n{} ({})", "Variables:".bold(), state.variables.len());
        for (name, value) in state.variables.iter() {
            if value.trim().is_empty() {
                println!("  {} = {}", name.yellow(), "(empty)".dimmed());
            } else {
                println!("  {} = {}", name.yellow(), value);
            }
        }
        if !state.can_generate() && !state.loading {
            println!("  {} {}", "still needed:".dimmed(), state.variables.missing().join(", ").dimmed());
        }
    }

    if state.has_response() {
        println!("\n{}", "Generated Response:".bold());
        for line in response_block(state) {
            println!("{line}");
        }
    }
    let _ = io::stdout().flush();
}

fn response_block(state: &AppState) -> Vec<String> {
    state.response_lines().into_iter().map(|l| format!("  {l}")).collect()
}

/// Print a numbered list and read a 1-based choice. Blank input or EOF
/// returns `None`; anything unparsable asks again.
pub fn choose(title: &str, options: &[String]) -> Option<usize> {
    println!("\n{}", title.bold());
    for (i, o) in options.iter().enumerate() {
        println!("  {}. {}", i + 1, o);
    }
    loop {
        let answer = read_line("Choice (blank to go back)")?;
        match parse_choice(&answer, options.len()) {
            Ok(choice) => return choice,
            Err(msg) => println!("{}", msg.yellow()),
        }
    }
}

fn parse_choice(input: &str, count: usize) -> Result<Option<usize>, String> {
    let t = input.trim();
    if t.is_empty() {
        return Ok(None);
    }
    match t.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Ok(Some(n - 1)),
        _ => Err(format!("enter a number between 1 and {count}")),
    }
}

/// Read one line from stdin without its trailing newline; `None` on EOF.
pub fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}: ");
    let _ = io::stdout().flush();
    let mut s = String::new();
    match io::stdin().read_line(&mut s) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(s.trim_end_matches(['\r', '\n']).to_string()),
    }
}

/// Show a spinner whenever the observed state is loading.
pub fn spawn_spinner(mut rx: watch::Receiver<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut bar: Option<ProgressBar> = None;
        while rx.changed().await.is_ok() {
            let loading = rx.borrow_and_update().loading;
            if loading && bar.is_none() {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::with_template("{spinner:.cyan} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                pb.set_message("Working...");
                pb.enable_steady_tick(Duration::from_millis(100));
                bar = Some(pb);
            } else if !loading {
                if let Some(pb) = bar.take() {
                    pb.finish_and_clear();
                }
            }
        }
        if let Some(pb) = bar {
            pb.finish_and_clear();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_are_one_based() {
        assert_eq!(parse_choice("1", 3), Ok(Some(0)));
        assert_eq!(parse_choice(" 3 ", 3), Ok(Some(2)));
        assert_eq!(parse_choice("", 3), Ok(None));
        assert!(parse_choice("0", 3).is_err());
        assert!(parse_choice("4", 3).is_err());
        assert!(parse_choice("two", 3).is_err());
    }

    #[test]
    fn response_block_indents_each_line() {
        let mut state = AppState::default();
        assert!(response_block(&state).is_empty());
        state.response = Some("first\n\nthird".into());
        assert_eq!(response_block(&state), vec!["  first", "  ", "  third"]);
    }

    #[test]
    fn every_stage_has_a_label() {
        for stage in [
            Stage::Idle,
            Stage::CategoriesLoaded,
            Stage::PromptsLoaded,
            Stage::VariablesPending,
            Stage::ReadyToGenerate,
            Stage::ResponseReady,
        ] {
            assert!(!stage_label(stage).is_empty());
        }
    }
}
