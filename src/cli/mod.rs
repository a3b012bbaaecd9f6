use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "promptgen",
    version,
    about = "Fill prompt templates and generate responses through a remote workflow service"
)]
pub struct Args {
    /// TOML config file (defaults to ./promptgen.toml when present)
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long)]
    pub categories_url: Option<String>,

    #[arg(long)]
    pub prompts_url: Option<String>,

    #[arg(long)]
    pub generate_url: Option<String>,

    #[arg(long)]
    pub email_url: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Run once without menus: pick this category...
    #[arg(long, requires = "prompt")]
    pub category: Option<String>,

    /// ...and this prompt by name.
    #[arg(long, requires = "category")]
    pub prompt: Option<String>,

    /// Template variable, repeatable.
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Copy the generated response to the clipboard (scripted mode).
    #[arg(long, default_value_t = false, requires = "prompt")]
    pub copy: bool,

    /// Email the generated response to this address (scripted mode).
    #[arg(long, value_name = "ADDRESS", requires = "prompt")]
    pub email: Option<String>,

    #[arg(long, default_value_t = false)]
    pub save_transcript: bool,

    #[arg(long)]
    pub transcript_dir: Option<String>,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl Args {
    pub fn is_scripted(&self) -> bool {
        self.category.is_some() && self.prompt.is_some()
    }
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim().to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got {s:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_by_default() {
        let args = Args::try_parse_from(["promptgen"]).unwrap();
        assert!(!args.is_scripted());
        assert!(args.vars.is_empty());
    }

    #[test]
    fn scripted_flags_parse() {
        let args = Args::try_parse_from([
            "promptgen",
            "--category",
            "Listings",
            "--prompt",
            "Intro",
            "--var",
            "city=Austin",
            "--var",
            " note =a=b",
            "--email",
            "agent@example.com",
        ])
        .unwrap();
        assert!(args.is_scripted());
        assert_eq!(
            args.vars,
            vec![("city".to_string(), "Austin".to_string()), ("note".to_string(), "a=b".to_string())]
        );
        assert_eq!(args.email.as_deref(), Some("agent@example.com"));
    }

    #[test]
    fn category_requires_prompt() {
        assert!(Args::try_parse_from(["promptgen", "--category", "Listings"]).is_err());
    }

    #[test]
    fn malformed_var_is_rejected() {
        assert!(parse_var("city").is_err());
        assert!(parse_var("=Austin").is_err());
        assert_eq!(parse_var("city=").unwrap(), ("city".to_string(), String::new()));
    }
}
