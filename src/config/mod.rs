use anyhow::{anyhow, Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::Args;

const LOCAL_CONFIG: &str = "promptgen.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub categories_url: String,
    pub prompts_url: String,
    pub generate_url: String,
    pub email_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            categories_url: "http://localhost:5678/webhook/categories".into(),
            prompts_url: "http://localhost:5678/webhook/prompts".into(),
            generate_url: "http://localhost:5678/webhook/generate".into(),
            email_url: "http://localhost:5678/webhook/email".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoints: Endpoints,
    pub timeout_secs: u64,
    pub transcript_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            timeout_secs: 120,
            transcript_dir: ".promptgen/transcripts".into(),
        }
    }
}

impl Config {
    /// Explicit file, else `./promptgen.toml` when present, else defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            return Self::load_from_file(Path::new(p)).with_context(|| format!("failed to load config from {p}"));
        }
        let local = Path::new(LOCAL_CONFIG);
        if local.is_file() {
            return Self::load_from_file(local);
        }
        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&text).context("failed to parse config file")?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Apply `PROMPTGEN_*` overrides using `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let urls = [
            ("PROMPTGEN_CATEGORIES_URL", &mut self.endpoints.categories_url),
            ("PROMPTGEN_PROMPTS_URL", &mut self.endpoints.prompts_url),
            ("PROMPTGEN_GENERATE_URL", &mut self.endpoints.generate_url),
            ("PROMPTGEN_EMAIL_URL", &mut self.endpoints.email_url),
        ];
        for (key, slot) in urls {
            if let Some(v) = lookup(key) {
                *slot = v;
            }
        }
        if let Some(v) = lookup("PROMPTGEN_TIMEOUT_SECS") {
            self.timeout_secs = v
                .trim()
                .parse()
                .map_err(|_| anyhow!("PROMPTGEN_TIMEOUT_SECS must be a whole number of seconds, got {v:?}"))?;
        }
        if let Some(v) = lookup("PROMPTGEN_TRANSCRIPT_DIR") {
            self.transcript_dir = v;
        }
        Ok(())
    }

    /// Command line flags win over file and environment.
    pub fn apply_args(&mut self, args: &Args) {
        let urls = [
            (&args.categories_url, &mut self.endpoints.categories_url),
            (&args.prompts_url, &mut self.endpoints.prompts_url),
            (&args.generate_url, &mut self.endpoints.generate_url),
            (&args.email_url, &mut self.endpoints.email_url),
        ];
        for (flag, slot) in urls {
            if let Some(v) = flag {
                *slot = v.clone();
            }
        }
        if let Some(t) = args.timeout_secs {
            self.timeout_secs = t;
        }
        if let Some(d) = &args.transcript_dir {
            self.transcript_dir = d.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        let named = [
            ("categories", &self.endpoints.categories_url),
            ("prompts", &self.endpoints.prompts_url),
            ("generate", &self.endpoints.generate_url),
            ("email", &self.endpoints.email_url),
        ];
        for (name, url) in named {
            let parsed = reqwest::Url::parse(url).with_context(|| format!("invalid {name} endpoint {url:?}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(anyhow!("{name} endpoint must be http(s), got {url:?}"));
            }
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }
        Ok(())
    }
}
