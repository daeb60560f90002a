//! Tripline CLI - route one question to the math or general agent.

use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tripline::prelude::*;
use tripline::providers::DEFAULT_TIMEOUT_SECS;

/// Supported completion providers.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum Provider {
    /// Google Gemini
    #[default]
    Gemini,
    /// Ollama (local models)
    Ollama,
}

impl From<Provider> for ProviderKind {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Gemini => Self::Gemini,
            Provider::Ollama => Self::Ollama,
        }
    }
}

/// Tripline CLI - guarded triage agents
#[derive(Parser, Debug)]
#[command(name = "tripline")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Question to ask; read from stdin when omitted
    question: Option<String>,

    /// Completion provider to use
    #[arg(short, long, value_enum, default_value_t = Provider::Gemini)]
    provider: Provider,

    /// Model name (provider-specific, uses default if not specified)
    #[arg(short, long)]
    model: Option<String>,

    /// Gemini model name (only for gemini provider)
    #[arg(long, env = "GEMINI_MODEL_NAME")]
    gemini_model: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Override the provider base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Ollama server URL (only for ollama provider)
    #[arg(long, env = "OLLAMA_HOST")]
    ollama_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Print run metrics after the answer
    #[arg(long)]
    metrics: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn settings(&self) -> Settings {
        let provider = ProviderKind::from(self.provider);
        let mut settings = Settings::for_provider(provider);
        settings.timeout_secs = self.timeout_secs;

        let (provider_model, provider_url) = match provider {
            ProviderKind::Gemini => (self.gemini_model.clone(), None),
            ProviderKind::Ollama => (None, self.ollama_url.clone()),
        };

        if let Some(model) = self.model.clone().or(provider_model) {
            settings = settings.with_model(model);
        }
        if let Some(key) = &self.api_key {
            settings = settings.with_api_key(key);
        }
        if let Some(url) = self.base_url.clone().or(provider_url) {
            settings = settings.with_base_url(url);
        }

        settings
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tripline=debug,tripline_cli=debug")
    } else {
        EnvFilter::new("tripline=warn,tripline_cli=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn prompt_question() -> std::io::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Enter your question: ").await?;
    stdout.flush().await?;

    read_question(BufReader::new(tokio::io::stdin())).await
}

async fn read_question(mut reader: impl AsyncBufRead + Unpin) -> std::io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line).await?;
    Ok(line.trim().to_owned())
}

async fn ask(settings: &Settings, question: &str) -> tripline::Result<RunResult> {
    let service = settings.build_service()?;
    tracing::debug!(provider = %settings.provider, model = %settings.model, "completion service ready");

    let agent = TriageRouter::new(service).route(question).await?;
    println!("Handoff → {}", agent.name());

    Runner::run(&agent, question).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let question = match &args.question {
        Some(question) => question.clone(),
        None => prompt_question().await?,
    };

    match ask(&args.settings(), &question).await {
        Ok(result) => {
            println!("\nFinal Output: {}", result.final_output);
            if args.metrics {
                println!("\n{}", result.metrics);
            }
        }
        Err(err) if err.is_input_blocked() => {
            println!("❌ Error: invalid input (blocked by input guardrail)");
        }
        Err(err) => {
            println!("\nError: {err}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_build_gemini_settings() {
        let args = Args::try_parse_from([
            "tripline",
            "--api-key",
            "k",
            "--model",
            "gemini-1.5-pro",
            "--timeout-secs",
            "30",
            "What is 2+2?",
        ])
        .unwrap();

        let settings = args.settings();
        assert_eq!(settings.provider, ProviderKind::Gemini);
        assert_eq!(settings.model, "gemini-1.5-pro");
        assert_eq!(settings.api_key.as_deref(), Some("k"));
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(args.question.as_deref(), Some("What is 2+2?"));
    }

    #[test]
    fn test_provider_specific_settings_stay_with_their_provider() {
        let args = Args::try_parse_from([
            "tripline",
            "--provider",
            "ollama",
            "--gemini-model",
            "gemini-2.0-flash",
            "--ollama-url",
            "http://10.0.0.2:11434",
            "q",
        ])
        .unwrap();
        let settings = args.settings();
        assert_eq!(settings.provider, ProviderKind::Ollama);
        assert_eq!(settings.model, "llama3.2");
        assert_eq!(settings.base_url.as_deref(), Some("http://10.0.0.2:11434"));

        let args = Args::try_parse_from([
            "tripline",
            "--api-key",
            "k",
            "--gemini-model",
            "gemini-1.5-flash",
            "--ollama-url",
            "http://10.0.0.2:11434",
        ])
        .unwrap();
        let settings = args.settings();
        assert_eq!(settings.model, "gemini-1.5-flash");
        assert_eq!(settings.base_url, None);
    }

    #[test]
    fn test_explicit_model_wins_for_any_provider() {
        let args = Args::try_parse_from([
            "tripline",
            "--provider",
            "ollama",
            "--model",
            "qwen2.5",
            "--gemini-model",
            "gemini-2.0-flash",
        ])
        .unwrap();
        assert_eq!(args.settings().model, "qwen2.5");
    }

    #[tokio::test]
    async fn test_read_question_strips_surrounding_whitespace() {
        let question = read_question(&b"   What is 2+2?  \r\n"[..]).await.unwrap();
        assert_eq!(question, "What is 2+2?");

        let empty = read_question(&b""[..]).await.unwrap();
        assert_eq!(empty, "");
    }
}
