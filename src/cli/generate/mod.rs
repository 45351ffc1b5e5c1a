//! Generate command - one question set from a local file, no HTTP involved

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Args};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{GenerationRequest, Language, QuestionSource};

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["content", "sample"])))]
pub struct GenerateArgs {
    /// Lesson content file (Markdown)
    #[arg(long, value_name = "FILE")]
    pub content: Option<PathBuf>,

    /// Sample question file (LaTeX)
    #[arg(long, value_name = "FILE")]
    pub sample: Option<PathBuf>,

    /// Output language: fa or en
    #[arg(long, default_value = "fa")]
    pub language: String,

    /// Registered model key; omit or pass `auto` to select automatically
    #[arg(long)]
    pub model: Option<String>,
}

impl GenerateArgs {
    async fn into_request(self) -> anyhow::Result<GenerationRequest> {
        let content = read_optional(self.content.as_ref()).await?;
        let sample = read_optional(self.sample.as_ref()).await?;

        let source = QuestionSource::from_parts(content, sample)?;
        let language: Language = self.language.parse()?;

        let mut request = GenerationRequest::new(source, language);
        if let Some(model) = self.model {
            request = request.with_model_key(model);
        }

        Ok(request)
    }
}

async fn read_optional(path: Option<&PathBuf>) -> anyhow::Result<Option<String>> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map(Some)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => Ok(None),
    }
}

/// Print the path of the written file on stdout
pub async fn run(config: AppConfig, args: GenerateArgs) -> anyhow::Result<()> {
    let request = args.into_request().await?;
    let service = crate::create_generation_service(&config).await?;

    let result = service.generate(request).await?;

    info!(
        model = %result.model_used,
        choice = result.choice.as_str(),
        "Question set written"
    );
    println!("{}", result.output.path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn parse(args: &[&str]) -> Result<GenerateArgs, clap::Error> {
        let cli = Cli::try_parse_from(std::iter::once("question-forge").chain(args.iter().copied()))?;
        match cli.command {
            Command::Generate(args) => Ok(args),
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_requires_exactly_one_source() {
        assert!(parse(&["generate"]).is_err());
        assert!(parse(&["generate", "--content", "a.md", "--sample", "b.tex"]).is_err());

        let args = parse(&["generate", "--sample", "b.tex", "--model", "math"]).unwrap();
        assert_eq!(args.sample, Some(PathBuf::from("b.tex")));
        assert_eq!(args.language, "fa");
        assert_eq!(args.model.as_deref(), Some("math"));
    }

    #[tokio::test]
    async fn test_into_request_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let lesson = dir.path().join("lesson.md");
        std::fs::write(&lesson, "# Limits").unwrap();

        let args = GenerateArgs {
            content: Some(lesson),
            sample: None,
            language: "en".to_string(),
            model: None,
        };

        let request = args.into_request().await.unwrap();
        assert_eq!(request.source, QuestionSource::Content("# Limits".to_string()));
        assert_eq!(request.language, Language::English);
    }

    #[tokio::test]
    async fn test_into_request_reports_missing_file() {
        let args = GenerateArgs {
            content: None,
            sample: Some(PathBuf::from("/nonexistent/sample.tex")),
            language: "fa".to_string(),
            model: None,
        };

        let err = args.into_request().await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sample.tex"));
    }
}
