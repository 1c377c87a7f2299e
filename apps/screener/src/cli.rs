use std::fmt;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing::info;

use crate::errors::AppError;
use crate::models::candidate::ResumeDocument;
use crate::screening::{RunStatus, ScreeningOrchestrator, ScreeningReport};

#[derive(Parser, Debug)]
#[command(
    name = "screener",
    about = "Screen PDF resumes against a job description using LLM extraction and GitHub enrichment",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one screening batch and emit the JSON report
    Screen(ScreenArgs),
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("job")
        .required(true)
        .args(["job_description", "job_description_file"])
))]
pub(crate) struct ScreenArgs {
    /// Job description text
    #[arg(long)]
    job_description: Option<String>,
    /// Read the job description from a file
    #[arg(long, value_name = "PATH")]
    job_description_file: Option<PathBuf>,
    /// Resume PDFs, screened in the order given
    #[arg(value_name = "RESUME", required = true)]
    resumes: Vec<PathBuf>,
    /// Write the JSON report here instead of stdout
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Emit only the JSON report, without the shortlist table
    #[arg(long)]
    json: bool,
}

pub async fn run(cli: Cli, orchestrator: &ScreeningOrchestrator) -> Result<(), AppError> {
    match cli.command {
        Command::Screen(args) => screen(args, orchestrator).await,
    }
}

async fn screen(args: ScreenArgs, orchestrator: &ScreeningOrchestrator) -> Result<(), AppError> {
    let job_description = load_job_description(&args).await?;
    let documents = read_resumes(&args.resumes).await?;

    let report = orchestrator.run_screening(&job_description, documents).await;

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .map_err(|source| io_error(path, source))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    if !args.json {
        eprint!("{}", ShortlistTable(&report));
    }

    match report.status {
        RunStatus::Complete => Ok(()),
        RunStatus::Failed => Err(AppError::BatchExhausted {
            candidates: report.results.len(),
        }),
    }
}

async fn load_job_description(args: &ScreenArgs) -> Result<String, AppError> {
    let text = match (&args.job_description, &args.job_description_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .map_err(|source| io_error(path, source))?,
        (None, None) => String::new(),
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "Job description must not be empty".to_string(),
        ));
    }
    Ok(text.to_string())
}

/// Reads every resume up front so a missing file aborts before any LLM call.
async fn read_resumes(paths: &[PathBuf]) -> Result<Vec<ResumeDocument>, AppError> {
    if paths.is_empty() {
        return Err(AppError::Validation(
            "At least one resume is required".to_string(),
        ));
    }

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| io_error(path, source))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        documents.push(ResumeDocument::new(filename, bytes));
    }
    Ok(documents)
}

fn io_error(path: &Path, source: std::io::Error) -> AppError {
    AppError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Ranked table of scored candidates followed by the unscored ones.
struct ShortlistTable<'a>(&'a ScreeningReport);

impl fmt::Display for ShortlistTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let shortlist = report.shortlist();

        writeln!(f, "\nShortlist (run {})", report.run_id)?;
        if shortlist.is_empty() {
            writeln!(f, "  no candidate was scored")?;
        }
        for entry in &shortlist {
            writeln!(
                f,
                "{:>3}. {:>2}/10  {:<8}  {} ({})",
                entry.rank,
                entry.score.value(),
                entry.band.label(),
                entry.candidate_name,
                entry.filename
            )?;
        }

        let unscored: Vec<_> = report.unscored().collect();
        if !unscored.is_empty() {
            writeln!(f, "\nNot scored:")?;
            for result in unscored {
                writeln!(
                    f,
                    "  - {} ({}): {}",
                    result.candidate_name,
                    result.filename,
                    result.reason.as_deref().unwrap_or("unknown")
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::{Candidate, CandidateStatus};
    use crate::models::evaluation::{Evaluation, Explanation, Score};
    use chrono::Utc;
    use clap::CommandFactory;
    use uuid::Uuid;

    fn screen_args(argv: &[&str]) -> ScreenArgs {
        let mut full = vec!["screener", "screen"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Screen(args) => args,
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_screen_args() {
        let args = screen_args(&["--job-description", "Backend engineer", "a.pdf", "b.pdf", "--json"]);
        assert_eq!(args.job_description.as_deref(), Some("Backend engineer"));
        assert_eq!(args.resumes, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
        assert!(args.json);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_job_description_is_required() {
        assert!(Cli::try_parse_from(["screener", "screen", "a.pdf"]).is_err());
    }

    #[test]
    fn test_job_description_sources_are_exclusive() {
        let result = Cli::try_parse_from([
            "screener",
            "screen",
            "--job-description",
            "x",
            "--job-description-file",
            "jd.txt",
            "a.pdf",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_at_least_one_resume_is_required() {
        assert!(Cli::try_parse_from(["screener", "screen", "--job-description", "x"]).is_err());
    }

    #[tokio::test]
    async fn test_job_description_from_file_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jd.txt");
        std::fs::write(&path, "\n  Backend engineer, Python, PostgreSQL \n").unwrap();

        let args = screen_args(&["--job-description-file", path.to_str().unwrap(), "a.pdf"]);

        assert_eq!(
            load_job_description(&args).await.unwrap(),
            "Backend engineer, Python, PostgreSQL"
        );
    }

    #[tokio::test]
    async fn test_blank_job_description_is_rejected() {
        let args = screen_args(&["--job-description", "   ", "a.pdf"]);
        assert!(matches!(
            load_job_description(&args).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_read_resumes_uses_file_names_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("jane.pdf");
        let second = dir.path().join("bob.pdf");
        std::fs::write(&first, b"%PDF-jane").unwrap();
        std::fs::write(&second, b"%PDF-bob").unwrap();

        let documents = read_resumes(&[first, second]).await.unwrap();

        let names: Vec<_> = documents.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, vec!["jane.pdf", "bob.pdf"]);
        assert_eq!(&documents[1].bytes[..], b"%PDF-bob");
    }

    #[tokio::test]
    async fn test_missing_resume_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");
        assert!(matches!(
            read_resumes(&[missing]).await,
            Err(AppError::Io { .. })
        ));
    }

    #[test]
    fn test_shortlist_table_ranks_and_lists_unscored() {
        let scored = |index: usize, name: &str, score: i64| {
            let doc = ResumeDocument::new(format!("{name}.pdf"), Vec::new());
            let mut candidate = Candidate::intake(index, &doc);
            candidate.evaluation = Some(Evaluation {
                score: Score::try_from(score).unwrap(),
                explanation: Explanation::default(),
            });
            candidate.conclude(CandidateStatus::Scored, None).0
        };
        let skipped = {
            let doc = ResumeDocument::new("scan.pdf", Vec::new());
            Candidate::intake(2, &doc)
                .conclude(
                    CandidateStatus::SkippedNoText,
                    Some("no extractable text".to_string()),
                )
                .0
        };
        let results = vec![scored(0, "bob", 4), scored(1, "jane", 9), skipped];
        let report = ScreeningReport {
            run_id: Uuid::nil(),
            started_at: Utc::now(),
            job_description: "Backend engineer".to_string(),
            status: RunStatus::from_results(&results),
            results,
        };

        let table = ShortlistTable(&report).to_string();

        let jane = table.find("jane (jane.pdf)").unwrap();
        let bob = table.find("bob (bob.pdf)").unwrap();
        assert!(jane < bob);
        assert!(table.contains("  1.  9/10"));
        assert!(table.contains("scan (scan.pdf): no extractable text"));
    }
}
