use crate::infra::ResultStore;
use crate::server;
use clap::{Args, Parser, Subcommand};
use eq_assessment::assessment::{
    export_csv, generate_questions, scenario_for_profession, Profession, Rating, ResultFilter,
    ResultRepository, SeniorityBand,
};
use eq_assessment::config::{AppConfig, ConfigError};
use eq_assessment::error::AppError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "EQ Assessment",
    about = "Serve and inspect scenario-based emotional intelligence assessments",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the scenario and questions a respondent would see
    Scenario(ScenarioArgs),
    /// Review stored assessment results
    Results {
        #[command(subcommand)]
        command: ResultsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ResultsCommand {
    /// List stored results, newest first
    List(ListArgs),
    /// Write stored results as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Persist results to this JSON file instead of EQ_RESULTS_PATH
    #[arg(long)]
    pub(crate) results_path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScenarioArgs {
    /// Respondent age in years
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) age: u32,
    /// Profession label, e.g. "IT Professional"; unknown labels use the generic scenarios
    #[arg(long, default_value = "Other")]
    pub(crate) profession: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct StoreArgs {
    /// Results file to read (defaults to EQ_RESULTS_PATH)
    #[arg(long)]
    pub(crate) results_path: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FilterArgs {
    /// Only include this profession
    #[arg(long)]
    pub(crate) profession: Option<String>,
    /// Only include this rating, e.g. "High EQ"
    #[arg(long, value_parser = parse_rating)]
    pub(crate) rating: Option<Rating>,
    /// Case-insensitive match on profession or rating
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    pub(crate) store: StoreArgs,
    #[command(flatten)]
    pub(crate) filter: FilterArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) store: StoreArgs,
    #[command(flatten)]
    pub(crate) filter: FilterArgs,
    /// Destination file; prints to stdout when omitted
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Scenario(args) => {
            print_scenario(&args, &mut io::stdout().lock())?;
            Ok(())
        }
        Command::Results {
            command: ResultsCommand::List(args),
        } => run_list(args),
        Command::Results {
            command: ResultsCommand::Export(args),
        } => run_export(args),
    }
}

fn parse_rating(raw: &str) -> Result<Rating, String> {
    Rating::from_label(raw.trim()).ok_or_else(|| {
        let known: Vec<_> = Rating::ALL.iter().map(Rating::label).collect();
        format!("unknown rating '{raw}' (expected one of: {})", known.join(", "))
    })
}

impl FilterArgs {
    fn into_filter(self) -> ResultFilter {
        ResultFilter {
            profession: self
                .profession
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(Profession::from_label),
            rating: self.rating,
            search: self.search,
        }
    }
}

fn open_store(args: StoreArgs) -> Result<ResultStore, AppError> {
    let path = match args.results_path {
        Some(path) => path,
        None => AppConfig::load()?
            .storage
            .results_path
            .ok_or(ConfigError::MissingResultsPath)?,
    };
    ResultStore::open_file(&path)
}

pub(crate) fn print_scenario<W: Write>(args: &ScenarioArgs, out: &mut W) -> io::Result<()> {
    let name = args.profession.trim();
    let profession = Profession::from_label(name);
    let display = if name.is_empty() { profession.label() } else { name };
    let seniority = SeniorityBand::from_age(args.age);

    writeln!(out, "EQ assessment scenario")?;
    writeln!(
        out,
        "- Profession: {profession} | Age: {} | Level: {}",
        args.age,
        seniority.label()
    )?;
    writeln!(out, "\n{}", scenario_for_profession(profession, args.age))?;
    writeln!(out, "\nQuestions:")?;
    for (index, question) in generate_questions(display).iter().enumerate() {
        writeln!(out, "{}. [{}] {}", index + 1, question.category, question.prompt)?;
    }
    Ok(())
}

fn run_list(args: ListArgs) -> Result<(), AppError> {
    let store = open_store(args.store)?;
    let results = store.list(&args.filter.into_filter())?;

    if results.is_empty() {
        println!("No assessment results match.");
        return Ok(());
    }

    println!("{} assessment result(s), newest first", results.len());
    for result in &results {
        println!(
            "- #{} {} | {} | age {} | {} | overall {:.1} | {}",
            result.id,
            result.created_at.format("%Y-%m-%d %H:%M"),
            result.profession,
            result.age,
            result.gender,
            result.overall_score,
            result.rating
        );
    }
    Ok(())
}

fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let store = open_store(args.store)?;
    let results = store.list(&args.filter.into_filter())?;

    match args.output {
        Some(path) => {
            let file = File::create(&path)?;
            export_csv(&results, BufWriter::new(file))?;
            eprintln!("Exported {} result(s) to {}", results.len(), path.display());
        }
        None => export_csv(&results, io::stdout().lock())?,
    }
    Ok(())
}
