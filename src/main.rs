// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use quizbank::converter::find_html_files;
use quizbank::utils::logging::{format_count, format_error, format_success, format_warning};
use quizbank::{
    ChapterReader, Config, ConversionOutcome, HtmlConverter, JsonExporter, QuestionBankStatistics,
    QuestionGenerator, Validator,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "quizbank")]
#[command(version = "0.1.0")]
#[command(
    about = "Turns saved driving theory chapters into cleaned markdown and quiz question banks",
    long_about = None
)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FileKind {
    Html,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every saved HTML chapter page into cleaned markdown
    Convert {
        #[arg(short, long, value_name = "DIR")]
        input: Option<PathBuf>,

        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[arg(short, long, value_name = "NUM")]
        workers: Option<usize>,
    },

    /// Convert a single HTML page
    ConvertSingle {
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// List the files a conversion or generation run would pick up
    ListFiles {
        #[arg(long, value_enum, default_value = "html")]
        kind: FileKind,

        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Generate questions for every chapter in the markdown directory
    Generate {
        #[arg(short, long, value_name = "DIR")]
        input: Option<PathBuf>,

        /// Output file, or output directory with --separate
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Write one JSON file per chapter
        #[arg(long)]
        separate: bool,

        #[arg(short, long, value_name = "NUM")]
        questions: Option<usize>,

        #[arg(long, value_name = "NUM")]
        incorrect: Option<usize>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long, value_name = "URL")]
        api_base: Option<String>,

        #[arg(short, long, value_name = "NUM")]
        workers: Option<usize>,
    },

    /// Generate questions for one markdown chapter
    GenerateSingle {
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[arg(short, long, value_name = "NUM")]
        questions: Option<usize>,

        #[arg(long)]
        model: Option<String>,
    },

    /// Show statistics for a generated question file
    Stats {
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    quizbank::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Convert {
            input,
            output,
            workers,
        } => {
            cmd_convert(config, input, output, workers).await?;
        }
        Commands::ConvertSingle { file, output } => {
            cmd_convert_single(config, &file, output)?;
        }
        Commands::ListFiles { kind, dir } => {
            cmd_list_files(&config, kind, dir)?;
        }
        Commands::Generate {
            input,
            output,
            separate,
            questions,
            incorrect,
            model,
            api_base,
            workers,
        } => {
            let mut config = config;
            if let Some(questions) = questions {
                config.generator.questions_per_chapter = questions;
            }
            if let Some(incorrect) = incorrect {
                config.generator.incorrect_answers = incorrect;
            }
            if let Some(model) = model {
                config.llm.model = model;
            }
            if let Some(api_base) = api_base {
                config.llm.api_base = api_base;
            }
            if let Some(workers) = workers {
                config.generator.parallel_workers = workers;
            }
            cmd_generate(config, input, output, separate).await?;
        }
        Commands::GenerateSingle {
            file,
            output,
            questions,
            model,
        } => {
            let mut config = config;
            if let Some(questions) = questions {
                config.generator.questions_per_chapter = questions;
            }
            if let Some(model) = model {
                config.llm.model = model;
            }
            cmd_generate_single(config, &file, output).await?;
        }
        Commands::Stats { file } => {
            cmd_stats(&file)?;
        }
    }

    Ok(())
}

async fn cmd_convert(
    mut config: Config,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    workers: Option<usize>,
) -> Result<()> {
    if let Some(input) = input {
        config.converter.input_dir = input;
    }
    if let Some(output) = output {
        config.converter.output_dir = output;
    }
    if let Some(workers) = workers {
        config.converter.parallel_workers = workers;
    }
    config.validate().context("Invalid converter settings")?;

    Validator::validate_directory(&config.converter.input_dir)
        .context("HTML input directory is not usable")?;

    info!(
        "Converting {} -> {}",
        config.converter.input_dir.display(),
        config.converter.output_dir.display()
    );

    let start_time = Instant::now();
    let converter = HtmlConverter::new(config.converter, config.cleaner);
    let summary = converter.convert_all().await.context("Conversion failed")?;

    println!("\n{}", "Conversion complete".bold().green());
    println!("{}", format_count("Converted", summary.converted));
    println!("{}", format_count("Skipped", summary.skipped));
    println!("{}", format_count("Failed", summary.failed));
    println!("{}", format_count("Total", summary.total));
    info!(
        "Converted in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn cmd_convert_single(mut config: Config, file: &Path, output: Option<PathBuf>) -> Result<()> {
    Validator::validate_html_file(file).context("Not a usable HTML file")?;

    if let Some(output) = output {
        config.converter.output_dir = output;
    }

    let converter = HtmlConverter::new(config.converter, config.cleaner);
    match converter.convert_file(file).context("Conversion failed")? {
        ConversionOutcome::Written(path) => {
            println!(
                "{}",
                format_success(&format!("Converted to: {}", path.display()))
            );
        }
        ConversionOutcome::Skipped { reason } => {
            println!(
                "{}",
                format_warning(&format!("Skipped {}: {}", file.display(), reason))
            );
        }
    }

    Ok(())
}

fn cmd_list_files(config: &Config, kind: FileKind, dir: Option<PathBuf>) -> Result<()> {
    let files = match kind {
        FileKind::Html => {
            let dir = dir.unwrap_or_else(|| config.converter.input_dir.clone());
            find_html_files(&dir).context("Failed to list HTML files")?
        }
        FileKind::Markdown => {
            let dir = dir.unwrap_or_else(|| config.generator.input_dir.clone());
            ChapterReader::new(
                config.generator.min_content_chars,
                config.generator.skip_keywords.clone(),
            )
            .find_markdown_files(&dir)
            .context("Failed to list markdown files")?
        }
    };

    println!("{}\n", format!("Found {} files:", files.len()).bold());
    for (index, file) in files.iter().enumerate() {
        println!(
            "{:>4}. {} {}",
            index + 1,
            file.file_name.green(),
            format_size(file.size).yellow()
        );
    }

    Ok(())
}

async fn cmd_generate(
    config: Config,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    separate: bool,
) -> Result<()> {
    config.validate().context("Invalid generator settings")?;
    Validator::validate_url(&config.llm.api_base).context("Invalid LLM endpoint")?;

    let input = input.unwrap_or_else(|| config.generator.input_dir.clone());
    Validator::validate_directory(&input).context("Markdown input directory is not usable")?;

    let generator =
        QuestionGenerator::from_config(&config).context("Failed to create LLM client")?;

    if separate {
        let out_dir = output.unwrap_or_else(|| config.generator.output_path.with_extension(""));
        let (bank, manifest) = generator
            .generate_from_directory_separate(&input, &out_dir)
            .await
            .context("Question generation failed")?;

        println!(
            "{}",
            format_success(&format!(
                "Created {} chapter files in {}",
                manifest.files.len(),
                out_dir.display()
            ))
        );
        print_statistics(&bank.statistics());
        return Ok(());
    }

    let bank = generator
        .generate_from_directory(&input)
        .await
        .context("Question generation failed")?;

    if bank.is_empty() {
        println!("{}", format_error("No questions generated"));
        return Ok(());
    }

    let output = output.unwrap_or_else(|| config.generator.output_path.clone());
    let exported = JsonExporter::new()
        .save_question_bank(&bank, &output)
        .context("Failed to save question bank")?;

    println!(
        "{}",
        format_success(&format!(
            "Saved {} questions to {} (sha256 {})",
            exported.questions,
            output.display(),
            exported.sha256
        ))
    );
    print_statistics(&bank.statistics());

    Ok(())
}

async fn cmd_generate_single(config: Config, file: &Path, output: Option<PathBuf>) -> Result<()> {
    config.validate().context("Invalid generator settings")?;
    Validator::validate_markdown_file(file).context("Not a usable markdown file")?;

    let generator =
        QuestionGenerator::from_config(&config).context("Failed to create LLM client")?;
    let bank = generator
        .generate_from_single_file(file)
        .await
        .context("Question generation failed")?;

    if bank.is_empty() {
        println!("{}", format_error("Failed to generate questions"));
        return Ok(());
    }

    println!(
        "{}",
        format_success(&format!("Generated {} questions", bank.len()))
    );

    match output {
        Some(output) => {
            JsonExporter::new()
                .save_question_bank(&bank, &output)
                .context("Failed to save question bank")?;
            println!(
                "{}",
                format_success(&format!("Saved questions to: {}", output.display()))
            );
        }
        None => {
            for (index, question) in bank.questions.iter().enumerate() {
                println!("\n{} {}", format!("{}.", index + 1).cyan(), question.question);
                for answer in &question.answers {
                    let marker = if answer.is_correct { "✓".green() } else { "-".normal() };
                    println!("   {} {}", marker, answer.text);
                }
            }
        }
    }

    Ok(())
}

fn cmd_stats(file: &Path) -> Result<()> {
    let bank = JsonExporter::new()
        .load_question_bank(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    print_statistics(&bank.statistics());

    for issue in Validator::question_issues(&bank) {
        println!("{}", format_warning(&issue));
    }

    Ok(())
}

fn print_statistics(stats: &QuestionBankStatistics) {
    println!("\n{}", "Question Statistics".bold().blue());
    println!("{}", format_count("Total", stats.total_questions));

    if stats.total_questions == 0 {
        return;
    }

    let mut categories: Vec<(&String, &usize)> = stats.categories.iter().collect();
    categories.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    println!("\n{}", "Questions by category:".bold());
    for (category, count) in categories {
        let percentage = *count as f64 / stats.total_questions as f64 * 100.0;
        println!(
            "  {:<32} {:>5} {:>7}",
            category.cyan(),
            count.to_string().green(),
            format!("{:.1}%", percentage).yellow()
        );
    }

    println!("\n{}", "Questions by difficulty:".bold());
    for (difficulty, count) in &stats.difficulties {
        println!("{}", format_count(difficulty, *count));
    }

    println!(
        "\nAverage answers per question: {}",
        format!("{:.1}", stats.avg_answers_per_question).green()
    );
}

fn format_size(size: u64) -> String {
    if size > 1024 {
        format!("{:.1} KB", size as f64 / 1024.0)
    } else {
        format!("{} B", size)
    }
}
