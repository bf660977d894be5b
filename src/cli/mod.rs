//! Command-line interface for curriculum.
//!
//! Provides commands for publishing a corpus from authoring documents,
//! checking single documents, scaffolding lessons, and keeping a local
//! cache of a remote corpus in sync.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::ResolvedConfig;
use crate::domain::{LearningModule, Lesson};
use crate::parser;
use crate::publish::CorpusPublisher;
use crate::repository::{ContentRepository, FileStorage, HttpFetcher};

/// curriculum - Lesson corpus publisher and synchronized content cache
#[derive(Parser, Debug)]
#[command(name = "curriculum")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse lesson and module documents and write the corpus artifacts
    Publish {
        /// Lesson documents directory (defaults to config)
        #[arg(long)]
        lessons: Option<PathBuf>,

        /// Module documents directory (defaults to config)
        #[arg(long)]
        modules: Option<PathBuf>,

        /// Output root (defaults to config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a single lesson or module document and report what it contains
    Check {
        /// Document to check
        file: PathBuf,
    },

    /// Create a skeleton lesson document named after its title
    NewLesson {
        /// Lesson title
        #[arg(short, long)]
        title: String,

        /// Target directory (defaults to the configured lessons directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Refresh the local cache if the remote corpus is newer
    Sync {
        /// Base URL of the published corpus (overrides config)
        #[arg(long, env = "CURRICULUM_REMOTE_URL")]
        remote: Option<String>,
    },

    /// Show a cached lesson
    Lesson {
        /// Lesson id
        id: String,

        /// Print section contents and questions
        #[arg(short, long)]
        full: bool,
    },

    /// Show a cached module tree
    Module {
        /// Module id
        id: String,
    },

    /// List cached lessons
    Lessons,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = ResolvedConfig::load()?;

        match self.command {
            Commands::Publish {
                lessons,
                modules,
                output,
            } => publish(&config, lessons, modules, output).await,
            Commands::Check { file } => check(&config, &file),
            Commands::NewLesson { title, dir } => new_lesson(&config, &title, dir),
            Commands::Sync { remote } => sync(&config, remote).await,
            Commands::Lesson { id, full } => show_lesson(&config, &id, full).await,
            Commands::Module { id } => show_module(&config, &id).await,
            Commands::Lessons => list_lessons(&config).await,
            Commands::Config => {
                show_config(&config);
                Ok(())
            }
        }
    }
}

/// Publish the corpus
async fn publish(
    config: &ResolvedConfig,
    lessons: Option<PathBuf>,
    modules: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let lessons_dir = lessons.unwrap_or_else(|| config.lessons_dir.clone());
    let modules_dir = modules.unwrap_or_else(|| config.modules_dir.clone());
    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());

    let publisher = CorpusPublisher::new(&output_dir).with_extensions(
        &config.parser.lesson_extension,
        &config.parser.module_extension,
    );

    let summary = publisher
        .publish(&lessons_dir, &modules_dir)
        .await
        .context("Publish failed")?;

    println!("Published to {}", output_dir.display());
    println!("  Lessons: {}", summary.lessons);
    println!("  Modules: {}", summary.modules);
    println!("  Timestamp: {}", summary.metadata.last_updated_timestamp);
    for file in &summary.files {
        println!("  - {}", file.display());
    }

    Ok(())
}

/// Check a single document
fn check(config: &ResolvedConfig, file: &Path) -> Result<()> {
    let is_module = file
        .extension()
        .is_some_and(|ext| ext == config.parser.module_extension.as_str());

    if is_module {
        let module = parser::parse_module_file(file)?;
        println!("Module: {} ({})", module.title, module.id);
        println!("Depth: {}", module.depth());
        println!("Lessons referenced: {}", module.all_lessons().len());
        print_module_tree(&module, 0);
    } else {
        let lesson = parser::parse_lesson_file(file)?;
        println!("Lesson: {} ({})", lesson.metadata.title, lesson.id());
        println!("Sections: {}", lesson.sections.len());
        for section in &lesson.sections {
            println!("  - {}", section.title);
        }
        println!("Questions: {}", lesson.questions.len());
        for question in &lesson.questions {
            if question.correct_answer().is_none() {
                eprintln!(
                    "  warning: question {} has correctAnswerIndex {} but {} answers",
                    question.id,
                    question.correct_answer_index,
                    question.answers.len()
                );
            }
        }
    }

    Ok(())
}

/// Write a new lesson skeleton
fn new_lesson(config: &ResolvedConfig, title: &str, dir: Option<PathBuf>) -> Result<()> {
    let dir = dir.unwrap_or_else(|| config.lessons_dir.clone());
    let path = parser::scaffold_lesson(&dir, title, &config.parser.lesson_extension)
        .with_context(|| format!("Failed to create lesson '{}'", title))?;

    println!("Created {}", path.display());
    Ok(())
}

/// Open the local cache; `remote` is only needed for syncing
async fn open_repository(
    config: &ResolvedConfig,
    remote: Option<String>,
) -> Result<ContentRepository<HttpFetcher, FileStorage>> {
    let base_url = remote
        .or_else(|| config.remote.base_url.clone())
        .unwrap_or_default();

    let fetcher = HttpFetcher::with_timeout(
        base_url,
        Duration::from_secs(config.remote.timeout_seconds),
    )?;
    let storage = FileStorage::new(&config.cache_dir);

    Ok(ContentRepository::new(fetcher, storage).await)
}

/// Sync the local cache
async fn sync(config: &ResolvedConfig, remote: Option<String>) -> Result<()> {
    let repo = open_repository(config, remote).await?;

    if repo.fetcher().base_url().is_empty() {
        anyhow::bail!(
            "No remote configured. Use --remote <url>, CURRICULUM_REMOTE_URL, or remote.base_url in config"
        );
    }

    if repo.update_data_if_needed().await {
        println!("Content updated");
    } else {
        println!("Content already up to date");
    }
    println!("  Lessons cached: {}", repo.lesson_count());
    println!("  Modules cached: {}", repo.module_count());

    Ok(())
}

async fn show_lesson(config: &ResolvedConfig, id: &str, full: bool) -> Result<()> {
    let repo = open_repository(config, None).await?;
    let lesson = repo
        .fetch_lesson(id)
        .with_context(|| format!("Lesson not found in cache: {}", id))?;

    print_lesson(&lesson, full);
    Ok(())
}

async fn show_module(config: &ResolvedConfig, id: &str) -> Result<()> {
    let repo = open_repository(config, None).await?;
    let module = repo
        .fetch_module(id)
        .with_context(|| format!("Module not found in cache: {}", id))?;

    print_module_tree(&module, 0);
    Ok(())
}

async fn list_lessons(config: &ResolvedConfig) -> Result<()> {
    let repo = open_repository(config, None).await?;
    let lessons = repo.lessons();

    if lessons.is_empty() {
        println!("No lessons cached. Run `curriculum sync` first");
        return Ok(());
    }

    println!("{:<40} {:<40} {:<10}", "ID", "TITLE", "QUESTIONS");
    println!("{}", "-".repeat(92));
    for lesson in lessons {
        println!(
            "{:<40} {:<40} {:<10}",
            lesson.id(),
            lesson.metadata.title,
            lesson.questions.len()
        );
    }

    Ok(())
}

fn print_lesson(lesson: &Lesson, full: bool) {
    println!("ID: {}", lesson.id());
    println!("Title: {}", lesson.metadata.title);
    println!("Description: {}", lesson.metadata.description);
    if !lesson.metadata.tags.is_empty() {
        println!("Tags: {}", lesson.metadata.tags.join(", "));
    }

    println!("\nSections:");
    for section in &lesson.sections {
        println!("  {}", section.title);
        if full {
            for line in section.content.lines() {
                println!("    {}", line);
            }
        }
    }

    println!("\nQuestions: {}", lesson.questions.len());
    if full {
        for question in &lesson.questions {
            println!("  [{}] {}", question.id, question.question);
            for (i, answer) in question.answers.iter().enumerate() {
                let marker = if i == question.correct_answer_index { "*" } else { " " };
                println!("    {} {}", marker, answer);
            }
        }
    }
}

fn print_module_tree(module: &LearningModule, indent: usize) {
    let pad = "  ".repeat(indent);
    println!("{}{} ({})", pad, module.title, module.id);
    for lesson in &module.lessons {
        println!("{}  - lesson: {}", pad, lesson);
    }
    for sub in &module.sub_modules {
        print_module_tree(sub, indent + 1);
    }
}

fn show_config(config: &ResolvedConfig) {
    println!("Home: {}", config.home.display());
    println!("Lessons: {}", config.lessons_dir.display());
    println!("Modules: {}", config.modules_dir.display());
    println!("Output: {}", config.output_dir.display());
    println!("Cache: {}", config.cache_dir.display());
    println!(
        "Remote: {}",
        config.remote.base_url.as_deref().unwrap_or("(not set)")
    );
    println!("Timeout: {}s", config.remote.timeout_seconds);
    println!(
        "Extensions: lesson=.{} module=.{}",
        config.parser.lesson_extension, config.parser.module_extension
    );
    match &config.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none)"),
    }
}
