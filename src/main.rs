//! Habitplan CLI entry point
//!
//! Terminal front end for the questionnaire session: renders questions from
//! controller state, forwards input back in, and prints the generated plan.

use std::fs;
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result, bail, eyre};
use rustyline::DefaultEditor;
use tracing::info;

use habitplan::catalog::{Catalog, Choice, QuestionKind};
use habitplan::cli::{Cli, Command, ExportFormat};
use habitplan::config::Config;
use habitplan::export;
use habitplan::generate::HttpGenerator;
use habitplan::plan::Weekday;
use habitplan::session::{Phase, Session, Step};
use habitplan::store::Store;

fn setup_logging(cli_level: Option<&str>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(service_url = %config.service_url, "Loaded configuration");

    let store = Store::open(&config.data_dir)?;
    let generator = Arc::new(HttpGenerator::from_config(&config).map_err(|e| eyre!("{e}"))?);
    let catalog = if config.skip_custom_interests {
        Catalog::standard_without_custom_interests()
    } else {
        Catalog::standard()
    };
    let mut session = Session::resume(catalog, generator, store);

    match cli.command {
        None => {
            if session.plan().is_some() {
                show_plan(&session);
            } else {
                run_wizard(&mut session).await?;
            }
        }
        Some(Command::Plan) => {
            session.start();
            run_wizard(&mut session).await?;
        }
        Some(Command::Show) => {
            show_plan(&session);
        }
        Some(Command::Regenerate) => {
            if session.answers().is_empty() {
                bail!("No stored answers; run `hp plan` first");
            }
            println!("{}", "Regenerating your weekly plan...".dimmed());
            session.regenerate().await.map_err(|e| eyre!("{e}"))?;
            show_plan(&session);
        }
        Some(Command::Check { day, index }) => {
            let day = Weekday::parse(&day).ok_or_else(|| eyre!("Unknown day: {}", day))?;
            let title = {
                let plan = session
                    .plan()
                    .ok_or_else(|| eyre!("No stored plan; run `hp plan` first"))?;
                let habits = plan.habits_for(day);
                if index == 0 || index > habits.len() {
                    bail!("{} has {} habits; positions are 1-based", day, habits.len());
                }
                habits[index - 1].title.clone()
            };
            let done = session.toggle_habit(day, index - 1);
            let mark = if done { "done".green() } else { "not done".yellow() };
            println!("{}: {} ({})", day, title, mark);
        }
        Some(Command::Export { format, output }) => {
            let plan = session
                .plan()
                .ok_or_else(|| eyre!("No stored plan; run `hp plan` first"))?;
            let name = session.answers().scalar("name").unwrap_or("User");
            let date = Local::now().date_naive();
            let rendered = match format {
                ExportFormat::Text => export::render_text(plan, name, date),
                ExportFormat::Markdown => export::render_markdown(plan, name, date),
            };
            match output {
                Some(path) => {
                    fs::write(&path, rendered).context("Failed to write export file")?;
                    println!("{} Exported plan to {}", "✓".green(), path.display());
                }
                None => print!("{}", rendered),
            }
        }
        Some(Command::Reset) => {
            session.restart();
            println!("{} Cleared stored answers, plan, and completion state", "✓".green());
        }
    }

    Ok(())
}

/// Drive the questionnaire until completion or abort
async fn run_wizard(session: &mut Session) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("{}", "Weekly Habits Planner".bold());
    println!(
        "{}",
        "Answer a few questions to get a personalized weekly habit plan.".dimmed()
    );
    println!("{}", "Type 'back' to return to the previous question.".dimmed());

    loop {
        if session.phase() == Phase::Completed {
            show_plan(session);
            return Ok(());
        }
        let Some(question) = session.current_question().cloned() else {
            return Ok(());
        };
        let options = session.current_options().to_vec();
        let (pos, total) = session.progress();

        println!();
        println!("{} {}", format!("[{}/{}]", pos, total).dimmed(), question.prompt.bold());

        match question.kind {
            QuestionKind::FreeText => {
                if let Some(hint) = &question.placeholder {
                    println!("{}", hint.dimmed());
                }
                let line = rl.readline("> ")?;
                let input = line.trim();
                if input.eq_ignore_ascii_case("back") {
                    session.retreat();
                    continue;
                }
                if !input.is_empty() {
                    session.submit(&question.id, input)?;
                }
                try_advance(session, &mut rl).await?;
            }
            QuestionKind::SingleChoice => {
                print_options(&options, &[]);
                let line = rl.readline("> ")?;
                let input = line.trim();
                if input.eq_ignore_ascii_case("back") {
                    session.retreat();
                    continue;
                }
                match parse_selection(input, options.len()) {
                    Some(i) => {
                        session.submit(&question.id, &options[i].value)?;
                        try_advance(session, &mut rl).await?;
                    }
                    None => println!("{}", "Please enter a number from the list.".red()),
                }
            }
            QuestionKind::MultiChoice | QuestionKind::DynamicMultiChoice => {
                let selected = session.answers().selections(&question.id).to_vec();
                print_options(&options, &selected);
                println!("{}", "Enter numbers separated by commas, then press Enter.".dimmed());
                let line = rl.readline("> ")?;
                let input = line.trim();
                if input.eq_ignore_ascii_case("back") {
                    session.retreat();
                    continue;
                }
                for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    match parse_selection(part, options.len()) {
                        Some(i) => session.submit(&question.id, &options[i].value)?,
                        None => println!("{} {}", "Ignored:".yellow(), part),
                    }
                }
                try_advance(session, &mut rl).await?;
            }
        }
    }
}

/// Advance the session, narrating network waits and offering retry on a
/// failed generation
async fn try_advance(session: &mut Session, rl: &mut DefaultEditor) -> Result<()> {
    if session.validate(session.cursor()) {
        let (pos, total) = session.progress();
        if pos == total {
            println!("{}", "Generating your weekly plan...".dimmed());
        } else if session
            .catalog()
            .get(session.cursor() + 1)
            .is_some_and(|q| q.kind == QuestionKind::DynamicMultiChoice)
        {
            println!(
                "{}",
                "Generating personalized activities based on your goals...".dimmed()
            );
        }
    }

    let mut result = session.advance().await;
    loop {
        match result {
            Ok(Step::Refused) => {
                println!("{}", "An answer is required before continuing.".red());
                return Ok(());
            }
            Ok(_) => return Ok(()),
            Err(e) => {
                eprintln!("{} {}", "Plan generation failed:".red().bold(), e);
                let line = rl.readline("Retry? [y/N] ")?;
                if !line.trim().eq_ignore_ascii_case("y") {
                    return Err(eyre!("Plan generation failed: {e}"));
                }
                result = session.retry().await.map(|_| Step::Completed);
            }
        }
    }
}

fn print_options(options: &[Choice], selected: &[String]) {
    for (i, choice) in options.iter().enumerate() {
        let marker = if selected.contains(&choice.value) {
            "✓".green()
        } else {
            " ".normal()
        };
        println!("  {} {} {}", format!("{:>2}.", i + 1).dimmed(), marker, choice.label);
    }
}

/// Parse a 1-based selection into a 0-based index
fn parse_selection(input: &str, len: usize) -> Option<usize> {
    match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Some(n - 1),
        _ => None,
    }
}

fn show_plan(session: &Session) {
    let Some(plan) = session.plan() else {
        println!("No plan generated yet. Run {} to create one.", "hp plan".bold());
        return;
    };

    println!();
    println!("{}", "Your Weekly Habit Plan".bold());
    if let Some(summary) = &plan.summary {
        println!("{}", summary.italic());
    }

    let status = session.status();
    for day in Weekday::ALL {
        let habits = plan.habits_for(day);
        if habits.is_empty() {
            continue;
        }
        println!();
        println!("{}", day.name().cyan().bold());
        for (i, habit) in habits.iter().enumerate() {
            let mark = if status.is_done(day, i) {
                "[x]".green()
            } else {
                "[ ]".normal()
            };
            println!(
                "  {} {} {}  {}",
                mark,
                habit.category.icon(),
                habit.title,
                format!("{}  •  {}  •  {}", habit.time, habit.duration, habit.category).dimmed()
            );
        }
    }

    println!();
    println!(
        "{}",
        "Use `hp check <day> <n>` to mark habits, `hp export` to save, `hp regenerate` for a fresh plan.".dimmed()
    );
}
