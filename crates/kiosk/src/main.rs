use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use catalog::{CatalogError, Mood, Movie, TimeBudget};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rec_client::{HttpRecommendationClient, SubscriptionRequest};
use session::{Intent, RequestPhase, ResultSet, SessionController, Snapshot, Step};

/// StreamPick - a guided movie picker for people who hate scrolling
#[derive(Parser)]
#[command(name = "streampick")]
#[command(about = "Answer two questions, get one movie", long_about = None)]
struct Cli {
    /// Base URL of the recommendation backend
    #[arg(long, default_value = "http://localhost:8080")]
    api_url: String,

    /// Seconds to wait on the backend before giving up on a query
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the guided flow interactively (the default)
    Run,

    /// One-shot recommendation without the guided flow
    Recommend {
        /// Mood to match, e.g. "cozy" or "thrilling"
        #[arg(short, long)]
        mood: String,

        /// Time available, as minutes or a label like "binge"
        #[arg(short, long)]
        time: String,

        /// Show why each alternate matched, not just the featured pick
        #[arg(long)]
        explain: bool,
    },

    /// List the moods and time budgets the picker understands
    Moods,

    /// Sign up for the weekly picks email
    Subscribe {
        /// Name to greet you by
        #[arg(short, long)]
        name: String,

        /// Email address to send picks to
        #[arg(short, long)]
        email: String,

        /// Comma-separated moods you usually reach for
        #[arg(short, long, default_value = "")]
        moods: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let client = Arc::new(
        HttpRecommendationClient::with_timeout(
            &cli.api_url,
            Duration::from_secs(cli.timeout_secs),
        )
        .context("Failed to set up the recommendation client")?,
    );

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_kiosk(client).await?,
        Commands::Recommend {
            mood,
            time,
            explain,
        } => handle_recommend(client, &mood, &time, explain).await?,
        Commands::Moods => print_menu(),
        Commands::Subscribe { name, email, moods } => {
            handle_subscribe(client, name, email, &moods).await?
        }
    }

    Ok(())
}

/// Interactive loop. Renders the current screen, reads one line, maps it
/// onto an intent and dispatches it. Input is only read while no query is
/// in flight, so blocking on stdin never delays a response.
async fn run_kiosk(client: Arc<HttpRecommendationClient>) -> Result<()> {
    let controller = SessionController::new(client);
    let mut lines = io::stdin().lock().lines();

    loop {
        let snapshot = controller.snapshot().await;
        render(&snapshot);

        print!("{} ", ">".bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let input = line?;
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }

        let intent = match parse_intent(&snapshot, trimmed) {
            Ok(Some(intent)) => intent,
            Ok(None) => continue,
            Err(hint) => {
                println!("{}", hint.yellow());
                continue;
            }
        };

        match controller.dispatch(intent).await {
            Ok(after) => {
                if after.phase == RequestPhase::Loading {
                    println!();
                    println!("{}", "Finding your match...".dimmed());
                    controller.wait_for_outcome().await;
                }
            }
            Err(e) => println!("{}", e.to_string().yellow()),
        }
    }

    println!("{}", "Enjoy the movie!".bold().cyan());
    Ok(())
}

async fn handle_recommend(
    client: Arc<HttpRecommendationClient>,
    mood: &str,
    time: &str,
    explain: bool,
) -> Result<()> {
    let mood = mood.parse::<Mood>()?;
    let time_budget = time.parse::<TimeBudget>()?;

    println!(
        "Finding a {} pick for {} minutes...",
        mood.label().bold(),
        time_budget.minutes()
    );

    let controller = SessionController::new(client);
    controller.dispatch(Intent::Start).await?;
    controller.dispatch(Intent::SelectMood(mood)).await?;
    controller.dispatch(Intent::SelectTime(time_budget)).await?;

    let snapshot = controller.wait_for_outcome().await;
    match &snapshot.phase {
        RequestPhase::Succeeded => {
            if let Some(result) = &snapshot.result {
                render_result(result, explain);
            }
            Ok(())
        }
        RequestPhase::Failed(reason) => Err(anyhow!("{reason}")),
        other => Err(anyhow!("Query ended in unexpected phase: {other:?}")),
    }
}

async fn handle_subscribe(
    client: Arc<HttpRecommendationClient>,
    name: String,
    email: String,
    moods: &str,
) -> Result<()> {
    let preferred_moods = parse_mood_list(moods)?;
    let ack = client
        .subscribe(&SubscriptionRequest {
            name,
            email,
            preferred_moods,
        })
        .await
        .context("Subscription request failed")?;

    if ack.success {
        println!("{} {}", "✓".green(), ack.message);
    } else {
        println!("{} {}", "✗".yellow(), ack.message);
    }
    Ok(())
}

fn print_menu() {
    println!("{}", "Moods".bold().blue());
    for mood in Mood::ALL {
        println!(
            "  {} {} ({}) - {}",
            mood.emoji(),
            mood.label().bold(),
            mood,
            mood.description()
        );
    }
    println!();
    println!("{}", "Time budgets".bold().blue());
    for budget in TimeBudget::ALL {
        println!(
            "  {} ({} min) - {}",
            budget.label().bold(),
            budget.minutes(),
            budget.subtitle()
        );
    }
}

// ============================================================================
// Input parsing
// ============================================================================

/// Maps one line of input onto an intent for the current screen.
/// `Ok(None)` means there is nothing to dispatch; `Err` carries a hint
/// to show the user.
fn parse_intent(snapshot: &Snapshot, input: &str) -> Result<Option<Intent>, String> {
    let normalized = input.trim().to_lowercase();

    // Shortcuts that work on every screen.
    match normalized.as_str() {
        "b" | "back" => return Ok(Some(Intent::Back)),
        "n" | "new" | "restart" => return Ok(Some(Intent::Restart)),
        _ => {}
    }

    match snapshot.step {
        Step::Home => Ok(Some(Intent::Start)),
        Step::MoodSelect => {
            if normalized.is_empty() {
                return Ok(None);
            }
            parse_mood_entry(&normalized)
                .map(|mood| Some(Intent::SelectMood(mood)))
                .ok_or_else(|| {
                    format!(
                        "Pick a mood 1-{} or type one, like \"cozy\"",
                        Mood::ALL.len()
                    )
                })
        }
        Step::TimeSelect => {
            if normalized.is_empty() {
                return Ok(None);
            }
            parse_time_entry(&normalized)
                .map(|budget| Some(Intent::SelectTime(budget)))
                .ok_or_else(|| "Pick 1-3, or minutes like 90".to_string())
        }
        Step::Reveal => match snapshot.phase {
            RequestPhase::Succeeded => {
                if normalized.is_empty() {
                    return Ok(None);
                }
                if normalized == "r" || normalized == "retry" {
                    return Ok(Some(Intent::Retry));
                }
                let available = snapshot
                    .result
                    .as_ref()
                    .map(|r| r.alternate_count())
                    .unwrap_or(0);
                match normalized.parse::<usize>() {
                    Ok(position) if (1..=available).contains(&position) => {
                        Ok(Some(Intent::SelectAlternate(position - 1)))
                    }
                    _ => Err(format!(
                        "Pick an alternate 1-{available}, r to retry, b to go back"
                    )),
                }
            }
            RequestPhase::Failed(_) => {
                if normalized.is_empty() {
                    Ok(None)
                } else if normalized == "r" || normalized == "retry" {
                    Ok(Some(Intent::Retry))
                } else {
                    Err("r to try again, b to go back, n to start over".to_string())
                }
            }
            _ => Ok(None),
        },
    }
}

/// A mood entry is a 1-based menu position or a mood name.
/// Positions win, so "1" is always the first menu item.
fn parse_mood_entry(input: &str) -> Option<Mood> {
    if let Ok(position) = input.parse::<usize>() {
        return (1..=Mood::ALL.len())
            .contains(&position)
            .then(|| Mood::ALL[position - 1]);
    }
    input.parse::<Mood>().ok()
}

/// A time entry is a 1-based menu position, a minute count, or a label.
fn parse_time_entry(input: &str) -> Option<TimeBudget> {
    if let Ok(position) = input.parse::<usize>() {
        if (1..=TimeBudget::ALL.len()).contains(&position) {
            return Some(TimeBudget::ALL[position - 1]);
        }
    }
    input.parse::<TimeBudget>().ok()
}

fn parse_mood_list(input: &str) -> Result<Vec<Mood>, CatalogError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<Mood>())
        .collect()
}

// ============================================================================
// Rendering
// ============================================================================

fn render(snapshot: &Snapshot) {
    println!();
    match snapshot.step {
        Step::Home => {
            println!("{}", "🎬 What should you watch tonight?".bold().cyan());
            println!("{}", "Press Enter to begin (q to quit).".dimmed());
        }
        Step::MoodSelect => {
            println!("{}", "How do you want to feel?".bold().cyan());
            for (position, mood) in Mood::ALL.iter().enumerate() {
                println!(
                    "  {}. {} {} {}",
                    (position + 1).to_string().green(),
                    mood.emoji(),
                    mood.label().bold(),
                    format!("- {}", mood.description()).dimmed()
                );
            }
            println!("{}", "Pick a number or type a mood (b back, q quit).".dimmed());
        }
        Step::TimeSelect => {
            println!("{}", "How much time do you have?".bold().cyan());
            for (position, budget) in TimeBudget::ALL.iter().enumerate() {
                println!(
                    "  {}. {} ({} min) {}",
                    (position + 1).to_string().green(),
                    budget.label().bold(),
                    budget.minutes(),
                    format!("- {}", budget.subtitle()).dimmed()
                );
            }
            println!("{}", "Pick a number or minutes (b back, q quit).".dimmed());
        }
        Step::Reveal => render_reveal(snapshot),
    }
}

fn render_reveal(snapshot: &Snapshot) {
    match &snapshot.phase {
        RequestPhase::Loading => println!("{}", "Finding your match...".dimmed()),
        RequestPhase::Succeeded => {
            if let Some(result) = &snapshot.result {
                render_result(result, false);
                println!(
                    "{}",
                    "Pick a number to swap, r retry, b back, n start over, q quit.".dimmed()
                );
            }
        }
        RequestPhase::Failed(reason) => {
            println!("{} {}", "✗".red(), reason.to_string().red());
            println!("{}", "r to try again, b to go back, n to start over.".dimmed());
        }
        RequestPhase::Idle => {}
    }
}

/// Prints the featured pick in full, then the alternates as a numbered
/// list; `explain` adds each alternate's rationale line.
fn render_result(result: &ResultSet, explain: bool) {
    let featured = result.featured();

    println!("{}", "Tonight's pick".bold().cyan());
    println!(
        "  {} {}",
        featured.movie.title.bold().green(),
        format!("({:.0}% match)", featured.match_score).yellow()
    );
    let details = movie_details(&featured.movie);
    if !details.is_empty() {
        println!("  {details}");
    }
    if let Some(description) = &featured.movie.description {
        println!("  {description}");
    }
    if let Some(rationale) = &featured.rationale {
        println!("  {}", format!("\"{rationale}\"").italic());
    }
    if !featured.movie.platforms.is_empty() {
        println!(
            "  {} {}",
            "Watch on:".dimmed(),
            featured.movie.platforms.join(", ")
        );
    }

    if result.alternate_count() > 0 {
        println!();
        println!("{}", "Not feeling it? Other matches:".bold());
        for (position, (_, candidate)) in result.alternates().enumerate() {
            println!(
                "  {}. {} {}",
                (position + 1).to_string().green(),
                candidate.movie.title,
                format!("({:.0}%)", candidate.match_score).dimmed()
            );
            if explain {
                if let Some(rationale) = &candidate.rationale {
                    println!("     {}", format!("\"{rationale}\"").italic().dimmed());
                }
            }
        }
    }

    println!(
        "{}",
        format!(
            "Ranked {} of {} titles considered ({}).",
            result.candidate_count(),
            result.total_candidates(),
            result.source()
        )
        .dimmed()
    );
}

fn movie_details(movie: &Movie) -> String {
    let mut parts = Vec::new();
    if let Some(year) = movie.year {
        parts.push(year.to_string());
    }
    if let Some(runtime) = movie.runtime {
        parts.push(format!("{runtime} min"));
    }
    if let Some(rating) = movie.rating {
        parts.push(format!("{rating:.1}/10"));
    }
    if !movie.genres.is_empty() {
        parts.push(movie.genres.join(", "));
    }
    parts.join(" · ")
}
