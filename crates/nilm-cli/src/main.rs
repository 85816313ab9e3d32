//! NILM CLI - Energy dashboard and assistant chat
//!
//! Terminal front-end for the NILM API: shows a house's appliance overview
//! and runs an interactive chat with the energy assistant.

mod api;
mod config;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password};
use tracing_subscriber::EnvFilter;

use nilm::domain::{efficiency_breakdown, power_timeline, recommendations, ALL_APPLIANCES, HOUSES};
use nilm::ports::DEFAULT_HISTORY_LIMIT;
use nilm::{
    ApplianceRecord, ChatError, ChatSession, ChatTranscriptStore, ChatTurn, DashboardOverview,
    HistoryOutcome, MetricsQuery, MetricsRepository, SendOutcome, SkipReason, StatusClass,
    UserScope,
};

use api::NilmClient;
use config::Config;

type CliSession = ChatSession<NilmClient, NilmClient>;

#[derive(Parser)]
#[command(name = "nilm")]
#[command(about = "NILM CLI - Energy dashboard and assistant chat", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Show or change configuration
    Config {
        /// API base URL
        #[arg(long)]
        base_url: Option<String>,
        /// User owning the chat transcript
        #[arg(long)]
        user: Option<String>,
        /// Default house (1-6)
        #[arg(long)]
        house: Option<String>,
        /// Default temperature (0.0-1.0)
        #[arg(long)]
        temperature: Option<f32>,
    },

    /// Show the energy overview of a house
    Dashboard {
        /// House (1-6), defaults to the configured house
        #[arg(short = 'H', long)]
        house: Option<String>,
        /// Appliance filter: all, refrigerator, washer_dryer, microwave, dish_washer
        #[arg(short, long, default_value = ALL_APPLIANCES)]
        appliance: String,
    },

    /// Print the stored chat transcript
    History {
        /// Max exchanges
        #[arg(short, long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: i64,
    },

    /// Chat with the energy assistant
    Chat {
        /// House (1-6), defaults to the configured house
        #[arg(short = 'H', long)]
        house: Option<String>,
        /// Appliance filter for the dashboard context
        #[arg(short, long, default_value = ALL_APPLIANCES)]
        appliance: String,
        /// Sampling temperature (0.0-1.0)
        #[arg(short, long)]
        temperature: Option<f32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key } => cmd_login(key).await,
        Commands::Config {
            base_url,
            user,
            house,
            temperature,
        } => cmd_config(base_url, user, house, temperature),
        Commands::Dashboard { house, appliance } => cmd_dashboard(house, appliance).await,
        Commands::History { limit } => cmd_history(limit).await,
        Commands::Chat {
            house,
            appliance,
            temperature,
        } => cmd_chat(house, appliance, temperature).await,
    }
}

fn client_for(config: &Config) -> NilmClient {
    NilmClient::new(&config.base_url, config.api_key.as_deref())
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(key: Option<String>) -> Result<()> {
    let mut config = Config::load_file()?;

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    // Test connection
    let client = NilmClient::new(&config.base_url, Some(&api_key));
    print!("Testing connection... ");

    match client.verify_key().await {
        Ok(()) => {
            println!("{}", "OK".green());
        }
        Err(e) => {
            println!("{}", "Failed".red());
            bail!("Could not connect to NILM API. Check your API key. ({})", e);
        }
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);

    if config.user_id.is_none() {
        println!("\n{}", "Tip: Set the user that owns your chat history:".yellow());
        println!("  nilm config --user <USER_ID>");
    }

    Ok(())
}

fn cmd_config(
    base_url: Option<String>,
    user: Option<String>,
    house: Option<String>,
    temperature: Option<f32>,
) -> Result<()> {
    let changed = base_url.is_some() || user.is_some() || house.is_some() || temperature.is_some();

    if changed {
        let mut config = Config::load_file()?;
        if let Some(url) = base_url {
            config.base_url = url;
        }
        if let Some(user) = user {
            config.user_id = Some(user);
        }
        if let Some(house) = house {
            config.set_default_house(house)?;
        }
        if let Some(temperature) = temperature {
            config.set_temperature(temperature)?;
        }
        config.save()?;
        println!("{} Configuration saved", "✓".green());
    }

    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if config.api_key.is_some() { "Set".green() } else { "Not set".red() }
    );
    println!(
        "  User: {}",
        config.user_id.as_deref().unwrap_or("None").cyan()
    );
    println!("  Default House: {}", config.default_house);
    println!("  Temperature: {}", config.temperature);
    println!("  Generation Timeout: {}s", config.generation_timeout_secs);

    Ok(())
}

async fn cmd_dashboard(house: Option<String>, appliance: String) -> Result<()> {
    let config = Config::load()?;
    let house = house.unwrap_or_else(|| config.default_house.clone());
    let query = MetricsQuery::from_selection(&house, Some(&appliance))?;

    let rows = client_for(&config).fetch_metrics(&query).await?;
    print_dashboard(&house, &appliance, &rows);

    Ok(())
}

async fn cmd_history(limit: i64) -> Result<()> {
    let config = Config::load()?;
    let scope = UserScope::new(config.require_user()?);

    let records = client_for(&config)
        .list(&scope, limit)
        .await
        .context("Failed to load chat history")?;

    if records.is_empty() {
        println!("No messages yet for {}.", scope.as_str().cyan());
        return Ok(());
    }

    for turn in records.iter().flat_map(|r| r.to_turns()) {
        print_turn(&turn);
    }

    Ok(())
}

// ============================================
// Chat REPL
// ============================================

/// Dashboard selection the chat context is built from
struct Selection {
    house: String,
    appliance: String,
}

impl Selection {
    fn query(&self) -> Result<MetricsQuery> {
        Ok(MetricsQuery::from_selection(
            &self.house,
            Some(&self.appliance),
        )?)
    }
}

/// One line typed at the chat prompt
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Message(String),
    Temperature(String),
    House(String),
    Appliance(String),
    User(String),
    Refresh,
    History,
    Help,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return ReplCommand::Message(line.to_string());
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim().to_string()),
            None => (command, String::new()),
        };

        match name {
            "temp" | "temperature" => ReplCommand::Temperature(arg),
            "house" => ReplCommand::House(arg),
            "appliance" => ReplCommand::Appliance(arg),
            "user" => ReplCommand::User(arg),
            "refresh" => ReplCommand::Refresh,
            "history" => ReplCommand::History,
            "help" => ReplCommand::Help,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}

async fn cmd_chat(
    house: Option<String>,
    appliance: String,
    temperature: Option<f32>,
) -> Result<()> {
    let config = Config::load()?;
    let user = config.require_user()?.to_string();

    let client = Arc::new(client_for(&config));
    let session: CliSession =
        ChatSession::new(client.clone(), client.clone(), config.session_config());

    if let Some(temperature) = temperature {
        session.set_temperature(temperature).await?;
    }

    let mut selection = Selection {
        house: house.unwrap_or_else(|| config.default_house.clone()),
        appliance,
    };
    selection.query()?;

    session.set_user_scope(Some(UserScope::new(user))).await;
    refresh_dashboard(&client, &session, &selection).await;
    show_history(&session).await;

    println!(
        "{}",
        "Ask about your energy usage. /help lists commands, /quit exits.".dimmed()
    );

    loop {
        let line: String = Input::new()
            .with_prompt(">")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read input")?;

        match ReplCommand::parse(&line) {
            ReplCommand::Message(text) => {
                session.set_pending_input(text).await;
                print_outcome(session.submit().await);
            }
            ReplCommand::Temperature(value) => match value.parse::<f32>() {
                Ok(t) => match session.set_temperature(t).await {
                    Ok(()) => println!("{} Temperature set to {}", "✓".green(), t),
                    Err(e) => println!("{} {}", "✗".red(), e),
                },
                Err(_) => println!("{} Usage: /temp <0.0-1.0>", "✗".red()),
            },
            ReplCommand::House(house) => {
                if !HOUSES.contains(&house.as_str()) {
                    println!("{} Choose a house from {}", "✗".red(), HOUSES.join(", "));
                    continue;
                }
                selection.house = house;
                refresh_dashboard(&client, &session, &selection).await;
            }
            ReplCommand::Appliance(name) => {
                let previous = std::mem::replace(&mut selection.appliance, name);
                if let Err(e) = selection.query() {
                    println!("{} {}", "✗".red(), e);
                    selection.appliance = previous;
                    continue;
                }
                refresh_dashboard(&client, &session, &selection).await;
            }
            ReplCommand::User(user) => {
                if user.is_empty() {
                    let current = session.user_scope().await;
                    println!(
                        "Current user: {}",
                        current.as_ref().map(UserScope::as_str).unwrap_or("none").cyan()
                    );
                    continue;
                }
                if session.set_user_scope(Some(UserScope::new(user))).await {
                    show_history(&session).await;
                }
            }
            ReplCommand::Refresh => refresh_dashboard(&client, &session, &selection).await,
            ReplCommand::History => show_history(&session).await,
            ReplCommand::Help => print_repl_help(),
            ReplCommand::Quit => break,
            ReplCommand::Unknown(name) => {
                println!("{} Unknown command /{}. Try /help.", "✗".red(), name)
            }
        }
    }

    Ok(())
}

/// Fetch rows for the selection and hand them to the session.
/// On failure the previous rows stay in place.
async fn refresh_dashboard(client: &NilmClient, session: &CliSession, selection: &Selection) {
    let query = match selection.query() {
        Ok(query) => query,
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            return;
        }
    };

    match client.fetch(&query).await {
        Ok(rows) => {
            let overview = DashboardOverview::from_rows(&rows);
            println!(
                "{} House {} ({}): {} now, {}/day, {} avg efficiency",
                "⚡".yellow(),
                selection.house.bold(),
                selection.appliance,
                overview.power_label().cyan(),
                overview.cost_label().cyan(),
                overview.efficiency_label().cyan()
            );
            session.update_dashboard(rows, selection.house.clone()).await;
        }
        Err(e) => {
            tracing::warn!("Dashboard refresh failed: {}", e);
            println!("{} Could not refresh dashboard data: {}", "✗".red(), e);
        }
    }
}

async fn show_history(session: &CliSession) {
    let result = session.load_history().await;
    match &result {
        Ok(HistoryOutcome::Loaded(n)) if *n > 0 => {
            for turn in session.transcript().await {
                print_turn(&turn);
            }
        }
        Err(e) => tracing::warn!("Chat history not loaded: {}", e),
        _ => {}
    }
    if let Some(text) = history_notice(&result) {
        println!("{}", text.dimmed());
    }
}

/// Status line for a history load. Failures stay in the log.
fn history_notice(result: &Result<HistoryOutcome, ChatError>) -> Option<&'static str> {
    match result {
        Ok(HistoryOutcome::Loaded(0)) => Some("No previous messages."),
        Ok(HistoryOutcome::Loaded(_)) | Err(_) => None,
        Ok(HistoryOutcome::Skipped(reason)) => skip_notice(*reason),
    }
}

fn print_outcome(outcome: SendOutcome) {
    match outcome {
        SendOutcome::Delivered { reply, .. } => print_turn(&reply),
        SendOutcome::Failed { notice, error, .. } => {
            tracing::debug!("Send failed: {}", error);
            println!("{} {}", notice.title.red().bold(), notice.description);
        }
        SendOutcome::Skipped(reason) => print_skip(reason),
    }
}

fn print_skip(reason: SkipReason) {
    if let Some(text) = skip_notice(reason) {
        println!("{}", text.yellow());
    }
}

fn skip_notice(reason: SkipReason) -> Option<&'static str> {
    match reason {
        SkipReason::EmptyInput | SkipReason::ScopeChanged => None,
        SkipReason::Busy => Some("Still waiting for the previous reply."),
        SkipReason::NoUserScope => Some("Set a user first: /user <id>"),
    }
}

fn print_turn(turn: &ChatTurn) {
    let time = turn.timestamp.format("%H:%M").to_string();
    if turn.is_user {
        println!("{} {} {}", time.dimmed(), "you".green().bold(), turn.message);
    } else {
        println!("{} {} {}", time.dimmed(), "assistant".cyan().bold(), turn.message);
    }
}

fn print_repl_help() {
    println!("{}", "Commands:".bold());
    println!("  /temp <0.0-1.0>     Set the sampling temperature");
    println!("  /house <1-6>        Switch house and refresh the context");
    println!("  /appliance <name>   Filter: all, {}", appliance_names());
    println!("  /refresh            Re-fetch dashboard data");
    println!("  /history            Reload the stored transcript");
    println!("  /user <id>          Switch user (clears the transcript)");
    println!("  /quit               Leave the chat");
}

fn appliance_names() -> String {
    nilm::ApplianceKind::ALL
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================
// Dashboard rendering
// ============================================

fn print_dashboard(house: &str, appliance: &str, rows: &[ApplianceRecord]) {
    let overview = DashboardOverview::from_rows(rows);

    println!(
        "{} House {} ({}), {} samples",
        "Energy Overview:".bold(),
        house.cyan(),
        appliance,
        overview.sample_count
    );
    println!("  Total Power:      {}", overview.power_label().cyan());
    println!("  Daily Cost:       {}", overview.cost_label().cyan());
    println!("  Avg Efficiency:   {}", overview.efficiency_label().cyan());
    println!("  Active Devices:   {}", overview.active_devices);

    if rows.is_empty() {
        println!("\n{}", "No telemetry for this selection.".dimmed());
        return;
    }

    println!("\n{}", "Appliances:".bold());
    for row in rows.iter().take(10) {
        println!(
            "  {:<14} {:>8} kW  {:>5}%  {}",
            row.appliance_name,
            nilm::domain::to_fixed(row.power_or_zero(), 2),
            nilm::domain::to_fixed(row.efficiency_or_zero(), 0),
            colored_status(row)
        );
    }

    println!("\n{}", "Efficiency:".bold());
    for bar in efficiency_breakdown(rows) {
        println!(
            "  {:<14} {:>5}%  ${}/yr",
            bar.label,
            nilm::domain::to_fixed(bar.efficiency, 0),
            nilm::domain::plain_number(bar.savings)
        );
    }

    let timeline = power_timeline(rows);
    if let (Some(first), Some(last)) = (timeline.first(), timeline.last()) {
        println!(
            "\n{} {} points, {} to {}",
            "Power Timeline:".bold(),
            timeline.len(),
            first.timestamp.format("%H:%M"),
            last.timestamp.format("%H:%M")
        );
    }

    let hints = recommendations(rows);
    if !hints.is_empty() {
        println!("\n{}", "Recommendations:".bold());
        for hint in hints {
            println!("  {} {}", "•".yellow(), hint);
        }
    }
}

fn colored_status(row: &ApplianceRecord) -> colored::ColoredString {
    let status = row.status.as_str();
    match row.status_class() {
        StatusClass::Active => status.green(),
        StatusClass::Standby => status.yellow(),
        StatusClass::Off => status.red(),
        StatusClass::Unknown => status.dimmed(),
    }
}
