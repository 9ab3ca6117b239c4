use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use league_scout::api::state::AppState;
use league_scout::cache::CachedStore;
use league_scout::config::AppConfig;
use league_scout::format;
use league_scout::models::{GameRecord, LikelyPlayer, PlayerSummary, StrengthSummary};
use league_scout::storage::{FactStore, JsonlFactStore, JsonlReader, StorageConfig};
use league_scout::strategy::{
    self, with_deadline, Contender, MatchupResult, PlayerOptions, PlayerResult, RecommendOptions,
    RecommendResult, ScoutOptions, ScoutResult,
};

#[derive(Parser)]
#[command(name = "league-scout")]
#[command(about = "Pinball league strategy: scouting, matchups and machine picks")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print results as JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scout a team's strengths and weaknesses by machine
    Scout {
        /// Team key (e.g. "CRA")
        team: String,

        /// Only machines at this venue
        #[arg(long)]
        venue: Option<String>,
    },

    /// Profile a single player
    Player {
        /// Player name
        name: String,

        /// Only machines at this venue
        #[arg(long)]
        venue: Option<String>,
    },

    /// Compare two teams machine by machine at a venue
    Matchup {
        /// Venue key
        venue: String,

        /// First team key
        team1: String,

        /// Second team key
        team2: String,
    },

    /// Rank a team's players on one machine
    Recommend {
        /// Team key
        team: String,

        /// Machine key (e.g. "TAF")
        machine: String,

        /// Scope to games at this venue
        #[arg(long)]
        venue: Option<String>,

        /// Compare against this team's best
        #[arg(long)]
        opponent: Option<String>,
    },

    /// List current-season teams
    Teams {
        /// Case-insensitive key/name filter
        search: Option<String>,
    },

    /// List current-season players and their teams
    Players {
        /// Case-insensitive player name, team key or team name filter
        search: Option<String>,
    },

    /// List venues
    Venues {
        /// Case-insensitive key/name filter
        search: Option<String>,
    },

    /// List machines with recorded games
    Machines {
        /// Case-insensitive key/name filter
        search: Option<String>,
    },

    /// Append game records from a JSONL file to the data lake
    Import {
        /// JSONL file with one game record per line
        file: PathBuf,
    },

    /// Start the API server
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the config file)
        #[arg(long)]
        port: Option<u16>,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone();
    }

    // Initialize tracing. Logs go to stderr so --json output stays parseable.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting league-scout v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());
    let timeout = config.query.timeout();
    let json = cli.json;

    match cli.command {
        Commands::Scout { team, venue } => {
            let store = open_store(storage)?;
            let options = ScoutOptions { venue };
            let result = with_deadline(timeout, strategy::scout(&store, &team, &options)).await?;
            emit(json, &result, print_scout)?;
        }
        Commands::Player { name, venue } => {
            let store = open_store(storage)?;
            let options = PlayerOptions { venue };
            let result = with_deadline(timeout, strategy::player(&store, &name, &options)).await?;
            emit(json, &result, print_player)?;
        }
        Commands::Matchup {
            venue,
            team1,
            team2,
        } => {
            if team1 == team2 {
                anyhow::bail!("Cannot match {} against itself", team1);
            }
            let store = open_store(storage)?;
            let result =
                with_deadline(timeout, strategy::matchup(&store, &venue, &team1, &team2)).await?;
            emit(json, &result, print_matchup)?;
        }
        Commands::Recommend {
            team,
            machine,
            venue,
            opponent,
        } => {
            let store = open_store(storage)?;
            let options = RecommendOptions { venue, opponent };
            let result = with_deadline(
                timeout,
                strategy::recommend(&store, &team, &machine, &options),
            )
            .await?;
            emit(json, &result, print_recommend)?;
        }
        Commands::Teams { search } => {
            let store = open_store(storage)?;
            let teams = store.list_teams(search.as_deref().unwrap_or("")).await?;
            emit(json, &teams, |teams| {
                for team in teams {
                    let venue = team.venue.as_deref().unwrap_or("-");
                    println!("{:<6} {:<32} {}", team.key, team.name, venue);
                }
            })?;
        }
        Commands::Players { search } => {
            let store = open_store(storage)?;
            let players = store.list_players(search.as_deref().unwrap_or("")).await?;
            emit(json, &players, |players| {
                for player in players {
                    println!("{}", player_line(player));
                }
            })?;
        }
        Commands::Venues { search } => {
            let store = open_store(storage)?;
            let venues = store.list_venues(search.as_deref().unwrap_or("")).await?;
            emit(json, &venues, |venues| {
                for venue in venues {
                    println!("{:<6} {}", venue.key, venue.name);
                }
            })?;
        }
        Commands::Machines { search } => {
            let store = open_store(storage)?;
            let machines = store.list_machines(search.as_deref().unwrap_or("")).await?;
            emit(json, &machines, |machines| {
                for machine in machines {
                    println!("{:<8} {}", machine.key, machine.name);
                }
            })?;
        }
        Commands::Import { file } => {
            if !file.exists() {
                anyhow::bail!("Import file not found: {}", file.display());
            }
            std::fs::create_dir_all(&storage.data_dir)?;
            let store = JsonlFactStore::open(storage)?;

            let games: Vec<GameRecord> = JsonlReader::new(file.clone()).read_all()?;
            tracing::info!("Read {} game records from {}", games.len(), file.display());

            let summary = store.import_games(games)?;
            emit(json, &summary, |summary| {
                println!("Read:       {}", summary.read);
                println!("Imported:   {}", summary.imported);
                println!("Duplicates: {}", summary.duplicates);
                if !summary.seasons.is_empty() {
                    let seasons: Vec<String> =
                        summary.seasons.iter().map(|s| s.to_string()).collect();
                    println!("Seasons:    {}", seasons.join(", "));
                }
            })?;
        }
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let store = Arc::new(CachedStore::load(open_store(storage)?).await?);

            if let Some(interval) = config.cache.refresh_interval() {
                let store = Arc::clone(&store);
                tracing::info!("Refreshing reference cache every {:?}", interval);
                tokio::spawn(async move {
                    let mut ticker = tokio::time::interval(interval);
                    // The first tick fires immediately; the cache was just loaded.
                    ticker.tick().await;
                    loop {
                        ticker.tick().await;
                        if let Err(e) = store.refresh().await {
                            tracing::warn!("Reference cache refresh failed: {}", e);
                        }
                    }
                });
            }

            let state = AppState {
                store,
                query_timeout: timeout,
            };
            let mut app = league_scout::api::build_router(state, &config.server.cors_origin);
            if access_log {
                app = app.layer(TraceLayer::new_for_http());
            }

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn open_store(storage: StorageConfig) -> Result<JsonlFactStore> {
    let dir = storage.data_dir.display().to_string();
    JsonlFactStore::open(storage).with_context(|| format!("Failed to open data lake at {}", dir))
}

/// Print `value` as pretty JSON or with the given text renderer.
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

fn player_line(player: &PlayerSummary) -> String {
    format!("{:<24} {:<6} {}", player.name, player.team_key, player.team)
}

fn likely_names(players: &[LikelyPlayer]) -> String {
    players
        .iter()
        .map(|p| format!("{} ({})", p.name, p.games))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_summary(summary: &StrengthSummary) {
    if !summary.strongest.is_empty() {
        println!("Strongest: {}", summary.strongest.join(", "));
    }
    if !summary.weakest.is_empty() {
        println!("Weakest:   {}", summary.weakest.join(", "));
    }
}

fn print_scout(result: &ScoutResult) {
    let scope = result.venue.as_deref().unwrap_or("all venues");
    println!("Scouting {} ({})", result.team, scope);

    let sections = result
        .venue_stats
        .iter()
        .map(|rows| ("At venue", rows.as_slice()))
        .chain(std::iter::once(("Anywhere", result.global_stats.as_slice())));

    for (title, rows) in sections {
        println!("\n{}", title);
        println!(
            "  {:<28} {:>5} {:>8} {:>8} {:>8} {:<8} Likely",
            "Machine", "Games", "P50", "P90", "League", "vs avg"
        );
        for row in rows {
            let marker = if row.no_venue_data { "*" } else { " " };
            println!(
                " {}{:<28} {:>5} {:>8} {:>8} {:>8} {:<8} {}",
                marker,
                row.machine_name,
                row.games,
                format::score(row.p50),
                format::score(row.p90),
                format::score(row.league_p50),
                format::relative_strength(row.p50, row.league_p50),
                likely_names(&row.likely_players)
            );
        }
    }

    if result.global_stats.iter().any(|r| r.no_venue_data) {
        println!("\n* no games at the venue");
    }
    println!();
    print_summary(&result.analysis);
}

fn print_player(result: &PlayerResult) {
    let team = result
        .team
        .as_ref()
        .map(|t| format!(" - {} ({})", t.name, t.key))
        .unwrap_or_default();
    let scope = result.venue.as_deref().unwrap_or("all venues");
    println!("{}{} ({})", result.name, team, scope);

    let sections = result
        .venue_stats
        .iter()
        .map(|rows| ("At venue", rows.as_slice()))
        .chain(std::iter::once(("Anywhere", result.global_stats.as_slice())));

    for (title, rows) in sections {
        println!("\n{}", title);
        println!(
            "  {:<28} {:>5} {:>8} {:>8} {:>8} vs avg",
            "Machine", "Games", "P50", "P90", "League"
        );
        for row in rows {
            let marker = if row.no_venue_data { "*" } else { " " };
            println!(
                " {}{:<28} {:>5} {:>8} {:>8} {:>8} {}",
                marker,
                row.machine_name,
                row.games,
                format::score(row.p50),
                format::score(row.p90),
                format::score(row.league_p50),
                format::relative_strength(row.p50, row.league_p50)
            );
        }
    }

    if result.global_stats.iter().any(|r| r.no_venue_data) {
        println!("\n* no games at the venue");
    }
    println!();
    print_summary(&result.analysis);
}

fn print_matchup(result: &MatchupResult) {
    println!("{} vs {} at {}\n", result.team1, result.team2, result.venue);
    println!(
        "{:<28} {:>8} {:>8} {:>8} {:>8}  Edge",
        "Machine",
        format!("{} P50", result.team1),
        "likely",
        format!("{} P50", result.team2),
        "likely"
    );

    let p50 = |value: Option<f64>| value.map(format::score).unwrap_or_else(|| "-".to_string());
    for row in &result.machines {
        println!(
            "{:<28} {:>8} {:>8} {:>8} {:>8}  {}",
            row.machine_name,
            p50(row.team1_p50),
            format::score(row.team1_likely),
            p50(row.team2_p50),
            format::score(row.team2_likely),
            format::edge(&row.edge, row.confidence, &result.team1, &result.team2)
        );
    }

    let analysis = &result.analysis;
    println!();
    println!("{} advantages: {}", result.team1, analysis.team1_advantages.join(", "));
    println!("{} advantages: {}", result.team2, analysis.team2_advantages.join(", "));
    println!("Contested: {}", analysis.contested.join(", "));
    println!("\n{}", format::CONFIDENCE_LEGEND);
}

fn print_contenders(title: &str, contenders: &[Contender]) {
    println!("{}", title);
    if contenders.is_empty() {
        println!("  (no games)");
        return;
    }
    for c in contenders {
        let marker = if c.no_venue_data { "*" } else { " " };
        println!(
            " {}{:<24} {:>5} {:>8} {:>8} {}",
            marker,
            c.name,
            c.games,
            format::score(c.p50),
            format::score(c.p90),
            format::relative_strength(c.p50, c.league_p50)
        );
    }
}

fn print_recommend(result: &RecommendResult) {
    println!(
        "{} on {} ({}), league P50 {}",
        result.team,
        result.machine_name,
        result.machine,
        format::score(result.league_p50)
    );

    let sides = std::iter::once(&result.ours).chain(result.theirs.as_ref());
    for lists in sides {
        println!();
        if let Some(venue) = &lists.venue {
            print_contenders(&format!("{} at venue", lists.team), venue);
        }
        print_contenders(&format!("{} anywhere", lists.team), &lists.global);
    }

    if let Some(assessment) = &result.assessment {
        println!(
            "\n{} vs {}: {} ({})",
            assessment.our_best,
            assessment.their_best,
            assessment.verdict,
            format::score_diff(assessment.diff)
        );
    }
}
