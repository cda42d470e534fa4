use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_DATA: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive leaderboard (default if no subcommand)
    Tui,
    /// Print the ranked standings and exit
    List,
    /// Open the hosted leaderboard site in the browser
    Open,
    /// Write a sample config file to edit
    Init,
    /// Remove all cached documents
    ClearCache,
}

#[derive(Parser, Debug)]
#[command(name = "placar")]
#[command(about = "Themed leaderboard for church youth groups", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/placar/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Bypass the document cache and fetch fresh data
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    let start_time = Instant::now();

    // Commands that need no config or data
    match command {
        Commands::Init => {
            let path = cli.config.clone().map(PathBuf::from);
            match placar::config::write_sample_config(path) {
                Ok(written) => {
                    println!("Config written to {}", written.display());
                    println!("Edit it and run `placar` to get started.");
                    std::process::exit(EXIT_SUCCESS);
                }
                Err(e) => {
                    eprintln!("Init error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
        Commands::ClearCache => {
            if let Err(e) = placar::data::cache::clear_cache() {
                eprintln!("Failed to clear cache: {}", e);
                std::process::exit(EXIT_RUNTIME);
            }
            println!("Cache cleared.");
            std::process::exit(EXIT_SUCCESS);
        }
        _ => {}
    }

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match placar::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = placar::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if cli.verbose {
        eprintln!("Loaded config for {}", config.app.name);
    }

    // Open needs the config but no data
    if let Commands::Open = command {
        match placar::browser::open_site(&config) {
            Ok(url) => {
                println!("Abrindo {}", url);
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Failed to open browser: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    let max_age = humantime::parse_duration(&config.data.cache_max_age)
        .unwrap_or(std::time::Duration::from_secs(3600));
    let cache_config = placar::data::CacheConfig {
        enabled: !cli.no_cache,
        max_age,
    };

    // Fetch the snapshot documents
    let snapshot = match placar::data::load_snapshot(&config, &cache_config, cli.verbose).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Failed to load data: {}", e);
            let code = if config.data.dir.is_some() {
                EXIT_DATA
            } else {
                EXIT_NETWORK
            };
            std::process::exit(code);
        }
    };

    for warning in &snapshot.warnings {
        eprintln!("Warning: {}", warning);
    }

    if cli.verbose {
        eprintln!(
            "Loaded {} participants and {} rules in {:?}",
            snapshot.leaderboard.participants.len(),
            snapshot.leaderboard.rules.len(),
            start_time.elapsed()
        );
    }

    // Load UI preferences (best effort)
    let prefs_path = placar::prefs::get_prefs_path();
    let prefs = match placar::prefs::load_prefs(&prefs_path) {
        Ok(prefs) => prefs,
        Err(e) => {
            eprintln!("Warning: {}", e);
            placar::prefs::Prefs::new()
        }
    };

    match command {
        Commands::List => {
            let default_version = snapshot
                .verses
                .as_ref()
                .map(|verses| verses.default_version.clone())
                .unwrap_or_else(|| "NVI".to_string());
            let version = prefs.effective_version(&default_version);

            let standings = placar::scoring::rank_participants(
                &snapshot.leaderboard.participants,
                &snapshot.leaderboard.rules,
                snapshot.verses.as_ref(),
                version,
                snapshot.games.as_ref(),
                snapshot.bonus.as_ref(),
            );

            let use_colors = placar::output::should_use_colors();
            if cli.verbose {
                // Verbose mode: one block per participant with the breakdown
                for standing in &standings {
                    println!(
                        "{}",
                        placar::output::format_standing_detail(standing, use_colors)
                    );
                    println!();
                }
            } else {
                println!(
                    "{}",
                    placar::output::format_standings_table(&standings, use_colors)
                );
            }
        }
        Commands::Tui => {
            let theme = placar::tui::resolve_theme(config.theme.as_ref());
            let today = chrono::Local::now().date_naive();
            let app = placar::tui::App::new(
                config,
                cache_config,
                snapshot,
                prefs,
                prefs_path,
                theme,
                today,
                cli.verbose,
            );
            if let Err(e) = placar::tui::run_tui(app).await {
                eprintln!("TUI error: {}", e);
                std::process::exit(EXIT_RUNTIME);
            }
        }
        // Handled above
        Commands::Open | Commands::Init | Commands::ClearCache => unreachable!(),
    }

    std::process::exit(EXIT_SUCCESS);
}
