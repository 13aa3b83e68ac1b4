//! QuestKV CLI
//!
//! Command-line interface for inspecting and maintaining a QuestKV data
//! directory.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use questkv::{Config, SharedStore};

/// QuestKV CLI
#[derive(Parser, Debug)]
#[command(name = "questkv-cli")]
#[command(about = "Inspect and maintain a QuestKV data directory")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./questkv_data")]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show collection sizes
    Stats {
        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// List all exercises
    Exercises,

    /// List all quests
    Quests,

    /// Look up a user by email
    User {
        /// The email to look up
        email: String,
    },

    /// Pop the next quest from the priority queue
    NextQuest,

    /// Verify that the store round-trips through its snapshot files
    Verify,

    /// Delete all data and re-seed the sample content
    Clear {
        /// Required confirmation flag
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,questkv=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    tracing::info!("QuestKV v{}", questkv::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);

    let config = Config::builder().data_dir(&args.data_dir).build();

    let store = match SharedStore::open(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&store, args.command) {
        if e.is_recoverable() {
            eprintln!("{}", e);
            std::process::exit(2);
        }
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

fn run(store: &SharedStore, command: Commands) -> questkv::Result<()> {
    match command {
        Commands::Stats { json } => {
            let stats = store.stats();
            if json {
                print_json(&stats);
            } else {
                println!("exercises:    {}", stats.exercises);
                println!("users:        {}", stats.users);
                println!("workouts:     {}", stats.workouts);
                println!("quests:       {}", stats.quests);
                println!("email index:  {}", stats.email_index);
                println!("graph edges:  {}", stats.graph_edges);
                println!("quest queue:  {}", stats.quest_queue);
            }
        }

        Commands::Exercises => {
            let exercises = store.with(|s| s.get_all_exercises());
            for exercise in exercises {
                println!(
                    "{}  {}  ({:?}/{:?}, {} kcal/min)",
                    exercise.id,
                    exercise.name,
                    exercise.kind,
                    exercise.difficulty,
                    exercise.calories_per_minute
                );
            }
        }

        Commands::Quests => {
            let quests = store.with(|s| s.get_all_quests());
            for quest in quests {
                println!(
                    "{}  {}  (priority {}, {})",
                    quest.id,
                    quest.title,
                    quest.priority,
                    if quest.completed { "completed" } else { "open" }
                );
            }
        }

        Commands::User { email } => {
            let user = store.with(|s| s.get_user_by_email(&email))?;
            print_json(&user);
        }

        Commands::NextQuest => {
            let quest = store.with(|s| s.get_next_quest())?;
            println!("{}  {}  (priority {})", quest.id, quest.title, quest.priority);
        }

        Commands::Verify => {
            if store.verify_persistence()? {
                println!("OK: snapshots round-trip cleanly");
            } else {
                println!("MISMATCH: reloaded store differs from in-memory state");
                std::process::exit(1);
            }
        }

        Commands::Clear { force } => {
            if !force {
                eprintln!("refusing to clear without --force");
                std::process::exit(2);
            }
            store.with(|s| s.clear_all_data());
            println!("cleared and re-seeded");
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::error!("JSON encoding failed: {}", e);
            std::process::exit(1);
        }
    }
}
