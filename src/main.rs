//! repcount - Exercise repetition counter

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use repcount::driver::{self, Command};
use repcount::landmarks::PoseResults;
use repcount::{Database, ExerciseVariant, PoseLandmarks, PushupDifficulty, Workout};

#[derive(Parser)]
#[command(name = "repcount")]
#[command(author, version, about = "Count squats and push-ups from pose landmarks")]
struct Cli {
    /// SQLite database for finished sessions
    #[arg(long, env = "REPCOUNT_DB", default_value = "repcount.db")]
    db: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Count reps in a recorded pose stream (one JSON pose result per line)
    Replay {
        /// Recording to play back
        file: PathBuf,

        /// Exercise variant: full-body, upper-body or pushup
        #[arg(short, long, default_value = "full-body")]
        variant: ExerciseVariant,

        /// Push-up difficulty level (1-3)
        #[arg(short, long, default_value = "1")]
        level: u8,

        /// Playback rate in frames per second
        #[arg(long, default_value = "30")]
        fps: u32,
    },

    /// List saved sessions
    List {
        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show totals per exercise variant
    Stats,

    /// Delete a saved session
    Delete {
        /// Session id
        id: i64,
    },
}

/// Parse a recording. Lines without a body become empty frames.
fn load_recording(path: &Path) -> Result<Vec<PoseLandmarks>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let mut frames = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<PoseResults>(line) {
            Ok(results) => frames.push(results.landmarks().unwrap_or_default()),
            Err(e) => warn!("Line {}: not a pose result ({})", lineno + 1, e),
        }
    }
    Ok(frames)
}

async fn replay(
    db: Database,
    file: PathBuf,
    variant: ExerciseVariant,
    level: u8,
    fps: u32,
) -> Result<()> {
    let Some(difficulty) = PushupDifficulty::from_level(level) else {
        bail!("difficulty level must be 1, 2 or 3 (got {})", level);
    };
    if fps == 0 {
        bail!("fps must be positive");
    }

    let frames = load_recording(&file)?;
    println!("Replaying {} frames as {} at {} fps", frames.len(), variant.label(), fps);

    let mut workout = Workout::new(db);
    workout.set_difficulty(difficulty);
    workout.start(variant)?;

    let (tx, rx) = driver::channel();
    let period = Duration::from_secs_f64(1.0 / fps as f64);
    let producer = tokio::spawn(async move {
        let mut pacing = tokio::time::interval(period);
        for pose in frames {
            pacing.tick().await;
            if tx.send(Command::Frame(pose)).await.is_err() {
                break;
            }
        }
        let _ = tx.send(Command::End).await;
    });

    let summary = driver::run(&mut workout, rx).await?;
    producer.await?;

    println!("{:-<40}", "");
    println!("Frames: {} ({} skipped)", summary.frames, summary.skipped);
    println!("Reps: {}", summary.reps);
    for session in workout.saved_sessions() {
        println!("Saved session {} ({} x{})", session.id, session.variant, session.count);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let db = Database::open(&cli.db)?;

    match cli.command {
        Some(Commands::Replay { file, variant, level, fps }) => {
            replay(db, file, variant, level, fps).await?;
        }

        Some(Commands::Stats) => {
            println!("Totals");
            println!("{:-<40}", "");
            for total in db.totals_by_variant()? {
                println!(
                    "{:20} | {:3} sessions | {:5} reps",
                    total.variant.label(),
                    total.sessions,
                    total.reps
                );
            }
        }

        Some(Commands::Delete { id }) => {
            if db.delete_session(id)? {
                println!("Deleted session {}", id);
            } else {
                println!("No session with id {}", id);
            }
        }

        Some(Commands::List { limit }) => list(&db, limit)?,

        None => list(&db, 10)?,
    }

    Ok(())
}

fn list(db: &Database, limit: usize) -> Result<()> {
    let sessions = db.get_sessions()?;
    println!("Recent sessions:");
    println!("{:-<60}", "");
    for s in sessions.iter().take(limit) {
        println!(
            "{:4} | {} | {:20} | {}",
            s.id,
            s.timestamp.format("%Y-%m-%d %H:%M"),
            s.variant.label(),
            s.count
        );
    }
    Ok(())
}
