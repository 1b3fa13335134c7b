use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use brawler_core::*;
use clap::{Parser, Subcommand, ValueEnum};

/// 99 seconds at 60 Hz.
const DEFAULT_MAX_TICKS: u32 = 99 * TICK_RATE;

#[derive(Parser)]
#[command(name = "brawler")]
#[command(about = "Headless sparring and training for the brawler opponent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play rounds against a scripted sparring partner, learning as it goes
    Spar {
        /// Match config JSON; flags below override its fields
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        seed: Option<u64>,

        /// Opponent tier
        #[arg(long, value_enum)]
        difficulty: Option<Tier>,

        /// Opponent policy
        #[arg(long, value_enum)]
        kind: Option<Kind>,

        /// Who drives the player side
        #[arg(long, value_enum, default_value = "medium")]
        partner: Partner,

        /// Rounds to play; the opponent keeps its table between rounds
        #[arg(long, default_value_t = 1)]
        episodes: u32,

        /// Round length cap in ticks
        #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
        max_ticks: u32,

        /// Start the tabular opponent from a saved table
        #[arg(long)]
        load: Option<PathBuf>,

        /// Save the tabular opponent's table after the last round
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Print the greedy action per state of a saved table
    Inspect {
        #[arg(required = true)]
        table: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Tier {
    Easy,
    Medium,
    Hard,
}

impl From<Tier> for Difficulty {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Easy => Difficulty::Easy,
            Tier::Medium => Difficulty::Medium,
            Tier::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Tabular,
    Scripted,
}

impl From<Kind> for PolicyKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Tabular => PolicyKind::Tabular,
            Kind::Scripted => PolicyKind::Scripted,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Partner {
    Idle,
    Easy,
    Medium,
    Hard,
}

fn load_config(path: Option<&Path>) -> Result<MatchConfig> {
    let Some(path) = path else {
        return Ok(MatchConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("failed to parse config {}", path.display()))
}

fn load_table(path: &Path) -> Result<ValueTable> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read table {}", path.display()))?;
    let snapshot = TableSnapshot::from_json(&json)
        .with_context(|| format!("failed to parse table {}", path.display()))?;
    ValueTable::from_snapshot(&snapshot).with_context(|| format!("cannot load {}", path.display()))
}

/// The player side, driven by the scripted policy seen from the player's seat.
fn partner_input(partner: Option<&mut ScriptedReflex>, m: &Match) -> PlayerInput {
    let Some(partner) = partner else {
        return NULL_INPUT;
    };
    let (me, other) = (m.player(), m.opponent());
    partner.select_action(&discretize(me, other), me, other).to_input()
}

#[allow(clippy::too_many_arguments)]
fn run_spar(
    config: Option<PathBuf>,
    seed: Option<u64>,
    difficulty: Option<Tier>,
    kind: Option<Kind>,
    partner: Partner,
    episodes: u32,
    max_ticks: u32,
    load: Option<PathBuf>,
    save: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config.as_deref())?;
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(difficulty) = difficulty {
        config.opponent.difficulty = difficulty.into();
    }
    if let Some(kind) = kind {
        config.opponent.kind = kind.into();
    }

    let mut m = match &load {
        Some(path) => {
            anyhow::ensure!(
                config.opponent.kind == PolicyKind::Tabular,
                "--load needs the tabular opponent"
            );
            let table = load_table(path)?;
            eprintln!("Loaded {} states from {}", table.len(), path.display());
            let policy = QLearner::with_table(config.opponent.difficulty, config.seed, table);
            Match::with_policy(config.clone(), Box::new(policy))
        }
        None => Match::new(config.clone()),
    };

    // Offset the partner's seed so both sides don't share a random stream
    let partner_seed = config.seed.wrapping_add(1);
    let mut partner = match partner {
        Partner::Idle => None,
        Partner::Easy => Some(ScriptedReflex::new(Difficulty::Easy, config.rules, partner_seed)),
        Partner::Medium => Some(ScriptedReflex::new(Difficulty::Medium, config.rules, partner_seed)),
        Partner::Hard => Some(ScriptedReflex::new(Difficulty::Hard, config.rules, partner_seed)),
    };

    eprintln!(
        "Sparring {} ({:?}) for {} round(s)...",
        m.policy().name(),
        m.policy().difficulty(),
        episodes
    );
    let start = Instant::now();
    let mut rounds = Vec::new();
    let (mut player_wins, mut opponent_wins) = (0u32, 0u32);

    for episode in 0..episodes {
        if episode > 0 {
            m.reset();
            if let Some(p) = partner.as_mut() {
                p.on_reset();
            }
        }
        let mut reward = 0.0;
        while !m.outcome().is_over() && m.tick() < max_ticks {
            let input = partner_input(partner.as_mut(), &m);
            reward += m.step(input).reward;
        }
        match m.outcome() {
            Outcome::PlayerWon => player_wins += 1,
            Outcome::OpponentWon => opponent_wins += 1,
            Outcome::Ongoing => {}
        }
        log::info!(
            "round {}: {:?} after {} ticks, opponent reward {:.1}",
            episode + 1,
            m.outcome(),
            m.tick(),
            reward
        );
        rounds.push(serde_json::json!({
            "round": episode + 1,
            "outcome": m.outcome(),
            "ticks": m.tick(),
            "opponent_reward": reward,
            "stats": m.stats(),
            "final": m.snapshot(),
            "transcript_hash": hex::encode(hash_transcript(m.transcript())),
        }));
    }
    eprintln!("Played {} round(s) in {:.1}s", episodes, start.elapsed().as_secs_f64());

    if let Some(path) = &save {
        let table = m
            .value_table()
            .context("--save needs the tabular opponent")?;
        fs::write(path, table.to_snapshot().to_json()?)
            .with_context(|| format!("failed to write table {}", path.display()))?;
        eprintln!("Saved {} states to {}", table.len(), path.display());
    }

    let summary = serde_json::json!({
        "opponent": m.policy().name(),
        "difficulty": m.policy().difficulty(),
        "player_wins": player_wins,
        "opponent_wins": opponent_wins,
        "unfinished": episodes - player_wins - opponent_wins,
        "table_hash": m.value_table().map(|t| hex::encode(hash_table(t))),
        "rounds": rounds,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_inspect(path: &Path) -> Result<()> {
    let table = load_table(path)?;
    println!("{} states, hash {}", table.len(), hex::encode(hash_table(&table)));
    for (state, values) in table.iter() {
        let (best, value) = Action::ALL
            .iter()
            .map(|&a| (a, values.get(a)))
            .fold((Action::Idle, f64::NEG_INFINITY), |acc, cur| {
                if cur.1 > acc.1 {
                    cur
                } else {
                    acc
                }
            });
        println!("{:<28} {:<13} {:>8.2}", state.label(), best.name(), value);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Spar {
            config,
            seed,
            difficulty,
            kind,
            partner,
            episodes,
            max_ticks,
            load,
            save,
        } => run_spar(
            config, seed, difficulty, kind, partner, episodes, max_ticks, load, save,
        ),
        Commands::Inspect { table } => run_inspect(&table),
    }
}
