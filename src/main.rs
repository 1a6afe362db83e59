//! Fleet Commit CLI
//!
//! Commits to a hidden board and later derives the ordered hit claims from
//! that commitment.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use fleet_commit::{
    config::BoardConfig,
    core::coord::Coordinate,
    proof::{canonicalize_segments, commit_board, BoardCommitment, ProofIndex},
    storage::{read_board, read_json, write_json},
    VERSION,
};

/// Merkle commitments and hit claims for battleship boards
#[derive(Parser)]
#[command(name = "fleet-commit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Commit to a hidden battleship board and derive ordered hit claims", long_about = None)]
struct Cli {
    /// Number of rows (default: FLEET_ROWS or 10)
    #[arg(long, global = true)]
    rows: Option<usize>,

    /// Number of columns (default: FLEET_COLUMNS or 10)
    #[arg(long, global = true)]
    columns: Option<usize>,

    /// Required number of ship cells (default: FLEET_SHIP_CELLS or 20)
    #[arg(long, global = true)]
    ship_cells: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the board commitment and write every proof
    Commit {
        /// Board matrix, indexed [row][column]
        #[arg(short, long, default_value = "data/input.json")]
        input: PathBuf,

        /// Commitment output ({ root, proofs })
        #[arg(short, long, default_value = "data/output.json")]
        output: PathBuf,

        /// Also write the standard-v1 tree dump
        #[arg(long)]
        tree: Option<PathBuf>,
    },

    /// Order the hit proofs of a commitment into ship runs
    Claim {
        /// Commitment written by `commit`
        #[arg(short, long, default_value = "data/output.json")]
        commitment: PathBuf,

        /// Claim output ({ sortedProofs, coordinateNumbers, coordinateLiterals })
        #[arg(short, long, default_value = "data/output_claim.json")]
        output: PathBuf,
    },

    /// Check one coordinate's proof against the commitment root
    Verify {
        /// Commitment written by `commit`
        #[arg(short, long, default_value = "data/output.json")]
        commitment: PathBuf,

        /// Coordinate key, e.g. 3-C
        #[arg(short = 'k', long)]
        coordinate: Coordinate,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let cli = Cli::parse();
    let config = board_config(&cli)?;

    info!("Fleet Commit v{}", VERSION);
    info!(
        "Board: {} rows x {} columns, {} ship cells",
        config.rows, config.columns, config.ship_cells
    );

    match cli.command {
        Commands::Commit { input, output, tree } => run_commit(&config, input, output, tree),
        Commands::Claim { commitment, output } => run_claim(&config, commitment, output),
        Commands::Verify {
            commitment,
            coordinate,
        } => run_verify(commitment, coordinate),
    }
}

fn board_config(cli: &Cli) -> Result<BoardConfig> {
    let mut config = BoardConfig::from_env();
    if let Some(rows) = cli.rows {
        config.rows = rows;
    }
    if let Some(columns) = cli.columns {
        config.columns = columns;
    }
    if let Some(ship_cells) = cli.ship_cells {
        config.ship_cells = ship_cells;
    }
    config.validate().context("invalid board configuration")?;
    Ok(config)
}

fn run_commit(
    config: &BoardConfig,
    input: PathBuf,
    output: PathBuf,
    tree_path: Option<PathBuf>,
) -> Result<()> {
    let grid = read_board(&input, config)
        .with_context(|| format!("failed to load board from {}", input.display()))?;
    let (tree, index) = commit_board(&grid).context("failed to commit board")?;

    info!("Board Root: {}", index.root());

    write_json(&output, &index.to_commitment())
        .with_context(|| format!("failed to write commitment to {}", output.display()))?;
    info!("Wrote {} proofs to {}", index.len(), output.display());

    if let Some(path) = tree_path {
        write_json(&path, &tree.dump())
            .with_context(|| format!("failed to write tree dump to {}", path.display()))?;
        info!("Wrote tree dump to {}", path.display());
    }

    Ok(())
}

fn run_claim(config: &BoardConfig, commitment: PathBuf, output: PathBuf) -> Result<()> {
    let stored: BoardCommitment = read_json(&commitment)
        .with_context(|| format!("failed to load commitment from {}", commitment.display()))?;
    let index = ProofIndex::from_commitment(stored);

    let (bundle, segments) =
        canonicalize_segments(&index, config).context("failed to order hit claims")?;
    bundle
        .verify_against(&index.root())
        .context("claim bundle does not verify against the commitment root")?;

    for segment in &segments {
        info!(
            "Ship at {}: {} cells",
            segment.origin,
            segment.cell_count()
        );
    }

    write_json(&output, &bundle)
        .with_context(|| format!("failed to write claims to {}", output.display()))?;
    info!("Wrote {} claims to {}", bundle.len(), output.display());

    Ok(())
}

fn run_verify(commitment: PathBuf, coordinate: Coordinate) -> Result<()> {
    let stored: BoardCommitment = read_json(&commitment)
        .with_context(|| format!("failed to load commitment from {}", commitment.display()))?;
    let index = ProofIndex::from_commitment(stored);

    let hit = index.get(coordinate)?.hit;
    if !index.verify(coordinate)? {
        warn!("Proof for {} does NOT verify against {}", coordinate, index.root());
        bail!("proof for {} is invalid", coordinate);
    }

    info!(
        "{} is a {} (proof verified against {})",
        coordinate,
        if hit { "HIT" } else { "MISS" },
        index.root()
    );
    Ok(())
}
