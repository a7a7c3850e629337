use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use core_wfc::{
    entropy::Entropy,
    wfc_backend::MultiThreaded,
    HistoryStrategy, Status, TileSet, WfcSettings, WfcTask,
};
use grid_wfc::{carcassonne_tileset, single_shot, terrain_tileset, xml_tileset, TerrainWeights};
use render::Palette;
use std::{path::PathBuf, sync::Arc, time::Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CatalogArg {
    Terrain,
    Carcassonne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HistoryArg {
    Snapshot,
    Delta,
}

impl From<HistoryArg> for HistoryStrategy {
    fn from(value: HistoryArg) -> Self {
        match value {
            HistoryArg::Snapshot => HistoryStrategy::Snapshot,
            HistoryArg::Delta => HistoryStrategy::Delta,
        }
    }
}

/// Generates a tile grid with Wave Function Collapse.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Grid side length in cells.
    #[arg(short, long, default_value_t = 24)]
    size: usize,

    /// Seed for the random stream. Drawn from the OS when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Built-in tile catalog.
    #[arg(long, value_enum, default_value_t = CatalogArg::Terrain)]
    catalog: CatalogArg,

    /// Load the catalog from an XML file instead.
    #[arg(long, value_name = "PATH")]
    xml: Option<PathBuf>,

    /// How decisions are recorded for backtracking.
    #[arg(long, value_enum, default_value_t = HistoryArg::Delta)]
    history: HistoryArg,

    /// Prefer cells with many open neighbours, subtracting WEIGHT per neighbour.
    #[arg(long, value_name = "WEIGHT", num_args = 0..=1, default_missing_value = "0.1")]
    degree: Option<f64>,

    /// Forced collapses applied before solving, as CELL:NAME or CELL:NAME:ROTATION.
    #[arg(long = "collapse", value_name = "CELL:NAME[:ROTATION]")]
    collapses: Vec<String>,

    /// Print progress every N steps instead of running silently to completion.
    #[arg(long, value_name = "N")]
    step: Option<usize>,

    /// Generate this many grids on worker threads and report statistics only.
    #[arg(long)]
    batch: Option<usize>,

    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Print the final state as JSON.
    #[arg(long)]
    json: bool,

    #[arg(long, default_value_t = TerrainWeights::default().water)]
    water: f64,
    #[arg(long, default_value_t = TerrainWeights::default().land)]
    land: f64,
    #[arg(long, default_value_t = TerrainWeights::default().forest)]
    forest: f64,
    #[arg(long, default_value_t = TerrainWeights::default().mountain)]
    mountain: f64,
}

impl CliArgs {
    fn settings(&self) -> WfcSettings {
        let entropy = match self.degree {
            Some(weight) => Entropy::Degree { weight },
            None => Entropy::Shannon,
        };
        WfcSettings {
            history: self.history.into(),
            entropy,
            seed: self.seed,
        }
    }

    fn load_tileset(&self) -> Result<(TileSet, Palette)> {
        if let Some(path) = &self.xml {
            return Ok((xml_tileset::load(path)?, Palette::Terrain));
        }
        Ok(match self.catalog {
            CatalogArg::Terrain => {
                let weights = TerrainWeights {
                    water: self.water,
                    land: self.land,
                    forest: self.forest,
                    mountain: self.mountain,
                };
                (terrain_tileset::terrain_tileset(&weights)?, Palette::Terrain)
            }
            CatalogArg::Carcassonne => (carcassonne_tileset::carcassonne_tileset()?, Palette::Ids),
        })
    }
}

/// Parses `CELL:NAME[:ROTATION]` and resolves the tile id.
fn parse_collapse(request: &str, tileset: &TileSet) -> Result<(usize, usize)> {
    let mut parts = request.split(':');
    let cell = parts
        .next()
        .ok_or_else(|| anyhow!("Empty collapse request"))?
        .parse::<usize>()
        .with_context(|| format!("Invalid cell in collapse request {request}"))?;
    let name = parts
        .next()
        .ok_or_else(|| anyhow!("Missing tile name in collapse request {request}"))?;
    let rotation = match parts.next() {
        Some(rotation) => rotation
            .parse::<usize>()
            .with_context(|| format!("Invalid rotation in collapse request {request}"))?,
        None => 0,
    };
    let tile = tileset
        .find(name, rotation)
        .ok_or_else(|| anyhow!("Unknown tile {name} with rotation {rotation}"))?;
    Ok((cell, tile))
}

fn run_batch(args: &CliArgs, tileset: Arc<TileSet>, count: usize) -> Result<()> {
    let mut backend = MultiThreaded::new(args.threads)?;
    let first: u64 = args.seed.unwrap_or_else(rand::random);
    let seeds: Vec<u64> = (0..count as u64).map(|i| first.wrapping_add(i)).collect();

    let now = Instant::now();
    let outputs =
        single_shot::generate_batch(tileset, args.size, &args.settings(), &seeds, &mut backend)?;
    let elapsed = now.elapsed();

    let failures = outputs.iter().filter(|(_, result)| result.is_err()).count();
    let backtracks: usize = outputs.iter().map(|(task, _)| task.backtracks()).sum();
    println!(
        "{} grids of {}x{} in {:.2?}: {} failed, {:.1} backtracks per grid",
        count,
        args.size,
        args.size,
        elapsed,
        failures,
        backtracks as f64 / count.max(1) as f64
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse();
    let (tileset, palette) = args.load_tileset()?;
    let tileset = Arc::new(tileset);
    info!("Catalog has {} tile variants", tileset.tile_count());

    if let Some(count) = args.batch {
        return run_batch(&args, tileset, count);
    }

    let mut task = WfcTask::new(args.size, tileset.clone(), args.settings())?;
    info!("Solving {0}x{0} grid with seed {1}", args.size, task.seed);

    for request in &args.collapses {
        let (cell, tile) = parse_collapse(request, &tileset)?;
        if cell >= task.grid().len() {
            bail!("Cell {cell} is outside the {0}x{0} grid", args.size);
        }
        if !task.collapse(cell, tile) {
            warn!("Collapse request {request} was rejected");
        }
    }

    let now = Instant::now();
    match args.step {
        Some(interval) => {
            while !task.status().is_terminal() {
                task.step_many(interval.max(1));
                println!(
                    "{:?}: {} cells left, depth {}",
                    task.status(),
                    task.remaining(),
                    task.depth()
                );
            }
        }
        None => {
            task.run();
        }
    }
    let elapsed = now.elapsed();

    if args.json {
        println!("{}", serde_json::to_string(&task.snapshot(true))?);
    } else {
        print!("{}", render::render(task.grid(), &tileset, palette));
    }
    println!(
        "{:?} after {} steps and {} backtracks in {:.2?} (seed {})",
        task.status(),
        task.steps(),
        task.backtracks(),
        elapsed,
        task.seed
    );

    match task.status() {
        Status::Completed => {
            if !args.json {
                print!("{}", render::histogram(&task.validate()?, &tileset));
            }
            Ok(())
        }
        status => bail!("Solver finished with status {status:?}"),
    }
}
