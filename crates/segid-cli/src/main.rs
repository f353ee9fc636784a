//! Loads a high segment and prints IDs, one per line.

mod config;
mod telemetry;

use std::io::{BufWriter, Write};

use clap::Parser;
use config::{CliArgs, CliConfig, LoaderKind};
use segid::{Loader, MemoryLoader, MysqlLoader, SegmentGenerator, TokioSpawner};
use telemetry::init_telemetry;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_telemetry()?;

    match config.loader {
        LoaderKind::Memory => run(MemoryLoader::new(config.memory_start), &config).await,
        LoaderKind::Mysql => run(MysqlLoader::new(&config.mysql)?, &config).await,
    }
}

async fn run<L: Loader>(loader: L, config: &CliConfig) -> anyhow::Result<()> {
    let generator = SegmentGenerator::with_spawner(loader, TokioSpawner::current()?, &config.options)?;
    let high = generator.load_initial().await?;

    if cfg!(debug_assertions) {
        tracing::info!("Generating {} IDs from high segment {} with {:#?}", config.count, high, generator);
    } else {
        tracing::info!(name = generator.name(), high, count = config.count, "Generating IDs");
    }

    let mut out = BufWriter::new(std::io::stdout().lock());
    for _ in 0..config.count {
        writeln!(out, "{:#018x}", generator.next_id()?)?;
    }
    out.flush()?;

    tracing::info!(high = generator.current_high(), "Done");
    Ok(())
}
