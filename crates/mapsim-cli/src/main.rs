//! Command-line front end: load the corpus, run one query, print ranked
//! results.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mapsim_core::{
    parse_filters, EngineConfig, Filter, MapId, ModContext, PerformanceQuery, SearchContext,
    SearchHit,
};

#[derive(Parser)]
#[command(name = "mapsim", version, about = "Beatmap similarity search")]
struct Cli {
    /// Configuration file (TOML). Env vars prefixed MAPSIM_ override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Corpus data directory, overriding the configured one.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find maps similar in structure to a beatmap.
    Sim {
        /// Query beatmap id.
        id: MapId,
        /// Search filters, e.g. "ar>=9 length<200 artist=camellia".
        #[arg(short, long, default_value = "")]
        filters: String,
        /// Number of results.
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Find maps similar in rating to a beatmap.
    Rating {
        /// Query beatmap id.
        id: MapId,
        /// Modifier context: nm, dt, or hr.
        #[arg(short, long, default_value = "nm")]
        context: ModContext,
        /// Search filters.
        #[arg(short, long, default_value = "")]
        filters: String,
        /// Number of results.
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Find maps with similar slider geometry.
    Sliders {
        /// Query beatmap id.
        id: MapId,
        /// Search filters.
        #[arg(short, long, default_value = "")]
        filters: String,
        /// Number of results.
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Find overweight maps inside a pp window.
    Pp {
        /// Minimum average pp.
        #[arg(long, default_value_t = 0.0)]
        min: f64,
        /// Maximum average pp.
        #[arg(long, default_value_t = f64::INFINITY)]
        max: f64,
        /// Mod combo to match exactly (e.g. HDDT).
        #[arg(long, default_value = "")]
        include: String,
        /// Mods that disqualify a combo.
        #[arg(long, default_value = "")]
        exclude: String,
        /// Search filters.
        #[arg(short, long, default_value = "")]
        filters: String,
        /// Number of results.
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
}

fn describe(engine: &SearchContext, id: MapId) -> String {
    let Some(stats) = engine.corpus().stats(id) else {
        return format!("#{id}");
    };
    let artist = stats.artist.as_deref().unwrap_or("?");
    let title = stats.title.as_deref().unwrap_or("?");
    let version = stats.version.as_deref().unwrap_or("?");
    format!("{artist} - {title} [{version}] (#{id})")
}

fn print_hits(engine: &SearchContext, hits: &[SearchHit], percentage: bool) {
    if hits.is_empty() {
        println!("No matching maps.");
        return;
    }
    for (rank, hit) in hits.iter().enumerate() {
        if percentage {
            println!("{:>3}) {:5.1}%  {}", rank + 1, hit.score, describe(engine, hit.id));
        } else {
            println!("{:>3}) {:.3}  {}", rank + 1, hit.score, describe(engine, hit.id));
        }
    }
}

fn parse(filters: &str) -> anyhow::Result<Vec<Filter>> {
    parse_filters(filters).map_err(Into::into)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.corpus.data_dir = data_dir;
    }

    let engine = SearchContext::load(config).context("failed to load corpus")?;
    tracing::info!(beatmaps = engine.corpus().len(), "corpus loaded");

    match cli.command {
        Command::Sim { id, filters, limit } => {
            let hits = engine.similar_by_structure(id, limit, parse(&filters)?)?;
            print_hits(&engine, &hits, true);
        }
        Command::Rating {
            id,
            context,
            filters,
            limit,
        } => {
            let hits = engine.similar_by_rating(id, limit, context, &parse(&filters)?)?;
            print_hits(&engine, &hits, false);
        }
        Command::Sliders { id, filters, limit } => {
            let hits = engine.similar_by_sliders(id, limit, &parse(&filters)?)?;
            print_hits(&engine, &hits, false);
        }
        Command::Pp {
            min,
            max,
            include,
            exclude,
            filters,
            limit,
        } => {
            let hits = engine.overweight_maps(&PerformanceQuery {
                min_pp: min,
                max_pp: max,
                mods_include: include,
                mods_exclude: exclude,
                filters: parse(&filters)?,
                limit,
            });
            if hits.is_empty() {
                println!("No matching maps.");
            }
            for (rank, hit) in hits.iter().enumerate() {
                let mods = if hit.mods == "NM" || hit.mods.is_empty() {
                    String::new()
                } else {
                    format!(" +{}", hit.mods)
                };
                println!(
                    "{:>3}) {:.3}  {}{mods}",
                    rank + 1,
                    hit.overweight,
                    describe(&engine, hit.id)
                );
            }
        }
    }

    Ok(())
}
