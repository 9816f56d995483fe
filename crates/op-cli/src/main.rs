mod render;
mod session;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use op_core::{CoinEngine, OpType, OpTypeSeed, export_json};
use op_store::{ProfileStore, Selections};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::session::EditOp;

#[derive(Parser)]
#[command(name = "op", about = "Derive and edit Objective Personality types")]
struct Cli {
    /// Selection profile to use (defaults to config.toml, then "default")
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive a type from flags, filling gaps from the saved selections
    Derive {
        #[command(flatten)]
        selections: SelectionArgs,

        /// Print the JSON wire format instead of text
        #[arg(long)]
        json: bool,

        /// Save the selections to the active profile
        #[arg(long)]
        save: bool,
    },

    /// Derive a random type
    Random {
        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        json: bool,
    },

    /// Derive the type saved in the active profile
    Show {
        #[arg(long)]
        json: bool,
    },

    /// Apply coin edits to the saved type and print the cells
    Edit {
        /// Edits in order: letter:N, charge:N, axis, reset, animal:POS
        #[arg(required = true)]
        ops: Vec<String>,

        /// Start from a blank engine instead of the saved type
        #[arg(long)]
        blank: bool,

        #[arg(long)]
        json: bool,
    },

    /// List saved profiles
    Profiles,

    /// Show the saved snapshots of the active profile
    History,

    /// Export the active profile's selections to a JSON file
    Export {
        /// Output file path
        path: PathBuf,
    },

    /// Import selections from a JSON file into the active profile
    Import {
        /// Input file path
        path: PathBuf,
    },
}

#[derive(Args)]
struct SelectionArgs {
    /// Observer function, e.g. Se or N
    #[arg(long)]
    observer: Option<String>,

    /// Decider function, e.g. Fi or T
    #[arg(long)]
    decider: Option<String>,

    /// Whether the observer is the single savior function (true or false)
    #[arg(long, value_name = "BOOL")]
    single_observer: Option<bool>,

    /// Two-letter modality, e.g. FM
    #[arg(long)]
    modality: Option<String>,

    /// Animal stack, e.g. "CS/B(P)" or SCBP
    #[arg(long)]
    animals: Option<String>,

    /// Social type, #1 to #4
    #[arg(long)]
    social: Option<String>,
}

impl SelectionArgs {
    /// Lay the given flags over `base`.
    fn merge_into(&self, mut base: Selections) -> Selections {
        let flags = [
            (&mut base.observer, &self.observer),
            (&mut base.decider, &self.decider),
            (&mut base.modality, &self.modality),
            (&mut base.animals, &self.animals),
            (&mut base.social, &self.social),
        ];
        for (slot, flag) in flags {
            if let Some(value) = flag {
                *slot = Some(value.clone());
            }
        }
        if let Some(single) = self.single_observer {
            base.single_observer = Some(single.to_string());
        }
        base
    }
}

fn open_store(cli: &Cli) -> Result<ProfileStore> {
    let base_dir = std::env::var("OP_DATA_DIR").ok().map(PathBuf::from);
    ProfileStore::open(cli.profile.as_deref(), base_dir.as_deref())
        .context("failed to open selection store")
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Derive {
            selections,
            json,
            save,
        } => cmd_derive(&cli, selections, *json, *save),
        Commands::Random { seed, json } => cmd_random(*seed, *json),
        Commands::Show { json } => cmd_show(&cli, *json),
        Commands::Edit { ops, blank, json } => cmd_edit(&cli, ops, *blank, *json),
        Commands::Profiles => cmd_profiles(&cli),
        Commands::History => cmd_history(&cli),
        Commands::Export { path } => cmd_export(&cli, path),
        Commands::Import { path } => cmd_import(&cli, path),
    }
}

fn print_type(t: &OpType, json: bool) -> Result<()> {
    if json {
        println!("{}", export_json(t).context("failed to serialize type")?);
    } else {
        println!("{}", render::op_type(t));
    }
    Ok(())
}

fn cmd_derive(cli: &Cli, args: &SelectionArgs, json: bool, save: bool) -> Result<()> {
    let store = open_store(cli)?;
    let stored = store
        .load()
        .context("failed to load saved selections")?
        .unwrap_or_default();
    let selections = args.merge_into(stored);

    let seed = selections.to_seed().context("incomplete selections")?;
    let t = seed.derive().context("selections do not form a type")?;

    if save {
        store.save(&selections).context("failed to save selections")?;
        tracing::info!("saved selections to profile '{}'", store.profile());
    }
    print_type(&t, json)
}

fn cmd_random(seed: Option<u64>, json: bool) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let t = OpTypeSeed::random(&mut rng)
        .derive()
        .context("random seed failed to derive")?;
    print_type(&t, json)
}

fn cmd_show(cli: &Cli, json: bool) -> Result<()> {
    let store = open_store(cli)?;
    let t = store
        .derive()
        .with_context(|| format!("cannot show profile '{}'", store.profile()))?;
    print_type(&t, json)
}

fn cmd_edit(cli: &Cli, raw_ops: &[String], blank: bool, json: bool) -> Result<()> {
    let ops = raw_ops
        .iter()
        .map(|raw| raw.parse::<EditOp>())
        .collect::<Result<Vec<_>>>()?;

    let mut engine = if blank {
        CoinEngine::new()
    } else {
        let store = open_store(cli)?;
        let t = store
            .derive()
            .with_context(|| format!("cannot edit profile '{}'", store.profile()))?;
        CoinEngine::from_op_type(&t)
    };
    engine.subscribe_all(|snapshot| tracing::debug!("cell {} changed", snapshot.id()));

    for op in ops {
        let touched = op
            .apply(&mut engine)
            .with_context(|| format!("edit '{op}' failed"))?;
        tracing::info!("{op}: {} cells changed", touched.len());
    }

    if json {
        let out = serde_json::json!({
            "generation": engine.generation(),
            "cells": engine.snapshots(),
            "conflicts": engine.conflicts(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("failed to serialize cells")?
        );
    } else {
        println!("{}", render::engine(&engine));
    }
    Ok(())
}

fn cmd_profiles(cli: &Cli) -> Result<()> {
    let store = open_store(cli)?;
    let profiles = store.list_profiles().context("failed to list profiles")?;
    if profiles.is_empty() {
        println!("(no saved profiles)");
    }
    for profile in profiles {
        let marker = if profile == store.profile() { "*" } else { " " };
        println!("{marker} {profile}");
    }
    Ok(())
}

fn cmd_history(cli: &Cli) -> Result<()> {
    let store = open_store(cli)?;
    let history = store.history().context("failed to load history")?;
    if history.is_empty() {
        println!("(no history for '{}')", store.profile());
    }
    for entry in history {
        let summary = match entry.selections.to_seed().and_then(|s| s.derive()) {
            Ok(t) => t.summary(),
            Err(e) => format!("(incomplete: {e})"),
        };
        println!("{}  {}  {summary}", entry.created_at, entry.id);
    }
    Ok(())
}

fn cmd_export(cli: &Cli, path: &Path) -> Result<()> {
    let store = open_store(cli)?;
    store
        .export_json_file(path)
        .with_context(|| format!("failed to export profile '{}'", store.profile()))?;
    println!("exported to {}", path.display());
    Ok(())
}

fn cmd_import(cli: &Cli, path: &Path) -> Result<()> {
    let store = open_store(cli)?;
    if !path.exists() {
        bail!("{} does not exist", path.display());
    }
    let selections = store
        .import_json_file(path)
        .context("failed to import selections")?;
    let t = selections
        .to_seed()
        .and_then(|s| s.derive())
        .context("imported selections do not form a type")?;
    println!(
        "imported from {} into '{}': {}",
        path.display(),
        store.profile(),
        t.summary()
    );
    Ok(())
}
