// src/lib.rs

pub mod catalog;
pub mod choreo;
pub mod cli;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod model;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::cli::CliArgs;
use crate::engine::{Choreographer, EngineHandle, EngineNotice, EngineRuntime};
use crate::model::{DanceSession, difficulty_name};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - collection loading
/// - session criteria
/// - the choreographer core + engine runtime
/// - terminal output and Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let catalog = catalog::loader::load_catalog(&args.collections).context("loading collections")?;

    let mut session = match &args.session {
        Some(path) => DanceSession::load_from_path(path).context("loading session")?,
        None => DanceSession::default(),
    };

    if let Some(bpm) = args.bpm {
        if !(bpm.is_finite() && bpm > 0.0) {
            bail!("--bpm must be a positive number (got {bpm})");
        }
        session.bpm = bpm;
    }

    if args.dry_run {
        print_dry_run(&catalog, &session);
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "seeding choreography PRNG");

    let catalog = Arc::new(catalog);

    // Practice mode: reject an unknown module id before the music starts.
    if let Some(id) = &args.play_module {
        if catalog.module(id).is_none() {
            bail!("unknown module id '{id}'");
        }
    }

    let mut core = Choreographer::new(Arc::clone(&catalog), session, seed);
    let admitted = core.activate_criteria();
    if admitted == 0 && args.play_module.is_none() {
        bail!("no modules match the session criteria; enable more collections or raise the limits");
    }

    let (runtime, handle, notice_rx) = EngineRuntime::new(core);
    let engine_task = tokio::spawn(runtime.run());

    let result = dance(&args, handle.clone(), notice_rx).await;

    // Dropping the last command sender lets the runtime wind down.
    drop(handle);
    let _ = engine_task.await;

    result
}

/// Terminal front end: print calls and notices until the dance ends.
async fn dance(
    args: &CliArgs,
    handle: EngineHandle,
    mut notices: mpsc::Receiver<EngineNotice>,
) -> Result<()> {
    let mut calls = handle.calls();
    let mut running = handle.running();
    let mut content_gap = false;

    match &args.play_module {
        Some(id) => handle.play_module(id.clone()).await,
        None => handle.begin_tip().await,
    }
    handle.resume().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("interrupted; ending tip");
                handle.end_tip().await;
                break;
            }

            changed = calls.changed() => {
                if changed.is_err() {
                    break;
                }
                let upcoming = calls.borrow_and_update().future.clone();
                if let Some(call) = upcoming {
                    println!("{:>3}  {}", call.beats, call.command);
                }
            }

            changed = running.changed() => {
                if changed.is_err() {
                    break;
                }
                let is_running = *running.borrow_and_update();
                if is_running {
                    continue;
                }

                // Drain queued advisories before deciding what the stop
                // meant; the content-gap notice may still be in flight.
                while let Ok(notice) = notices.try_recv() {
                    warn!("{notice}");
                    if matches!(notice, EngineNotice::ContentGap { .. }) {
                        content_gap = true;
                    }
                }

                if content_gap {
                    bail!("the dance stopped: no module available for the current formation");
                }
                if args.once {
                    info!("tip complete");
                    break;
                }

                if args.play_module.is_some() {
                    // Keep looping the practice module.
                    handle.resume().await;
                } else {
                    // The square resolved home; call the next tip.
                    println!();
                    handle.begin_tip().await;
                    handle.resume().await;
                }
            }

            Some(notice) = notices.recv() => {
                warn!("{notice}");
                if matches!(notice, EngineNotice::ContentGap { .. }) {
                    content_gap = true;
                }
            }
        }
    }

    Ok(())
}

/// Simple dry-run output: print collections, content counts and criteria.
fn print_dry_run(catalog: &Catalog, session: &DanceSession) {
    println!("patter dry-run");
    println!("  session.level = {}", session.level);
    println!("  session.bpm = {}", session.bpm);
    println!(
        "  session.continuation_probability = {}%",
        session.continuation_probability
    );
    println!(
        "  session.max_difficulty = {} ({})",
        session.max_difficulty,
        difficulty_name(session.max_difficulty)
    );
    println!("  session.target_difficulty = {:.1}", session.target_difficulty);
    println!();

    println!("collections ({}):", catalog.collections().len());
    for collection in catalog.collections() {
        println!("  - {} ({})", collection.name, collection.id);
        println!("      formations: {}", collection.formations);
        println!("      families: {}", collection.families);
        println!("      calls: {}", collection.calls);
        println!("      modules: {}", collection.modules);
    }
    println!();

    println!("modules ({}):", catalog.module_count());
    for module in catalog.modules() {
        println!(
            "  - {} [{} -> {}] difficulty {} ({} calls)",
            module.name,
            module.start_formation,
            module.end_formation,
            module.difficulty,
            module.sequence.len()
        );
    }
}
