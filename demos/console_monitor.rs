//! Console monitor example
//!
//! Run with: cargo run --example console_monitor [LAYOUT]
//!
//! Examples:
//!   cargo run --example console_monitor          # 3x3 grid
//!   cargo run --example console_monitor 2x2      # 2x2 grid
//!   RUST_LOG=gridwatch=debug cargo run --example console_monitor 4x4
//!
//! Prints one line per grid slot once a second and exercises a few operator
//! actions along the way. Stop with Ctrl+C.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gridwatch::{EngineConfig, LayoutDescriptor, Resolution, Slot, StreamRecord, TelemetryEngine};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

fn render(slot: &Slot) -> String {
    let record = slot.record();
    if slot.is_placeholder() {
        return format!("{:<10} -- no signal --", record.id());
    }

    let meters: Vec<String> = record
        .audio()
        .levels()
        .iter()
        .zip(record.level_classes())
        .map(|(level, class)| format!("{:>5.1}({})", level, class))
        .collect();

    format!(
        "{:<10} {:<22} {:<9} {:>9} {:>6.2}Mbps {:>4}ms {}{}{}",
        record.id(),
        record.display_name(),
        record.status(),
        record.resolution().to_string(),
        record.bitrate_mbps(),
        record.latency_ms(),
        meters.join(" "),
        if record.audio().muted() { " [muted]" } else { "" },
        if record.visible() { "" } else { " [hidden]" },
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridwatch=info")),
        )
        .init();

    let layout = match std::env::args().nth(1) {
        Some(id) => LayoutDescriptor::by_id(&id).ok_or_else(|| format!("unknown layout: {id}"))?,
        None => LayoutDescriptor::default(),
    };

    let engine = TelemetryEngine::initialize(EngineConfig::default().initial_layout(layout))?;

    // Callback observer: count ticks
    let ticks = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&ticks);
    let tick_counter = engine.subscribe(move |_: &[StreamRecord]| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    // Channel observer: render once a second
    let mut rx = engine.subscribe_channel();
    let renderer = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            let mut last_render = tokio::time::Instant::now();
            loop {
                match rx.recv().await {
                    Ok(snapshot) => {
                        if last_render.elapsed() < Duration::from_secs(1) {
                            continue;
                        }
                        last_render = tokio::time::Instant::now();

                        let layout = engine.layout().await;
                        let summary = engine.summary().await;
                        println!(
                            "\n== {} | active {}/{} | muted {} | volume {:.0} ==",
                            layout.name(),
                            summary.active_count,
                            summary.total_count,
                            summary.muted_count,
                            summary.master_volume,
                        );
                        for slot in gridwatch::build_slots(&snapshot, &layout) {
                            println!("{}", render(&slot));
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped = skipped, "Renderer lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    };

    // Scripted operator actions
    let script = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            engine.toggle_mute("cam-2").await;
            engine.change_source("cam-3", "replay").await;

            tokio::time::sleep(Duration::from_secs(3)).await;
            engine.change_resolution("cam-1", Resolution::UHD_4K).await;
            engine.toggle_visibility("remote-1").await;
            engine.set_master_volume(40.0).await;

            tokio::time::sleep(Duration::from_secs(3)).await;
            engine.toggle_global_mute().await;
        })
    };

    tokio::signal::ctrl_c().await?;

    println!("\nStopping after {} ticks", ticks.load(Ordering::Relaxed));
    tick_counter.unsubscribe();
    engine.shutdown();
    script.abort();
    renderer.abort();

    Ok(())
}
