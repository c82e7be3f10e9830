//! Pet subcommand: status, gestures, and the live engine loop.

use clap::Subcommand;
use mongle_core::{
    EngineConfig, Event, GaugeKind, GaugeSnapshot, PetAction, PetEngine, PetStatus,
};
use tokio::sync::broadcast::error::RecvError;

/// Pet actions.
#[derive(Subcommand)]
pub enum PetCommand {
    /// Fetch and show the current pet status
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Air the room out
    Ventilate,
    /// Complete a petting session
    Affection,
    /// Collect an emotion shard
    Shard,
    /// Run the live engine (decay + autosave) until Ctrl-C
    Watch,
}

/// Run the pet command.
pub fn run(action: PetCommand) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::load_or_default();
    if config.remote.user_id.is_empty() {
        return Err(
            "no user id configured. Run 'mongle-cli config set remote.user_id <id>' first.".into(),
        );
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        match action {
            PetCommand::Status { json } => show_status(&config, json).await,
            PetCommand::Ventilate => gesture(&config, PetAction::Ventilate).await,
            PetCommand::Affection => gesture(&config, PetAction::AffectionComplete).await,
            PetCommand::Shard => gesture(&config, PetAction::CollectShard).await,
            PetCommand::Watch => watch(&config).await,
        }
    })
}

async fn show_status(config: &EngineConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let engine = PetEngine::new(config)?;
    let status = engine.refresh().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print_status(&status, &engine.snapshot());
    }
    Ok(())
}

async fn gesture(
    config: &EngineConfig,
    action: PetAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = PetEngine::new(config)?;
    match engine.perform(action).await {
        Some(status) => {
            println!("{action}: ok");
            print_status(&status, &engine.snapshot());
        }
        None => println!("{action}: no update (request dropped or failed); gauges unchanged"),
    }
    Ok(())
}

async fn watch(config: &EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = PetEngine::new(config)?;

    match engine.refresh().await {
        Ok(status) => print_status(&status, &engine.snapshot()),
        Err(e) => eprintln!("initial fetch failed ({e}); starting from cached values"),
    }

    let mut rx = engine.subscribe();
    engine.start();
    println!("Engine running. Ctrl-C to stop.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = rx.recv() => match event {
                Ok(event) => print_event(&event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    }

    engine.stop();
    println!("Engine stopped.");
    Ok(())
}

fn print_status(status: &PetStatus, snapshot: &GaugeSnapshot) {
    println!("Mongle  level {}  xp {}", status.level, status.experience);
    for kind in GaugeKind::ALL {
        let gauge = snapshot.get(kind);
        println!(
            "  {:<9} {:>5.1}{}",
            kind,
            gauge.value,
            if gauge.locked { "  [locked]" } else { "" }
        );
    }
}

fn print_event(event: &Event) {
    match event {
        Event::GaugesDecayed { values, at } => println!(
            "{} decay      affection {:.1}  air {:.1}  energy {:.1}",
            at.format("%H:%M:%S"),
            values.affection,
            values.air,
            values.energy
        ),
        Event::SnapshotApplied { values, level, at, .. } => println!(
            "{} snapshot   affection {:.1}  air {:.1}  energy {:.1}  (level {})",
            at.format("%H:%M:%S"),
            values.affection,
            values.air,
            values.energy,
            level
        ),
        Event::LockEngaged { gauge, at } => {
            println!("{} lock       {gauge} reached its ceiling", at.format("%H:%M:%S"))
        }
        Event::LockReleased { gauge, at } => {
            println!("{} unlock     {gauge} released", at.format("%H:%M:%S"))
        }
        Event::ActionDropped { action, at } => {
            println!("{} dropped    {action} (write in flight)", at.format("%H:%M:%S"))
        }
        Event::ConflictDetected { action, at } => {
            println!("{} conflict   {action} rejected as stale", at.format("%H:%M:%S"))
        }
        Event::ResyncCompleted { at } => {
            println!("{} resync     authoritative state restored", at.format("%H:%M:%S"))
        }
        Event::AutosaveFlushed { at, .. } => {
            println!("{} autosave   gauges flushed", at.format("%H:%M:%S"))
        }
        Event::AutosaveSkipped { at } => {
            println!("{} autosave   skipped (write in flight)", at.format("%H:%M:%S"))
        }
        Event::ShardSpawned { emotion, at, .. } => {
            println!("{} shard      {emotion} shard appeared", at.format("%H:%M:%S"))
        }
        Event::ShardExpired { at, .. } => {
            println!("{} shard      expired uncollected", at.format("%H:%M:%S"))
        }
        Event::ShardCollected { at, .. } => {
            println!("{} shard      collected", at.format("%H:%M:%S"))
        }
    }
}
