//! Gauge cache inspection subcommand.

use clap::Subcommand;
use mongle_core::{GaugeCache, GaugeKind};

/// Cache actions.
#[derive(Subcommand)]
pub enum CacheAction {
    /// Show the cached gauge values
    Show,
    /// Drop all cached values
    Clear,
}

/// Run the cache command.
pub fn run(action: CacheAction) -> Result<(), Box<dyn std::error::Error>> {
    let cache = GaugeCache::open()?;
    match action {
        CacheAction::Show => match cache.read()? {
            Some(values) => {
                for kind in GaugeKind::ALL {
                    println!("{:<9} {:.4}", kind, values.get(kind));
                }
            }
            None => println!("gauge cache is empty"),
        },
        CacheAction::Clear => {
            cache.clear()?;
            println!("gauge cache cleared");
        }
    }
    Ok(())
}
