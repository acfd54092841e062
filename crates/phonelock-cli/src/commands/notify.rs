use chrono::Utc;
use clap::Subcommand;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

use phonelock_core::{builtin_catalog, notification, Config};

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Generate sample notification records and print them as JSON
    Sample {
        /// Number of records to generate
        #[arg(long, default_value = "5")]
        count: usize,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub fn run(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        NotifyAction::Sample { count, seed } => {
            let config = Config::load_or_default();
            let catalog = builtin_catalog();
            let mut rng = match seed {
                Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
                None => Mcg128Xsl64::from_entropy(),
            };
            for _ in 0..count {
                if let Some(record) = notification::generate(
                    &catalog,
                    config.notifications.group_probability,
                    Utc::now(),
                    &mut rng,
                ) {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                }
            }
        }
    }
    Ok(())
}
