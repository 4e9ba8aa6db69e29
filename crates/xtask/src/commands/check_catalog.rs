//! Validate a message catalog file
//!
//! Loads the catalog the same way the runtime does and reports what would be
//! served for each cause, plus every entry that was skipped.

use anyhow::{Result, bail};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use obituary_content::CatalogLoader;
use obituary_core::{DamageCause, MessageCatalog};

/// Validate a message catalog
#[derive(Parser)]
pub struct CheckCatalog {
    /// Path to the catalog file (e.g., data/messages.toml)
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Exit with an error if any entry was skipped
    #[arg(long)]
    strict: bool,
}

impl CheckCatalog {
    pub fn execute(self) -> Result<()> {
        let loaded = CatalogLoader::load(&self.path)?;
        let catalog = &loaded.catalog;

        println!(
            "{} {}",
            style("Catalog:").bold().cyan(),
            self.path.display()
        );
        println!(
            "{} {}",
            style("Causes:").bold().cyan(),
            catalog.cause_count()
        );
        println!(
            "{} {}",
            style("Variants:").bold().cyan(),
            catalog.variant_count()
        );
        println!();

        print_causes(catalog);

        if loaded.report.is_clean() {
            println!("{}", style("No entries skipped").green());
            return Ok(());
        }

        println!(
            "{}",
            style(format!("Skipped {} entries:", loaded.report.skipped.len()))
                .bold()
                .yellow()
        );
        for entry in &loaded.report.skipped {
            println!("  {} {}", style("•").yellow(), entry);
        }

        if self.strict {
            bail!(
                "{} entries were skipped in {}",
                loaded.report.skipped.len(),
                self.path.display()
            );
        }
        Ok(())
    }
}

fn print_causes(catalog: &MessageCatalog) {
    let mut causes: Vec<DamageCause> = catalog.causes().collect();
    causes.sort_by_key(|cause| cause.to_string());

    println!("{}", style("=== Message Pools ===").bold().green());
    for cause in causes {
        let pool = catalog.pool(cause);
        let enabled = pool.iter().filter(|definition| definition.enabled).count();
        let indirect: usize = pool
            .iter()
            .map(|definition| {
                definition.indirect_variants.len()
                    + usize::from(definition.generic_indirect_text.is_some())
            })
            .sum();

        let line = format!(
            "  {:<20} {} enabled / {} total, {} indirect texts",
            cause.to_string(),
            enabled,
            pool.len(),
            indirect
        );
        if enabled == 0 {
            println!("{} {}", line, style("(all disabled, host default used)").dim());
        } else {
            println!("{}", line);
        }
    }
    println!();
}
