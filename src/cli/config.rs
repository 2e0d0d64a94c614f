//! The `config` command: resolved paths and current settings

use crate::config::{GridPaths, Settings};
use crate::error::GridResult;

/// Handle the config command
pub fn handle_config_command(paths: &GridPaths, settings: &Settings) -> GridResult<()> {
    println!("envelope-grid Configuration");
    println!("===========================");
    println!("Base directory: {}", paths.base_dir().display());
    println!("Settings file:  {}", paths.settings_file().display());
    println!();
    println!("Settings:");
    println!("  Visible months:   {}", settings.visible_months);
    println!("  Only active:      {}", settings.show_only_active);
    println!("  Register sort:    {}", settings.register_sort);
    println!("  Currency symbol:  {}", settings.currency_symbol);
    println!("  Date format:      {}", settings.date_format);

    if settings.classifications.is_empty() {
        println!("  Classifications:  (none)");
    } else {
        println!("  Classifications:");
        let mut sorted: Vec<_> = settings.classifications.iter().collect();
        sorted.sort_by_key(|c| c.sort_order);
        for classification in sorted {
            println!(
                "    {:<20} {} master categories",
                classification.label,
                classification.master_category_ids.len()
            );
        }
    }

    Ok(())
}
