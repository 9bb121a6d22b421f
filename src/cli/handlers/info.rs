//! Information display handlers

use crate::cli::output::*;
use crate::AppConfig;
use crate::Result;

pub fn handle_config_command(config: &AppConfig) -> Result<()> {
    print_config(config);
    if config.llm_key().is_empty() {
        println!();
        print_warning("llm.llm_key is not set; ask, analyze, verify and serve will fail");
    }
    Ok(())
}
