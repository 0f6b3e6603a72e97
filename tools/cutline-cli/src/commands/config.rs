//! Show the effective configuration, or write it out as a starting file.

use cutline_common::config::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> anyhow::Result<()> {
    if init {
        let path = config.save()?;
        println!("Config written: {}", path.display());
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
