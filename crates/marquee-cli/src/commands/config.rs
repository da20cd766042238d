use anyhow::Result;
use tracing::info;

use marquee_core::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
            return Ok(());
        }
        AppConfig::default().save()?;
        info!(path = %path.display(), "Wrote default config");
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    println!("# {}", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}
