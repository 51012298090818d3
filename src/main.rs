use anyhow::Result;

use scene_studio::{
    config::{SessionConfig, DEFAULT_CONFIG_PATH},
    window,
};

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = SessionConfig::load_or_default(DEFAULT_CONFIG_PATH);
    pollster::block_on(window::run(config))?;

    Ok(())
}
