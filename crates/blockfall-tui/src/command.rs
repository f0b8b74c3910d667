use blockfall_engine::SpawnSeed;
use clap::Parser;

use crate::{app::PlayApp, tui::Tui};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Simulation ticks per second
    #[clap(long, default_value_t = 60)]
    fps: u32,
    /// 32-hex-character seed for a deterministic piece sequence
    #[clap(long)]
    seed: Option<SpawnSeed>,
    /// Disable the sound cues
    #[clap(long, default_value_t = false)]
    mute: bool,
}

pub fn run() -> anyhow::Result<()> {
    let CommandArgs { fps, seed, mute } = CommandArgs::parse();

    let mut app = PlayApp::new(fps, seed, mute);
    Tui::new().run(&mut app)?;

    Ok(())
}
