use anyhow::Result;
use clap::Parser as _;
use effects::{PortfolioPage, SamplePage};
use folio::{Cli, boot, render, replay, replay_live};
use log::{info, warn};
use std::io::{self, Write as _};
use tokio::runtime::Builder;

pub fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = cli.load_config()?;
    let sample = SamplePage::build_with(&config.contract, 3)?;
    let mut page = PortfolioPage::attach(sample.doc, config)?;
    boot(&mut page)?;
    info!("replaying {}ms (live: {})", cli.duration_ms, cli.live);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.live {
        let runtime = Builder::new_current_thread().enable_time().build()?;
        let written = runtime.block_on(replay_live(&mut page, cli.duration(), &mut out))?;
        if written == 0 {
            warn!("no visible changes within {}ms", cli.duration_ms);
        }
    } else {
        let frames = replay(&mut page, cli.duration())?;
        render(&frames, &mut out)?;
    }
    out.flush()?;
    Ok(())
}
