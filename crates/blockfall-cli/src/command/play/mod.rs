use ratatui_runtime::Runtime;

use self::app::PlayApp;
use super::engine_arg::EngineArg;

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    engine: EngineArg,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { engine } = arg;

    let (engine, _) = engine.build_engine()?;
    let mut app = PlayApp::new(engine);
    Runtime::new().run(&mut app)?;

    Ok(())
}
