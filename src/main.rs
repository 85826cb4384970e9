// main.rs

use anyhow::Result;
use pamdebug::{
    DEBUG,
    StdoutSink,
    args,
    config::Config,
    globals,
    logging,
    session::Session,
};
use tokio::io::{
    self,
    BufReader,
};
use tracing::{
    debug,
    info,
    instrument,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = args::parse_args();

    let path = Config::locate(args.config.as_deref());
    let config = globals::init_config(Config::load(&path)?)?;
    let _guard = logging::init(&config.log)?;
    info!("Loaded config from {}", path.display());

    startup(config, &args);

    if args.batch {
        info!("Batch mode, exiting");
        return Ok(());
    }

    let mut session = Session::new(&DEBUG, StdoutSink, std::io::stdout());
    session.run(BufReader::new(io::stdin())).await
}

#[instrument(skip_all)]
fn startup(config: &Config, args: &args::Args) {
    let set = args.resolve(&config.debug);
    info!("Applying startup flags: {set:?}");
    DEBUG.apply(StdoutSink, set);

    debug!("Debug flags at startup: {}", DEBUG.flags());
}
