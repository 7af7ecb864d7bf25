//! nextreia — entrypoint
//! - tracing 初始化
//! - convert / import / check 子命令分发

mod cli;
mod logging;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing_once();

    let args = cli::Args::parse();
    match args.command {
        cli::Commands::Convert(a) => cli::convert::run(a).await,
        cli::Commands::Import(a) => {
            cli::import::run(a)?;
            Ok(())
        }
        cli::Commands::Check(a) => {
            let code = cli::check::run(a)?;
            std::process::exit(code);
        }
    }
}
