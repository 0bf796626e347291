use clap::Parser;

use hyperswitch_ci::{
    Result,
    cli::{Args, Command},
    command,
    config::Config,
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("hyperswitch_ci")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = Args::parse();

    initialize_logger(cli_args.debug)?;

    let config = Config::load(&cli_args.config)?;

    match &cli_args.command {
        Command::ValidateConfirm(args) => {
            command::validate::execute(args, &config).await?;
            Ok(())
        }
        Command::CutRelease(args) => {
            command::release::execute(args, &config).await
        }
    }
}
