use clap::Parser;
use color_eyre::Result;
use tour_map_tui::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    tour_map_tui::run(args).await
}
