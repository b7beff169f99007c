use anyhow::Result;
use clap::Parser;

use pixiu_users::bootstrap::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    pixiu_users::bootstrap::init_logging(&cli_args.log_level);
    pixiu_users::bootstrap::setup_panic_handler();

    let bootstrap_result = pixiu_users::bootstrap::bootstrap(cli_args).await?;
    pixiu_users::bootstrap::start_server(bootstrap_result).await?;

    Ok(())
}
