use camwatch::{
    cmd::{self, EventArgs, HandlerKind, Services},
    config::AppConfig,
    logging::init_tracing,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding `app.yaml`.
    #[arg(short, long, global = true)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classifies the image announced by an object-created event.
    Classify(EventArgs),
    /// Checks a classification document and emails an alert if needed.
    Alert(EventArgs),
    /// Archives past months of a configured capture directory.
    Archive(EventArgs),
    /// Writes the operator parameters from the configuration into the store.
    Seed,
    /// Prints the current state of the cooldown and budget gates.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = AppConfig::new(cli.config_dir.as_deref())?;
    init_tracing(&config.logging).expect("setting default subscriber failed");
    tracing::debug!(database_url = %config.database_url, "Configuration loaded.");

    let services = Services::connect(config).await?;

    let result = run(&services, cli.command).await;
    services.close().await;
    result
}

async fn run(services: &Services, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Classify(args) => print_response(services, HandlerKind::Classify, &args).await,
        Commands::Alert(args) => print_response(services, HandlerKind::Alert, &args).await,
        Commands::Archive(args) => print_response(services, HandlerKind::Archive, &args).await,
        Commands::Seed => {
            let config = services.config();
            cmd::seed::execute(
                services.store.as_ref(),
                &config.store_keys,
                &config.seed,
                services.clock.now(),
            )
            .await?;
            Ok(())
        }
        Commands::Status => {
            let report = cmd::status::execute(&services.policy, services.clock.now()).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

async fn print_response(
    services: &Services,
    kind: HandlerKind,
    args: &EventArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = cmd::invoke::execute(services, kind, args).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
