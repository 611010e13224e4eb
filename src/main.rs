use clap::Parser;
use compras_gateway::cli::{
    handle_completions, handle_config_init, handle_registry_list, Cli, Commands, ConfigCommands,
    RegistryCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => compras_gateway::cli::serve::run_serve(args).await,
        Commands::Registry(cmd) => match cmd {
            RegistryCommands::List(args) => match handle_registry_list(&args) {
                Ok(output) => {
                    println!("{}", output);
                    Ok(())
                }
                Err(e) => Err(e),
            },
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
