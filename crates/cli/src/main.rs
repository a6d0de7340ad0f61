use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "echo-bot")]
#[command(about = "WhatsApp echo bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: ECHO_BOT_CONFIG_PATH or ~/.echo-bot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Run the webhook server. Point the gateway's webhook at http://<bind>:<port>/bot.
    Serve {
        /// Config file path (default: ECHO_BOT_CONFIG_PATH or ~/.echo-bot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from config or 5000)
        #[arg(long, short)]
        port: Option<u16>,

        /// Bind address (default from config or 127.0.0.1)
        #[arg(long, short, value_name = "ADDR")]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("echo-bot {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Serve { config, port, bind }) => {
            if let Err(e) = run_serve(config, port, bind).await {
                log::error!("serve failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(echobot::config::default_config_path);
    let dir = echobot::config::init_config_file(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
    bind: Option<String>,
) -> anyhow::Result<()> {
    let (mut config, path) = echobot::config::load_config(config_path)?;
    echobot::config::apply_server_overrides(&mut config, port, bind);
    log::info!(
        "starting echo bot on {}:{} (config {})",
        config.server.bind,
        config.server.port,
        path.display()
    );
    echobot::webhook::run_server(config).await
}
