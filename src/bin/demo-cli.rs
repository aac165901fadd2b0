use clap::{Parser, Subcommand};
use demo_api::client::MessagesClient;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "demo-cli")]
#[command(about = "Command-line client for the demo message API", long_about = None)]
struct Cli {
    #[arg(short, long, env = "DEMO_API_URL", default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show service identity and which host answered
    Status,
    /// Liveness probe
    Health,
    /// Readiness probe (store reachable)
    Ready,
    /// List every message, oldest first
    List,
    /// Post a new message
    Post {
        /// Message text
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = MessagesClient::new(&cli.url);

    match cli.command {
        Commands::Status => print_json(&client.status().await?)?,
        Commands::Health => print_json(&client.health().await?)?,
        Commands::Ready => print_json(&client.ready().await?)?,
        Commands::List => {
            let list = client.list().await?;
            if list.messages.is_empty() {
                println!("No messages yet.");
            }
            for msg in &list.messages {
                println!("#{:<4} {} [{}] {}", msg.id, msg.created_at, msg.origin, msg.text);
            }
            println!("{} message(s)", list.count);
        }
        Commands::Post { text } => {
            let msg = client.post(&text).await?;
            println!("Created message #{} on {}", msg.id, msg.origin);
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
