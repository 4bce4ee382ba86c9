use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "starwars-cli")]
#[command(about = "Command-line client for the Star Wars API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every row of a resource
    List { resource: Resource },
    /// Fetch one row by id
    Get { resource: Resource, id: i64 },
    /// Delete a row (users are addressed by username)
    Delete { resource: Resource, key: String },
    /// Check service liveness
    Health,
}

#[derive(Clone, Copy, ValueEnum)]
enum Resource {
    Users,
    Planets,
    Vehicles,
    Characters,
    Favorites,
}

impl Resource {
    fn path(self) -> &'static str {
        match self {
            Resource::Users => "user",
            Resource::Planets => "planets",
            Resource::Vehicles => "vehicles",
            Resource::Characters => "characters",
            Resource::Favorites => "favorites",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::List { resource } => client.get(format!("{base}/{}", resource.path())).send().await?,
        Commands::Get { resource, id } => client.get(format!("{base}/{}/{id}", resource.path())).send().await?,
        Commands::Delete { resource, key } => {
            client
                .delete(format!("{base}/{}/{key}", resource.path()))
                .send()
                .await?
        }
        Commands::Health => client.get(format!("{base}/health")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body: Value = res.json().await?;

    if !status.is_success() {
        let message = body["message"].as_str().unwrap_or("unknown error");
        eprintln!("Error: API returned status {status}: {message}");
        std::process::exit(1);
    }

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
