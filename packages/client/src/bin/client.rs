//! Atelier terminal client binary.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin atelier-client -- --email a@x.com --password secret1 --new-project demo
//! ```

use clap::Parser;

use atelier_client::{
    ApiClient, ClientError, CredentialStore, ProcessSandbox, RunConfig, SyncState, WsSession, repl,
};
use atelier_shared::logger::setup_logger;

#[derive(Parser)]
#[command(name = "atelier-client", about = "Atelier collaboration client")]
struct Args {
    /// Server base URL
    #[arg(long, default_value = "http://127.0.0.1:3001")]
    server: String,

    /// Account email
    #[arg(long)]
    email: String,

    /// Account password; registers the account if it does not exist yet
    #[arg(long)]
    password: String,

    /// Project id to join
    #[arg(long, conflicts_with = "new_project")]
    project: Option<String>,

    /// Create a project with this name and join it
    #[arg(long)]
    new_project: Option<String>,

    /// Token file location
    #[arg(long)]
    token_file: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ClientError> {
    let credentials =
        CredentialStore::new(args.token_file.unwrap_or_else(CredentialStore::default_path));
    let api = ApiClient::new(args.server.clone(), credentials);

    let token = authenticate(&api, &args.email, &args.password).await?;

    let project = match (&args.project, &args.new_project) {
        (Some(id), _) => api.get_project(id).await?,
        (None, Some(name)) => {
            let project = api.create_project(name).await?;
            println!("created project '{}' ({})", project.name, project.id);
            project
        }
        (None, None) => {
            let mut projects = api.all_projects().await?;
            match projects.pop() {
                Some(project) => project,
                None => {
                    return Err(ClientError::Api {
                        status: 404,
                        message: "no projects yet; pass --new-project <name>".to_string(),
                    });
                }
            }
        }
    };

    let ws_base = ws_base_url(&args.server);
    let session = WsSession::connect(&ws_base, &project.id, &token).await?;

    let sync = SyncState::new(project.file_tree.clone());
    let sandbox = ProcessSandbox::for_project(&project.id, RunConfig::default());
    repl::run(&api, session, sync, sandbox, &project.id).await
}

/// Log in, registering the account first when the server has never seen
/// this email.
async fn authenticate(api: &ApiClient, email: &str, password: &str) -> Result<String, ClientError> {
    match api.login(email, password).await {
        Ok(token) => Ok(token),
        Err(ClientError::Api { status: 404, .. }) => {
            println!("no account for {email}, registering");
            api.register(email, password).await
        }
        Err(e) => Err(e),
    }
}

/// Derive the WebSocket base URL from the HTTP one.
fn ws_base_url(server: &str) -> String {
    if let Some(rest) = server.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = server.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        format!("ws://{server}")
    }
}
