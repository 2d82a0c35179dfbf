//!
//! kado-admin CLI binary
//! ---------------------
//! Operator tool for the Kado24 admin API: logs in against a portal backend,
//! optionally runs a single authenticated GET, and prints the JSON result.
//! Useful for poking at a gateway without the web dashboard.

use std::env;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use kado_admin::client::{endpoints, ApiClient};
use kado_admin::config::ClientConfig;
use kado_admin::identity::{FileTokenStore, MemoryTokenStore, SessionManager, TokenStore};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} --connect <url> --user <identifier> --password <secret> [--get <endpoint>] [--token-file <path>] [--logout]\n\nFlags:\n  --connect <url>       Base URL of the portal backend / API gateway\n  --user <identifier>   Admin identifier (email or phone)\n  --password <secret>   Admin password\n  --get <endpoint>      Endpoint to GET after login (default: {pending})\n  --token-file <path>   Persist the token pair to this file (resumes the session next run)\n  --logout              Invalidate the session server-side before exiting\n  -h, --help            Show this help\n\nExamples:\n  {program} --connect http://127.0.0.1:8080 --user admin@kado24.com --password secret\n  {program} --connect http://127.0.0.1:8080 --user admin@kado24.com --password secret --get /api/admin/statistics",
        pending = endpoints::MERCHANTS_PENDING,
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);

    let mut connect_url: Option<String> = None;
    let mut user: Option<String> = None;
    let mut password: Option<String> = None;
    let mut endpoint: Option<String> = None;
    let mut token_file: Option<String> = None;
    let mut logout: bool = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--connect" => {
                if i + 1 >= args.len() { eprintln!("--connect requires a URL"); print_usage(&program); std::process::exit(2); }
                connect_url = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--user" => {
                if i + 1 >= args.len() { eprintln!("--user requires a value"); print_usage(&program); std::process::exit(2); }
                user = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--password" => {
                if i + 1 >= args.len() { eprintln!("--password requires a value"); print_usage(&program); std::process::exit(2); }
                password = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--get" => {
                if i + 1 >= args.len() { eprintln!("--get requires an endpoint"); print_usage(&program); std::process::exit(2); }
                endpoint = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--token-file" => {
                if i + 1 >= args.len() { eprintln!("--token-file requires a path"); print_usage(&program); std::process::exit(2); }
                token_file = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--logout" => { logout = true; i += 1; continue; }
            "-h" | "--help" => { print_usage(&program); return Ok(()); }
            other => {
                eprintln!("unknown flag: {other}");
                print_usage(&program);
                std::process::exit(2);
            }
        }
    }

    let Some(base_url) = connect_url else {
        print_usage(&program);
        bail!("--connect is required");
    };
    let (Some(user), Some(password)) = (user, password) else {
        print_usage(&program);
        bail!("--user and --password are required");
    };

    let cfg = ClientConfig::new(base_url);
    let store: Arc<dyn TokenStore> = match &token_file {
        Some(path) => Arc::new(FileTokenStore::new(path)),
        None => Arc::new(MemoryTokenStore::new()),
    };
    let session = SessionManager::new(&cfg, store).context("session manager")?;

    let installed = session.login(&user, &password).await.context("login")?;
    match installed.principal {
        Some(p) => println!("logged in as {}", p.display_label()),
        None => println!("logged in"),
    }

    let client = ApiClient::new(&cfg, session.clone()).context("api client")?;
    let endpoint = endpoint.unwrap_or_else(|| endpoints::MERCHANTS_PENDING.to_string());
    let result: serde_json::Value = client
        .get(&endpoint)
        .await
        .with_context(|| format!("GET {endpoint}"))?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if logout {
        session.logout_remote().await;
        println!("session ended");
    }
    Ok(())
}
