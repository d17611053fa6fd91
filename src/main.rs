#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;
    use dbconsole::cli::Args;
    use dbconsole::config::Config;
    use dbconsole::db::{DatabaseClient, PostgresClient};
    use std::process;
    use tracing::Level;

    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };
    if let Some(url) = args.database_url {
        config.database_url = Some(url);
    }

    let client = if args.command.needs_database() {
        let url = match config.database_url() {
            Ok(url) => url,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                process::exit(1);
            }
        };
        match PostgresClient::connect(url) {
            Ok(c) => Some(c),
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
    } else {
        None
    };

    let client = client.as_ref().map(|c| c as &dyn DatabaseClient);
    match args.command.run(&config, client) {
        Ok(output) => {
            println!("{}", output.text);
            if output.failed {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
