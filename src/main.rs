use std::env;

use clap::Parser;

#[tokio::main]
async fn main() {
    let raw_args: Vec<String> = env::args().collect();
    if raw_args.get(1).map(|s| s.as_str()) == Some("serve") {
        let port = raw_args
            .get(2)
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        if let Err(e) = interest::api::run_http_server(port).await {
            eprintln!("Server error: {e}");
            std::process::exit(1);
        }
        return;
    }

    let cli = interest::api::Cli::parse();
    match interest::api::run_one_shot(&cli) {
        Ok(report) => print!("{report}"),
        Err(e) => {
            eprintln!("Invalid input: {e}");
            std::process::exit(2);
        }
    }
}
