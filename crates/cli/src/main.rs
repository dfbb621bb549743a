use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    crumb_cli::run().await
}
