use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    rtd_cli::run().await
}
