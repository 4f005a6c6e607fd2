use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    match tuluz_agendamento::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Server stopped: {}", e);
            eprintln!("tuluz_agendamento: {}", e);
            ExitCode::FAILURE
        }
    }
}
