use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> std::process::ExitCode {
    // .env must be loaded before the config is read
    dotenv().ok();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "server", event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    // Thread count: config.toml first, then TOKIO_WORKER_THREADS
    let worker_threads = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg.server.worker_threads,
        Err(_) => std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()),
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to build tokio runtime: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    rt.block_on(async move {
        // server::run installs the subscriber, so the start event is emitted from inside the task
        let server_task = tokio::spawn(async move {
            info!(service = "server", event = "start", %service_id, pid, version, "system role server starting");
            server::run().await
        });

        tokio::select! {
            res = server_task => match res {
                Ok(Ok(())) => {
                    info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
                    std::process::ExitCode::SUCCESS
                }
                Ok(Err(e)) => {
                    error!(service = "server", event = "run_failed", error = %e, "server::run returned error");
                    eprintln!("server failed: {e:#}");
                    std::process::ExitCode::FAILURE
                }
                Err(e) => {
                    error!(service = "server", event = "task_join_error", error = %e, "server task join error");
                    std::process::ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(service = "server", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
                std::process::ExitCode::SUCCESS
            }
        }
    })
}
