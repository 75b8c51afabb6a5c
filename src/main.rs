use std::sync::Arc;

use hyper::StatusCode;
use revers::config::DEFAULT_CONFIG_PATH;
use revers::server::signal::stop_on_shutdown_signal;
use revers::{logger, AppConfig, Request, Server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = AppConfig::load_from(&config_path)?;
    logger::init(&cfg.logging);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let has_static_root = cfg.server.static_path.is_some();
    let server = Arc::new(Server::with_logging(cfg.server, &cfg.logging).await?);

    server.get("/:organization/:repo", |req: Request| async move {
        let params = req.params().clone();
        req.json(&params, None, None)
    });

    server.handle_status(StatusCode::NOT_FOUND, move |req: Request| async move {
        if has_static_root {
            req.file("404.html", Some(StatusCode::NOT_FOUND), None).await
        } else {
            let path = req.location().path().to_string();
            req.json(
                &serde_json::json!({ "error": "Not Found", "path": path }),
                Some(StatusCode::NOT_FOUND),
                None,
            )
        }
    });

    stop_on_shutdown_signal(Arc::clone(&server));
    server.start().await?;
    Ok(())
}
