use common::utils::logging::init_logging;
use configs::AppConfig;
use dotenvy::dotenv;
use store::global;
use store::metrics::encode_metrics;
use store::workload::{run_workers, WorkloadConfig};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Load config, falling back to defaults when the file is unreadable.
/// The load error is returned so it can be logged once tracing is up.
fn load_config() -> anyhow::Result<(AppConfig, Option<anyhow::Error>)> {
    let (mut cfg, load_err) = match configs::load_default() {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    cfg.normalize_and_validate()?;
    Ok((cfg, load_err))
}

fn main() -> anyhow::Result<()> {
    // 加载 .env（允许使用 RUST_LOG / CONFIG_PATH / STORE_WORKERS）
    dotenv().ok();
    let (config, load_err) = load_config()?;
    init_logging(&config.logging.format);
    if let Some(e) = load_err {
        warn!(config_path = %configs::config_path(), "Failed to load config file: {}, using defaults", e);
    }

    let run_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "store-demo",
            event = "panic",
            %run_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    info!(
        service = "store-demo",
        event = "start",
        %run_id,
        pid,
        version,
        workers = config.driver.workers,
        "store demo starting"
    );

    let workload = WorkloadConfig { workers: config.driver.workers, key_base: config.driver.key_base };
    let reports = run_workers(workload, global::instance)?;
    for report in &reports {
        info!(event = "lookup", worker = report.worker, key = report.key, "{}", report.lookup);
    }

    let store = global::instance();
    debug!(metrics = %encode_metrics(), "metrics snapshot");

    info!(
        service = "store-demo",
        event = "stop",
        %run_id,
        entries = store.len(),
        constructions = global::constructions(),
        "store demo finished"
    );
    Ok(())
}
