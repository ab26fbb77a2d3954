use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use warehouse_nav::config::{CliArgs, ViewerConfig};
use warehouse_nav::scene::{self, Scene};
use warehouse_nav::viewer::Viewer;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Init tracing
    let filter = if args.verbose {
        EnvFilter::new("warehouse_nav=debug")
    } else {
        EnvFilter::new("warehouse_nav=info")
    };
    if args.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config: ViewerConfig = args.into();

    // Configure rayon thread pool
    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure rayon thread pool")?;
    }

    let scene = match Scene::load(&config) {
        Ok(scene) => scene,
        Err(e) => {
            error!(%e, "Scene load failed");
            return Err(anyhow::anyhow!(e)).context("warehouse-nav failed to load site data");
        }
    };

    if config.dry_run {
        info!("--dry-run: reporting load statistics only");
        scene::print_load_summary(&scene);
        return Ok(());
    }

    let mut viewer = Viewer::new(&scene, config.camera.clone(), config.viewport);
    for step in &config.steps {
        viewer
            .apply(step)
            .with_context(|| format!("Navigation step {step:?} failed"))?;
    }

    let json = serde_json::to_string_pretty(&viewer.state()).context("Failed to serialize view state")?;
    println!("{json}");
    Ok(())
}
