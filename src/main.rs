use clap::Parser;
use log::warn;
use orbitview::app::{run_cli, run_gui};
use orbitview::io::config::Config;

/// Software triangle rasterizer with an orbiting camera.
#[derive(Parser)]
#[command(name = "orbitview", version, about)]
struct Args {
    /// Path to the TOML scene configuration.
    #[arg(short, long, default_value = "orbitview.toml")]
    config: String,

    /// Render a single frame to an image instead of opening a window.
    #[arg(long)]
    headless: bool,

    /// Mesh to load, overriding the configured path.
    #[arg(short, long)]
    model: Option<String>,

    /// Output image path for headless renders.
    #[arg(short, long)]
    output: Option<String>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            warn!("{e}; using built-in defaults");
            Config::default()
        }
    };

    if let Some(model) = args.model {
        config.object.path = Some(model);
    }
    if let Some(output) = args.output {
        config.render.output = Some(output);
    }

    if args.headless {
        run_cli(config);
    } else {
        run_gui(config, &args.config);
    }
}
