use clap::Parser;
use log::{error, info};
use software_rasterizer::app::{Overrides, run_cli};
use software_rasterizer::io::config::Config;

/// CPU software rasterizer driven by a TOML scene description.
#[derive(Parser, Debug)]
#[command(name = "software-rasterizer", version)]
#[command(about = "Renders a TOML-described scene on the CPU and writes a PNG")]
struct Cli {
    /// Scene configuration file (TOML). Built-in reference scene when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Output image path.
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Fill triangles with the scanline edge walk instead of the bounding box.
    #[arg(long)]
    scanline: bool,

    /// Draw triangle edges only.
    #[arg(long)]
    wireframe: bool,
}

fn main() -> Result<(), String> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .format_level(true)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!("Loading config file: {}", path);
            Config::load(path).inspect_err(|e| error!("{}", e))?
        }
        None => {
            info!("No config given, using the reference scene");
            Config::default()
        }
    };

    let overrides = Overrides {
        output: cli.output,
        width: cli.width,
        height: cli.height,
        scanline: cli.scanline,
        wireframe: cli.wireframe,
    };

    run_cli(config, &overrides).inspect_err(|e| error!("Render failed: {}", e))
}
