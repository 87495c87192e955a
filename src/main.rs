use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::Parser;
use log::{error, info};
use vout_gtk::{
    host::RenderFormat,
    painter::PaintMode,
    toolkit::{gtk_toolkit::GtkToolkit, headless::HeadlessToolkit, Toolkit},
    VideoOutput, VoutConfig, VoutHost, VoutModule,
};

mod player;

#[derive(Parser, Debug)]
#[command(version, about = "Plays a test pattern through the handheld video output")]
struct Cli {
    /// Paint into memory instead of a GTK window.
    #[arg(long)]
    headless: bool,

    /// Screen depth to negotiate.
    #[arg(long, default_value_t = 16)]
    depth: u32,

    #[arg(long, default_value_t = 300)]
    frames: u64,

    #[arg(long, default_value_t = 25)]
    fps: u32,

    /// Overrides the configured paint mode.
    #[arg(long, value_enum)]
    paint_mode: Option<PaintMode>,

    /// Settings file instead of the user's configuration.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match VoutConfig::load_path(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Couldn't load {:?}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => VoutConfig::load(),
    };
    if let Some(mode) = cli.paint_mode {
        config.set_paint_mode(mode);
    }

    let toolkit: Arc<dyn Toolkit> = match cli.headless {
        true => Arc::new(HeadlessToolkit::new(cli.depth)),
        false => Arc::new(GtkToolkit::new(cli.depth)),
    };

    let mut vout = match VideoOutput::open(toolkit, config) {
        Ok(vout) => vout,
        Err(_) => return ExitCode::FAILURE,
    };

    let mut host = VoutHost::new(RenderFormat::default());
    if let Err(e) = vout.init(&mut host) {
        error!("init failed: {}", e);
        vout.close();
        return ExitCode::FAILURE;
    }

    let shown = player::Player::new(cli.fps).run(&mut vout, &mut host, cli.frames);
    info!("{} of {} frames displayed", shown, cli.frames);

    vout.end(&mut host);
    vout.close();

    ExitCode::SUCCESS
}
