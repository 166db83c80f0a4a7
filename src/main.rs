//! llc-mosaic - Assemble a synthetic LLC dataset into a mosaic and summarize it.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use llc_mosaic::assemble::{Centering, FaceSelection, LlcTransformation, VariableSelection};
use llc_mosaic::config::RearrangeConfig;
use llc_mosaic::remap::roll_half;
use llc_mosaic::synthetic::llc_dataset;
use llc_mosaic::util::format_dataset;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Transform {
    /// Arctic crown of an arbitrary face subset
    Crown,
    /// 3x3 mosaic around the pole
    Centered,
}

#[derive(Parser, Debug)]
#[command(name = "llc-mosaic")]
#[command(about = "Stitch LLC grid faces into a single mosaic", long_about = None)]
struct Args {
    /// Face size of the synthetic grid
    #[arg(long, default_value_t = 90)]
    size: usize,

    /// Which mosaic to build
    #[arg(long, value_enum, default_value_t = Transform::Crown)]
    transform: Transform,

    /// Atlantic, Pacific or Arctic (centered only)
    #[arg(long, default_value = "Atlantic")]
    centering: Centering,

    /// `all` or a comma-separated list of face indices
    #[arg(long, default_value = "all")]
    faces: FaceSelection,

    /// `all` or a comma-separated list of variable names
    #[arg(long, default_value = "all")]
    vars: VariableSelection,

    /// Drop variables that keep a face axis
    #[arg(long)]
    drop: bool,

    /// Roll the result by half its width
    #[arg(long)]
    recenter: bool,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        let file = File::create(log_path)?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting llc-mosaic");
    }

    if args.size == 0 {
        bail!("--size must be at least 1");
    }

    let transform = LlcTransformation::new(RearrangeConfig::from_env())?;
    let ds = llc_dataset(args.size);

    let mut mosaic = match args.transform {
        Transform::Crown => {
            transform.arctic_crown(&ds, &args.vars, args.centering, &args.faces, args.drop)?
        }
        Transform::Centered => {
            transform.arctic_centered(&ds, &args.vars, args.centering, &args.faces, args.drop)?
        }
    };

    if args.recenter {
        let axes = &transform.config().axes;
        mosaic = roll_half(&mosaic, &axes.x, &axes.xp1);
    }

    let title = format!(
        "{:?} mosaic, {} centering, face size {}",
        args.transform, args.centering, args.size
    );
    print!("{}", format_dataset(&mosaic, &title));
    Ok(())
}
