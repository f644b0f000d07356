use glowfield::config::{parse_number, BackdropConfig, Tint};
use glowfield::error::ConfigError;
use glowfield::snapshot::{render_snapshot, SnapshotOptions};
use glowfield::Vec2;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "\
usage: glowfield [options]

  --tint R,G,B       colour multiplier (default 1,1,1)
  --speed X          animation speed multiplier (default 1.0)
  --no-mouse         disable pointer attraction
  --reduced-motion   start with the static fallback
  --snapshot PATH    render headlessly to a PNG instead of opening a window
  --frames N         frames to run before the snapshot (default 120)
  --size WxH         snapshot viewport in logical pixels (default 800x600)
  --dpr X            snapshot device pixel ratio (default 1)
  --seed N           snapshot random seed

Environment: GLOWFIELD_TINT, GLOWFIELD_SPEED, GLOWFIELD_MOUSE; RUST_LOG for logging.
In the window: R toggles reduced motion, M toggles the mouse, Esc quits.";

/// Parsed command line.
#[derive(Debug, Clone)]
struct Args {
    config: BackdropConfig,
    reduced_motion: bool,
    snapshot: Option<PathBuf>,
    options: SnapshotOptions,
    help: bool,
}

fn parse_size(value: &str) -> Result<Vec2, ConfigError> {
    let invalid = || ConfigError::InvalidSize(value.to_string());
    let (w, h) = value.split_once(['x', 'X']).ok_or_else(invalid)?;
    let w: f32 = w.trim().parse().map_err(|_| invalid())?;
    let h: f32 = h.trim().parse().map_err(|_| invalid())?;
    if w.is_finite() && h.is_finite() && w >= 0.0 && h >= 0.0 {
        Ok(Vec2::new(w, h))
    } else {
        Err(invalid())
    }
}

fn parse_args<I>(base: BackdropConfig, args: I) -> Result<Args, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args {
        config: base,
        reduced_motion: false,
        snapshot: None,
        options: SnapshotOptions::default(),
        help: false,
    };

    let mut args = args.into_iter();
    while let Some(flag) = args.next() {
        let mut value = || args.next().ok_or_else(|| ConfigError::MissingValue(flag.clone()));
        match flag.as_str() {
            "--tint" => parsed.config.tint = value()?.parse::<Tint>()?,
            "--speed" => parsed.config.speed = parse_number("--speed", &value()?)?,
            "--no-mouse" => parsed.config.mouse_enabled = false,
            "--reduced-motion" => parsed.reduced_motion = true,
            "--snapshot" => parsed.snapshot = Some(PathBuf::from(value()?)),
            "--frames" => {
                let v = value()?;
                parsed.options.frames = v.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                    key: "--frames".to_string(),
                    value: v.clone(),
                })?;
            }
            "--size" => parsed.options.viewport = parse_size(&value()?)?,
            "--dpr" => parsed.options.device_pixel_ratio = parse_number("--dpr", &value()?)?,
            "--seed" => {
                let v = value()?;
                parsed.options.seed = Some(v.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                    key: "--seed".to_string(),
                    value: v.clone(),
                })?);
            }
            "-h" | "--help" => parsed.help = true,
            _ => return Err(ConfigError::UnknownFlag(flag.to_string())),
        }
    }
    parsed.options.reduced_motion = parsed.reduced_motion;
    parsed.options.output = parsed.snapshot.clone();
    Ok(parsed)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(BackdropConfig::from_env(), std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };
    if args.help {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    let result = if args.snapshot.is_some() {
        render_snapshot(args.config, &args.options)
            .map(|_| ())
            .map_err(|e| e.to_string())
    } else {
        glowfield::app::run(args.config, args.reduced_motion).map_err(|e| e.to_string())
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
