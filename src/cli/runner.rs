use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use autocrop::{AutocropConfig, find_crop_in_image};

use super::args::CliArgs;
use super::errors::AppError;

/// Parse `1.5` or `16:9` into a width/height ratio.
fn parse_aspect(value: &str) -> Result<f32, AppError> {
    let invalid = || AppError::InvalidAspect {
        aspect: value.to_string(),
    };

    let aspect = match value.split_once(':') {
        Some((w, h)) => {
            let w: f32 = w.trim().parse().map_err(|_| invalid())?;
            let h: f32 = h.trim().parse().map_err(|_| invalid())?;
            w / h
        }
        None => value.trim().parse().map_err(|_| invalid())?,
    };

    if aspect.is_finite() && aspect > 0.0 {
        Ok(aspect)
    } else {
        Err(invalid())
    }
}

/// Filter used when `--log` is passed without `RUST_LOG`
const DEFAULT_LOG_DIRECTIVES: &str = "debug";

/// `RUST_LOG` wins over the default when it holds any directive.
fn log_directives(env: Option<String>) -> String {
    env.filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_DIRECTIVES.to_string())
}

fn init_logging(env: Option<String>) {
    let directives = log_directives(env);
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid log filter {directives:?}: {e}");
        EnvFilter::new(DEFAULT_LOG_DIRECTIVES)
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &CliArgs) -> Result<AutocropConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            AutocropConfig::from_json_file(path)?
        }
        None => AutocropConfig::default(),
    };

    if let Some(threshold) = args.threshold {
        config.analyzer.color_threshold = threshold;
    }
    if let Some(tolerance) = args.bucket_tolerance {
        config.analyzer.bucket_tolerance = tolerance;
    }
    if args.parallel {
        config.analyzer.parallel = true;
    }
    if let Some(padding) = args.padding {
        config.crop.padding_percent = padding;
    }
    if let Some(aspect) = &args.aspect {
        config.crop.aspect = Some(parse_aspect(aspect)?);
    }
    if let Some(scale) = args.scale {
        config.crop.scale = scale;
    }
    if let Some(mode) = args.mode {
        config.crop.mode = mode;
    }

    config.analyzer.validate()?;
    Ok(config)
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let env_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    if args.log || env_log.is_some() {
        init_logging(env_log);
    }

    let config = build_config(&args)?;

    if !args.input.is_file() {
        return Err(AppError::InputNotFound {
            path: args.input.display().to_string(),
        }
        .into());
    }

    info!("Analyzing: {:?}", args.input);
    let image = image::open(&args.input).map_err(AppError::from)?;
    let report = find_crop_in_image(&image, &config).map_err(AppError::from)?;

    if !report.analysis.success {
        warn!("No reliable content box found in {:?}; crop keeps the full image", args.input);
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&report).map_err(AppError::from)?
    } else {
        serde_json::to_string(&report).map_err(AppError::from)?
    };
    println!("{json}");

    info!(
        "Done: {}x{} -> {}",
        report.width, report.height, report.crop.region
    );
    Ok(())
}
