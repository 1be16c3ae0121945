use clap::Parser;
use std::path::PathBuf;

use autocrop::FitMode;

#[derive(Parser)]
#[command(
    name = "autocrop",
    version,
    about = "Detect the content bounding box of an image and plan a crop",
    after_help = "The JSON report is printed to stdout. On failure autocrop exits with a \
non-zero status and prints the error variant with its fields to stderr \
(for example `Error: InputNotFound { path: \"scan.png\" }`).\n\
Logging goes to stderr; --log enables it at debug level and RUST_LOG \
overrides the filter (e.g. RUST_LOG=autocrop=trace)."
)]
pub struct CliArgs {
    /// Input image (png, jpeg, bmp or tiff)
    #[arg(short, long)]
    pub input: PathBuf,

    /// JSON config file with `analyzer` and `crop` sections; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Color distance (0-255) at or below which a pixel counts as background
    #[arg(short, long)]
    pub threshold: Option<i32>,

    /// Border probe tolerance (0.0 strict .. 1.0 most permissive)
    #[arg(long)]
    pub bucket_tolerance: Option<f32>,

    /// Padding around the detected box, in percent of its size
    #[arg(short, long)]
    pub padding: Option<f64>,

    /// Target aspect ratio, as a number (1.5) or W:H (3:2)
    #[arg(short, long)]
    pub aspect: Option<String>,

    /// Factor mapping analysis coordinates to output coordinates
    #[arg(long)]
    pub scale: Option<f64>,

    /// Keep the region inside the image (crop) or allow it to grow past it (pad)
    #[arg(long, value_enum)]
    pub mode: Option<FitMode>,

    /// Scan rows in parallel
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Pretty-print the JSON report
    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    /// Enable logging to stderr (filter taken from RUST_LOG when set)
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
