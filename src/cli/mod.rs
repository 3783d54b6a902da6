//! Command-line interface for the raster comparison tool.

use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{CompareConfig, OutputFormat, TotalsMode};
use crate::error::{CompareError, Result};
use crate::io::{is_raw, load_image, load_mask, MaskKind, RawGeometry};
use crate::metrics::{Comparator, ComponentSelection, Metric, MetricSelection, RoiWeights};
use crate::raster::{Mask, Raster, Shape};
use crate::report::{render, ReportOptions};

/// Raster Comparison Tool
///
/// Computes distortion metrics (MAE, PAE, MSE, RMSE, ME, SNR, PSNR,
/// PSNR-Salomon, SNR-variance, EQUAL) between a reference and a test image.
#[derive(Parser, Debug)]
#[command(name = "rastercmp")]
#[command(version)]
#[command(about = "Distortion metrics between a reference and a test image")]
#[command(long_about = None)]
pub struct Cli {
    /// Reference image path
    #[arg(short, long)]
    pub reference: PathBuf,

    /// Test image path
    #[arg(short, long)]
    pub test: PathBuf,

    /// Geometry of a raw reference image: zSize ySize xSize sampleType byteOrder
    #[arg(long, num_args = 5, value_names = ["Z", "Y", "X", "TYPE", "ORDER"])]
    pub reference_geometry: Option<Vec<u32>>,

    /// Geometry of a raw test image: zSize ySize xSize sampleType byteOrder
    #[arg(long, num_args = 5, value_names = ["Z", "Y", "X", "TYPE", "ORDER"])]
    pub test_geometry: Option<Vec<u32>>,

    /// Compare a single component (1-based)
    #[arg(short, long)]
    pub component: Option<usize>,

    /// Mask image; ROI labels when --roi is given, inclusion flags otherwise
    #[arg(short, long)]
    pub mask: Option<PathBuf>,

    /// Invert the mask
    #[arg(long)]
    pub inverse: bool,

    /// Reference values excluded from the comparison
    #[arg(long, num_args = 1.., allow_negative_numbers = true)]
    pub no_data: Option<Vec<f64>>,

    /// Metric to report
    #[arg(long, value_enum)]
    pub measure: Option<MetricArg>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Per-component results, totals, or both
    #[arg(long, value_enum)]
    pub totals: Option<TotalsArg>,

    /// ROI weight table as label/weight pairs
    #[arg(long, num_args = 2.., allow_negative_numbers = true)]
    pub roi: Option<Vec<f64>>,

    /// Pixel bit depth per component; the last value repeats
    #[arg(short, long, num_args = 1.., allow_negative_numbers = true)]
    pub bit_depth: Option<Vec<i32>>,

    /// TOML configuration file; command-line options take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Worker threads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Precomputed energy file (ignored)
    #[arg(long, hide = true)]
    pub energy_file: Option<PathBuf>,

    /// Precomputed variance file (ignored)
    #[arg(long, hide = true)]
    pub variance_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Metric argument.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricArg {
    /// Every metric
    #[value(alias = "0")]
    All,
    /// Mean absolute error
    #[value(alias = "1")]
    Mae,
    /// Peak absolute error
    #[value(alias = "2")]
    Pae,
    /// Mean squared error
    #[value(alias = "3")]
    Mse,
    /// Root mean squared error
    #[value(alias = "4")]
    Rmse,
    /// Mean signed error
    #[value(alias = "5")]
    Me,
    /// Signal-to-noise ratio
    #[value(alias = "6")]
    Snr,
    /// Peak signal-to-noise ratio
    #[value(alias = "7")]
    Psnr,
    /// Salomon PSNR
    #[value(alias = "8")]
    PsnrSalomon,
    /// Signal-to-noise ratio from variance
    #[value(alias = "9")]
    SnrVariance,
    /// Exact equality
    #[value(alias = "10")]
    Equal,
}

impl From<MetricArg> for MetricSelection {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::All => MetricSelection::All,
            MetricArg::Mae => MetricSelection::Only(Metric::Mae),
            MetricArg::Pae => MetricSelection::Only(Metric::Pae),
            MetricArg::Mse => MetricSelection::Only(Metric::Mse),
            MetricArg::Rmse => MetricSelection::Only(Metric::Rmse),
            MetricArg::Me => MetricSelection::Only(Metric::Me),
            MetricArg::Snr => MetricSelection::Only(Metric::Snr),
            MetricArg::Psnr => MetricSelection::Only(Metric::Psnr),
            MetricArg::PsnrSalomon => MetricSelection::Only(Metric::PsnrSalomon),
            MetricArg::SnrVariance => MetricSelection::Only(Metric::SnrVariance),
            MetricArg::Equal => MetricSelection::Only(Metric::Equal),
        }
    }
}

/// Report format argument.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    /// One labelled line per metric
    #[value(alias = "0")]
    Long,
    /// Colon-separated values
    #[value(alias = "1")]
    Short,
    /// JSON document
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Long => OutputFormat::Long,
            FormatArg::Short => OutputFormat::Short,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Totals argument.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TotalsArg {
    /// Per-component results only
    #[value(alias = "0")]
    Components,
    /// Per-component results and totals
    #[value(alias = "1")]
    Both,
    /// Totals only
    #[value(alias = "2")]
    TotalsOnly,
}

impl From<TotalsArg> for TotalsMode {
    fn from(arg: TotalsArg) -> Self {
        match arg {
            TotalsArg::Components => TotalsMode::Components,
            TotalsArg::Both => TotalsMode::Both,
            TotalsArg::TotalsOnly => TotalsMode::TotalsOnly,
        }
    }
}

/// Run the CLI application.
pub fn run(cli: Cli) -> Result<()> {
    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .init();
    } else if !cli.quiet {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
    }

    let output = compare(&cli)?;
    print!("{}", output);
    Ok(())
}

/// Run a comparison and return the rendered report.
fn compare(cli: &Cli) -> Result<String> {
    let config = build_config(cli)?;

    let reference_geometry = parse_geometry(cli.reference_geometry.as_deref())?;
    let test_geometry = parse_geometry(cli.test_geometry.as_deref())?;
    let reference = load_image(&cli.reference, reference_geometry.as_ref())?;
    let test = load_image(&cli.test, test_geometry.as_ref())?;

    let roi = config.roi_table()?;
    let mask = build_mask(
        cli.mask.as_deref(),
        &config,
        roi.is_some(),
        &reference.raster,
        &test.raster,
    )?;

    let bit_depths: Vec<i32> = match &config.bit_depths {
        Some(depths) => depths.clone(),
        None => reference.bit_depths.iter().map(|&b| b as i32).collect(),
    };

    let mut comparator = Comparator::new(&reference.raster, &test.raster, &bit_depths)
        .component(config.selection())
        .metrics(config.metric)
        .inverted(config.inverse)
        .threads(config.threads);
    if let Some(mask) = &mask {
        comparator = comparator.mask(mask);
    }
    if let Some(roi) = &roi {
        comparator = comparator.roi_weights(roi);
    }
    let result = comparator.compare()?;

    let options = ReportOptions {
        format: config.format,
        totals: config.totals,
        metrics: config.metric,
    };
    render(&result, &options)
}

/// Merge the configuration file with command-line overrides.
fn build_config(cli: &Cli) -> Result<CompareConfig> {
    let mut config = match &cli.config {
        Some(path) => CompareConfig::from_toml_file(path)?,
        None => CompareConfig::default(),
    };

    if let Some(depths) = &cli.bit_depth {
        config.bit_depths = Some(depths.clone());
    }
    if let Some(component) = cli.component {
        config.component = Some(component);
    }
    if cli.inverse {
        config.inverse = true;
    }
    if let Some(values) = &cli.no_data {
        config.no_data_values = Some(values.clone());
    }
    if let Some(pairs) = &cli.roi {
        config.roi_weights = Some(RoiWeights::from_pairs(pairs)?.entries().to_vec());
    }
    if let Some(measure) = cli.measure {
        config.metric = measure.into();
    }
    if let Some(format) = cli.format {
        config.format = format.into();
    }
    if let Some(totals) = cli.totals {
        config.totals = totals.into();
    }
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if cli.energy_file.is_some() || cli.variance_file.is_some() {
        log::warn!("Precomputed energy and variance files are ignored; both are computed from the images");
    }

    config.validate()?;
    Ok(config)
}

fn parse_geometry(values: Option<&[u32]>) -> Result<Option<RawGeometry>> {
    values.map(RawGeometry::from_values).transpose()
}

/// Build the mask from a mask file or from no-data values.
fn build_mask(
    path: Option<&Path>,
    config: &CompareConfig,
    weighted: bool,
    reference: &Raster,
    test: &Raster,
) -> Result<Option<Mask>> {
    let no_data = config.no_data_values.as_deref().filter(|v| !v.is_empty());
    let selection = config.selection();

    let mut mask = match (path, no_data) {
        (Some(_), Some(_)) => {
            return Err(CompareError::MaskConflict(
                "a mask file and no-data values cannot be combined".into(),
            ))
        }
        (Some(path), None) => {
            let kind = if weighted {
                MaskKind::Labels
            } else {
                MaskKind::Inclusion
            };
            let shape = if is_raw(path) {
                Some(raw_mask_shape(path, test.shape())?)
            } else {
                None
            };
            fit_mask(load_mask(path, kind, shape)?, test.shape(), selection)?
        }
        (None, Some(values)) => {
            log::debug!("Generating mask from {} no-data values", values.len());
            fit_mask(Mask::from_no_data(reference, values), test.shape(), selection)?
        }
        (None, None) => return Ok(None),
    };

    if config.inverse {
        if weighted {
            mask.invert_labels();
        } else {
            mask.invert_flags();
        }
    }
    Ok(Some(mask))
}

/// Shape of a raw mask file, inferred from its size and the test plane.
fn raw_mask_shape(path: &Path, test: Shape) -> Result<Shape> {
    let len = fs::metadata(path)?.len() as usize;
    let plane = test.plane_len();
    if len == 0 || len % plane != 0 {
        return Err(CompareError::Mask(format!(
            "raw mask {} has {} bytes, not a multiple of the {}x{} plane",
            path.display(),
            len,
            test.height,
            test.width
        )));
    }
    Ok(Shape::new(len / plane, test.height, test.width))
}

/// Match a mask to the test raster's component count.
///
/// Single-plane masks are replicated. When one component is compared
/// against a single-plane test raster, the selected mask plane is kept.
fn fit_mask(mask: Mask, test: Shape, selection: ComponentSelection) -> Result<Mask> {
    let shape = mask.shape();
    if shape == test {
        return Ok(mask);
    }
    if shape.components == 1 {
        return mask.broadcast(test.components);
    }
    match selection {
        ComponentSelection::Single(z)
            if test.components == 1 && z < shape.components && shape.same_plane(&test) =>
        {
            Mask::new(test, mask.plane(z).to_vec())
        }
        _ => Ok(mask),
    }
}
