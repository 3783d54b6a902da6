//! Text rendering of comparison results.

use crate::config::{OutputFormat, TotalsMode};
use crate::error::Result;
use crate::metrics::{AggregatePsnr, Metric, MetricSelection, MetricsResult};

/// Message printed in place of an undefined aggregate PSNR.
pub const MIXED_RANGE_MESSAGE: &str = "Pixel bit depth must be the same for each component.";

/// Options controlling what is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOptions {
    /// Report layout.
    pub format: OutputFormat,
    /// Report blocks.
    pub totals: TotalsMode,
    /// Metrics to print.
    pub metrics: MetricSelection,
}

/// A rendered metric value.
enum Cell {
    Number(f64),
    Flag(bool),
    Undefined,
}

/// Render a result.
pub fn render(result: &MetricsResult, options: &ReportOptions) -> Result<String> {
    match options.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)? + "\n"),
        OutputFormat::Long | OutputFormat::Short => Ok(render_text(result, options)),
    }
}

fn render_text(result: &MetricsResult, options: &ReportOptions) -> String {
    let long = options.format == OutputFormat::Long;
    let metrics = options.metrics.metrics();
    let reported = result.active_count();
    let mut out = String::new();

    let show_components = reported == 1 || options.totals != TotalsMode::TotalsOnly;
    let show_totals = reported > 1 && options.totals != TotalsMode::Components;

    if show_components {
        for (z, component) in result.active() {
            let cells = metrics.iter().map(|&m| {
                let cell = match m {
                    Metric::Mae => Cell::Number(component.mae),
                    Metric::Pae => Cell::Number(component.pae),
                    Metric::Mse => Cell::Number(component.mse),
                    Metric::Rmse => Cell::Number(component.rmse),
                    Metric::Me => Cell::Number(component.me),
                    Metric::Snr => Cell::Number(component.snr),
                    Metric::Psnr => Cell::Number(component.psnr),
                    Metric::PsnrSalomon => Cell::Number(component.psnr_salomon),
                    Metric::SnrVariance => Cell::Number(component.snr_variance),
                    Metric::Equal => Cell::Flag(component.equal),
                };
                (m, cell)
            });
            let header = format!("COMPONENT {}:", z);
            write_block(&mut out, &header, cells, long, result.weighted);
        }
    }

    if show_totals {
        let totals = &result.totals;
        let aggregate = |value: AggregatePsnr| match value {
            AggregatePsnr::Defined(v) => Cell::Number(v),
            AggregatePsnr::MixedRange => Cell::Undefined,
        };
        let cells = metrics.iter().map(|&m| {
            let cell = match m {
                Metric::Mae => Cell::Number(totals.mae),
                Metric::Pae => Cell::Number(totals.pae),
                Metric::Mse => Cell::Number(totals.mse),
                Metric::Rmse => Cell::Number(totals.rmse),
                Metric::Me => Cell::Number(totals.me),
                Metric::Snr => Cell::Number(totals.snr),
                Metric::Psnr => aggregate(totals.psnr),
                Metric::PsnrSalomon => aggregate(totals.psnr_salomon),
                Metric::SnrVariance => Cell::Number(totals.snr_variance),
                Metric::Equal => Cell::Flag(totals.equal),
            };
            (m, cell)
        });
        write_block(&mut out, "TOTALS:", cells, long, result.weighted);
    }

    out
}

fn write_block(
    out: &mut String,
    header: &str,
    cells: impl Iterator<Item = (Metric, Cell)>,
    long: bool,
    weighted: bool,
) {
    if long {
        out.push_str(header);
        out.push('\n');
        for (metric, cell) in cells {
            let value = match cell {
                Cell::Undefined => MIXED_RANGE_MESSAGE.to_string(),
                other => format_cell(&other),
            };
            out.push_str(&format!("  {:<7}: {}\n", label(metric, weighted), value));
        }
    } else {
        let values: Vec<String> = cells.map(|(_, cell)| format_cell(&cell)).collect();
        out.push_str(&values.join(":"));
        out.push('\n');
    }
}

/// Metric label in the long format.
pub fn label(metric: Metric, weighted: bool) -> &'static str {
    match metric {
        Metric::Mae => "MAE",
        Metric::Pae => "PAE",
        Metric::Mse if weighted => "P-MSE",
        Metric::Mse => "MSE",
        Metric::Rmse => "RMSE",
        Metric::Me => "ME",
        Metric::Snr => "SNR",
        Metric::Psnr if weighted => "P-PSNR",
        Metric::Psnr => "PSNR",
        Metric::PsnrSalomon => "PSNR-S",
        Metric::SnrVariance => "SNRVAR",
        Metric::Equal => "EQUAL",
    }
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(v) => format_value(*v),
        Cell::Flag(b) => b.to_string(),
        Cell::Undefined => "Error".to_string(),
    }
}

/// Format a metric value at single precision. Whole numbers keep a `.0`.
pub fn format_value(value: f64) -> String {
    let value = value as f32;
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        let text = value.to_string();
        if text.contains('.') {
            text
        } else {
            text + ".0"
        }
    }
}
