use std::fmt::Write;

use super::aggregator::AggregateView;
use crate::config::parameters::ParameterSet;
use crate::models::result_table::ResultTable;
use crate::models::sample::Sample;

const COLUMNS: [&str; 5] = ["Illumination", "Qualidade_Imagem", "ISO", "Abertura", "Taxa_Efetividade"];

fn write_row(out: &mut String, index_width: usize, index: usize, sample: &Sample) {
    let _ = writeln!(
        out,
        "{:>iw$}  {:>12.6}  {:>16.6}  {:>10.4}  {:>8.4}  {:>16.6}",
        index,
        sample.illumination(),
        sample.quality(),
        sample.sensitivity(),
        sample.aperture(),
        sample.effectiveness(),
        iw = index_width,
    );
}

/// Tabular dump of the result table.
///
/// With `preview_rows = Some(k)` and more than `2k` rows, only the first and
/// last `k` rows are shown around an ellipsis line.
pub fn format_table(table: &ResultTable, preview_rows: Option<usize>) -> String {
    let mut out = String::new();
    let index_width = table.len().saturating_sub(1).to_string().len();

    let _ = writeln!(
        out,
        "{:>iw$}  {:>12}  {:>16}  {:>10}  {:>8}  {:>16}",
        "", COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4],
        iw = index_width,
    );

    let samples = table.samples();
    match preview_rows {
        Some(k) if samples.len() > 2 * k => {
            for (i, sample) in samples.iter().enumerate().take(k) {
                write_row(&mut out, index_width, i, sample);
            }
            let _ = writeln!(out, "{:>iw$}  {:>12}", "...", "...", iw = index_width);
            let start = samples.len() - k;
            for (i, sample) in samples.iter().enumerate().skip(start) {
                write_row(&mut out, index_width, i, sample);
            }
        }
        _ => {
            for (i, sample) in samples.iter().enumerate() {
                write_row(&mut out, index_width, i, sample);
            }
        }
    }

    let _ = writeln!(out, "\n[{} rows x {} columns]", table.len(), COLUMNS.len());
    out
}

pub fn format_recognition_counts(view: &AggregateView) -> String {
    format!(
        "Positive recognitions (effectiveness > {t}): {}\nNegative recognitions (effectiveness <= {t}): {}",
        view.counts.recognized,
        view.counts.not_recognized,
        t = view.threshold,
    )
}

pub fn print_results_table(table: &ResultTable, preview_rows: Option<usize>) {
    println!("\nSimulation Results:");
    print!("{}", format_table(table, preview_rows));
}

pub fn print_summary(params: &ParameterSet, view: &AggregateView, seed: u64) {
    let c = &params.coefficients;
    let r = &params.ranges;
    println!("\nMonte Carlo Summary");
    println!("----------------------------------------");
    println!("Trials: {} (seed {})", view.sample_count, seed);
    println!("Model:");
    println!("  z = {} + {}*illumination + {}*quality + {}*iso + {}*aperture",
        c.beta0, c.beta1, c.beta2, c.beta3, c.beta4);
    println!("Sampling Ranges:");
    println!("  Illumination: [{}, {}) lux", r.illumination.min, r.illumination.max);
    println!("  Image Quality: [{}, {})", r.quality.min, r.quality.max);
    println!("  ISO: [{}, {})", r.sensitivity.min, r.sensitivity.max);
    println!("  Aperture: [{}, {})", r.aperture.min, r.aperture.max);
    println!("Results:");
    println!("  Illumination groups: {}", view.groups.len());
    println!("  Mean effectiveness: {:.4}", view.mean_effectiveness);
    println!("  Mean image quality: {:.4}", view.mean_quality);
    println!("  Recognition rate: {:.2}%", view.counts.recognition_rate() * 100.0);
    println!("{}", format_recognition_counts(view));
    println!("----------------------------------------");
}
