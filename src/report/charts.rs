//! @ai:module:intent Chart of per-run wall times
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator
//! @ai:module:stateless true

use crate::metrics::BenchmarkResults;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Generate all charts from results
    fn generate_all(&self, results: &BenchmarkResults, output_dir: &Path) -> Result<Vec<String>>;
}

/// @ai:intent Generates charts from benchmark results
pub struct ChartGenerator;

impl ChartGenerator {
    /// @ai:intent Create a new chart generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Upper bound of the y axis, leaving headroom above the slowest run
    /// @ai:effects pure
    fn y_limit(runtimes: &[f64]) -> f64 {
        let max = runtimes.iter().copied().fold(0.0_f64, f64::max);

        if max > 0.0 {
            max * 1.15
        } else {
            1.0
        }
    }

    /// @ai:intent Bar per measured run with the average as a horizontal line
    /// @ai:effects fs:write
    fn generate_runtime_chart(&self, results: &BenchmarkResults, output_path: &Path) -> Result<()> {
        let runtimes = &results.state.runtimes;
        let run_count = runtimes.len() as u32;
        let average = results.summary.average_runtime;

        let root = BitMapBackend::new(output_path, (800, 500)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Wall Time per Run", ("sans-serif", 25))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..run_count).into_segmented(), 0f64..Self::y_limit(runtimes))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Seconds")
            .x_desc("Run")
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(i) => format!("{}", i + 1),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.7).filled())
                .margin(10)
                .data(runtimes.iter().enumerate().map(|(i, t)| (i as u32, *t))),
        )?;

        chart
            .draw_series(LineSeries::new(
                vec![
                    (SegmentValue::Exact(0), average),
                    (SegmentValue::Exact(run_count), average),
                ],
                &RED,
            ))?
            .label(format!("Average {:.3}s", average))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Generate all charts
    /// @ai:effects fs:write
    fn generate_all(&self, results: &BenchmarkResults, output_dir: &Path) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        let mut generated = Vec::new();

        if results.state.runtimes.is_empty() {
            tracing::warn!("No runtimes recorded, skipping runtime chart");
            return Ok(generated);
        }

        let runtime_path = output_dir.join("runtimes.png");
        self.generate_runtime_chart(results, &runtime_path)?;
        generated.push("runtimes.png".to_string());

        Ok(generated)
    }
}
