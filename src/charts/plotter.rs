//! Chart Plotter Module
//! Bar-chart rendering of numeric columns using egui_plot.

use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Plot};
use polars::prelude::*;
use thiserror::Error;

use crate::data::numeric_columns;

/// Series colors: first and second numeric column.
pub const PALETTE: [Color32; 2] = [
    Color32::from_rgb(52, 152, 219), // Blue
    Color32::from_rgb(231, 76, 60),  // Red
];

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No numeric columns available for visualization")]
    NoNumericData,
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Values of one plotted column, keyed by row index. Nulls carry NaN
/// and are skipped when drawing.
#[derive(Debug)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Creates bar charts from the table's numeric columns.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Extract up to the first two numeric columns, in table order.
    pub fn bar_chart_series(df: &DataFrame) -> Result<Vec<ChartSeries>, ChartError> {
        let numeric = numeric_columns(df);
        if numeric.is_empty() {
            return Err(ChartError::NoNumericData);
        }

        let mut series = Vec::new();
        for name in numeric.iter().take(2) {
            let casted = df.column(name)?.cast(&DataType::Float64)?;
            let values = casted
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            series.push(ChartSeries {
                name: name.clone(),
                values,
            });
        }
        Ok(series)
    }

    /// Draw grouped bars keyed by row index.
    pub fn draw_bar_chart(ui: &mut egui::Ui, plot_id: &str, series: &[ChartSeries]) {
        Plot::new(plot_id.to_string())
            .height(220.0)
            .legend(Legend::default())
            .x_axis_label("Row")
            .y_axis_label("Value")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                let group_width = 0.8 / series.len().max(1) as f64;
                for (series_idx, s) in series.iter().enumerate() {
                    let offset = (series_idx as f64 + 0.5) * group_width - 0.4;
                    let bars: Vec<Bar> = s
                        .values
                        .iter()
                        .enumerate()
                        .filter(|(_, v)| v.is_finite())
                        .map(|(i, &v)| Bar::new(i as f64 + offset, v).width(group_width * 0.9))
                        .collect();

                    plot_ui.bar_chart(
                        BarChart::new(bars)
                            .color(PALETTE[series_idx % PALETTE.len()])
                            .name(&s.name),
                    );
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_the_first_two_numeric_columns_in_order() {
        let df = df!(
            "label" => ["a", "b"],
            "x" => [1i64, 2],
            "y" => [0.5f64, 1.5],
            "z" => [9i64, 9]
        )
        .unwrap();
        let series = ChartPlotter::bar_chart_series(&df).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "x");
        assert_eq!(series[1].name, "y");
        assert_eq!(series[0].values, vec![1.0, 2.0]);
    }

    #[test]
    fn single_numeric_column_yields_one_series() {
        let df = df!("only" => [1i64, 2, 3]).unwrap();
        let series = ChartPlotter::bar_chart_series(&df).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn all_text_table_signals_no_numeric_data() {
        let df = df!("a" => ["x"], "b" => ["y"]).unwrap();
        let err = ChartPlotter::bar_chart_series(&df).unwrap_err();
        assert!(matches!(err, ChartError::NoNumericData));
    }

    #[test]
    fn nulls_become_nan_placeholders() {
        let df = df!("v" => [Some(1.0f64), None]).unwrap();
        let series = ChartPlotter::bar_chart_series(&df).unwrap();
        assert_eq!(series[0].values[0], 1.0);
        assert!(series[0].values[1].is_nan());
    }
}
