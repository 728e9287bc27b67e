// ============================================================================
// Chart Overlay Manager
// ============================================================================
// Owns the single shared chart instance. State machine:
//
//   Empty -> SingleView(primary) -> Comparison(primary, overlays...) -> Empty
//
// Replacing the primary destroys and recreates the instance so the axes and
// title swap atomically; adding an overlay never changes the primary, so it
// mutates the live instance in place. There is never more than one instance.
// ============================================================================

use rand::Rng;
use ratatui::style::Color;
use tracing::{debug, info};

use crate::error::{DashError, Result};
use crate::models::NormalizedSeries;

/// Visual identity of one plotted series.
///
/// Channels are drawn independently on every assignment; the translucent
/// fill is derived from the same channels rather than drawn separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl SeriesColor {
    /// Draws three channels uniformly from the renderable range.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            r: rng.gen(),
            g: rng.gen(),
            b: rng.gen(),
        }
    }

    /// Line color.
    pub fn line(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }

    /// Companion fill: the same channels at 20% opacity over a dark
    /// background.
    pub fn fill(&self) -> Color {
        Color::Rgb(
            (self.r as u16 / 5) as u8,
            (self.g as u16 / 5) as u8,
            (self.b as u16 / 5) as u8,
        )
    }
}

/// One series on the chart together with its assigned color.
#[derive(Debug, Clone)]
pub struct PlottedSeries {
    pub series: NormalizedSeries,
    pub color: SeriesColor,
}

/// The live chart: title, axis labels, and the plotted series. The primary
/// is always at index 0.
#[derive(Debug, Clone)]
pub struct ChartInstance {
    pub primary_id: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<PlottedSeries>,
}

/// Observable mode of the chart, for the controller and for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    Empty,
    SingleView,
    Comparison,
}

/// Owns chart state transitions. At most one instance exists at a time.
#[derive(Debug, Default)]
pub struct ChartOverlay {
    instance: Option<ChartInstance>,
}

impl ChartOverlay {
    pub fn new() -> Self {
        Self { instance: None }
    }

    /// Plots `series` as the primary, destroying any existing instance.
    ///
    /// Valid from any state; always lands in SingleView.
    pub fn show_primary(&mut self, series: NormalizedSeries) {
        let color = SeriesColor::random();
        info!(
            commodity_id = series.commodity_id,
            points = series.len(),
            "Creating chart with new primary"
        );

        self.instance = Some(ChartInstance {
            primary_id: series.commodity_id,
            title: format!("{} Monthly Prices", series.label),
            x_label: "Date".to_string(),
            y_label: "Price ($)".to_string(),
            series: vec![PlottedSeries { series, color }],
        });
    }

    /// Overlays `series` on the existing chart.
    ///
    /// Fails with `NoActiveChart` when no primary exists; no instance is
    /// created in that case. A series already plotted for the same commodity
    /// is replaced rather than duplicated.
    pub fn add_overlay(&mut self, series: NormalizedSeries) -> Result<()> {
        let instance = self.instance.as_mut().ok_or(DashError::NoActiveChart)?;

        let color = SeriesColor::random();
        debug!(
            commodity_id = series.commodity_id,
            points = series.len(),
            "Adding overlay to chart"
        );

        instance
            .series
            .retain(|p| p.series.commodity_id != series.commodity_id);
        instance.series.push(PlottedSeries { series, color });
        Ok(())
    }

    /// Destroys the chart instance if present and drops the primary.
    pub fn clear(&mut self) {
        if self.instance.take().is_some() {
            info!("Chart cleared");
        }
    }

    /// The commodity that defines single-view mode, if any.
    pub fn primary_id(&self) -> Option<u32> {
        self.instance.as_ref().map(|i| i.primary_id)
    }

    pub fn instance(&self) -> Option<&ChartInstance> {
        self.instance.as_ref()
    }

    pub fn mode(&self) -> ChartMode {
        match &self.instance {
            None => ChartMode::Empty,
            Some(i) if i.series.len() == 1 => ChartMode::SingleView,
            Some(_) => ChartMode::Comparison,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
