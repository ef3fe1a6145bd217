mod app;
mod highlight;
mod layout;
mod route;
mod topology;
mod util;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::layout::LayoutConfig;

#[derive(Debug, Parser)]
#[command(author, version, about = "Clustered network topology viewer")]
struct Args {
    /// Topology document (JSON) to open on startup.
    document: Option<PathBuf>,

    /// Width of the layout canvas in world units.
    #[arg(long, default_value_t = 1600.0, value_parser = positive_f32)]
    canvas_width: f32,

    /// Height of the layout canvas in world units.
    #[arg(long, default_value_t = 1200.0, value_parser = positive_f32)]
    canvas_height: f32,

    /// Simulation ticks per second of wall time.
    #[arg(long, default_value_t = 60.0, value_parser = positive_f32)]
    tick_rate: f32,
}

impl Args {
    fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            tick_rate: self.tick_rate,
            ..LayoutConfig::default()
        }
    }
}

fn positive_f32(raw: &str) -> Result<f32, String> {
    let value = raw
        .parse::<f32>()
        .map_err(|error| format!("`{raw}` is not a number: {error}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("`{raw}` must be a positive number"))
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.layout_config();
    log::debug!("starting with {args:?}");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1440.0, 920.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "topograph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::TopologyApp::new(
                cc,
                args.document.clone(),
                config,
            )))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_canvas_and_rate() {
        let args = Args::parse_from([
            "topograph",
            "net.json",
            "--canvas-width",
            "800",
            "--tick-rate",
            "30",
        ]);
        assert_eq!(args.document, Some(PathBuf::from("net.json")));

        let config = args.layout_config();
        assert_eq!(config.canvas_width, 800.0);
        assert_eq!(config.canvas_height, 1200.0);
        assert_eq!(config.tick_rate, 30.0);
        assert_eq!(config.max_catch_up_steps, LayoutConfig::default().max_catch_up_steps);
    }

    #[test]
    fn rejects_non_positive_values() {
        assert!(Args::try_parse_from(["topograph", "--tick-rate", "0"]).is_err());
        assert!(Args::try_parse_from(["topograph", "--canvas-width", "-5"]).is_err());
        assert!(Args::try_parse_from(["topograph", "--canvas-height", "wide"]).is_err());
    }
}
