//! Export a filtered copy.

use std::path::PathBuf;

use cutline_common::config::AppConfig;
use cutline_edit_model::filters::{FilterParam, FilterState};
use cutline_export::ExportKind;

use crate::{ExportTarget, FilterArgs};

impl FilterArgs {
    fn values(&self) -> [(FilterParam, Option<f64>); 8] {
        [
            (FilterParam::Brightness, self.brightness),
            (FilterParam::Contrast, self.contrast),
            (FilterParam::Saturation, self.saturation),
            (FilterParam::Blur, self.blur),
            (FilterParam::Sepia, self.sepia),
            (FilterParam::Grayscale, self.grayscale),
            (FilterParam::Invert, self.invert),
            (FilterParam::Hue, self.hue),
        ]
    }
}

pub async fn run(
    config: &AppConfig,
    path: PathBuf,
    args: FilterArgs,
    target: ExportTarget,
) -> anyhow::Result<()> {
    let mut filters = FilterState::new();
    for (param, value) in args.values() {
        if let Some(value) = value {
            let applied = filters.set_param(param, value);
            println!("  {:<11} {}", param.label(), filters.readout(param));
            if applied != value {
                tracing::warn!(param = param.name(), requested = value, applied, "Filter value clamped");
            }
        }
    }

    println!("Preview: {}", filters.to_preview_style());

    let kind = ExportKind::filter(&filters)
        .ok_or_else(|| anyhow::anyhow!("No active filters; nothing to export"))?;

    if let ExportKind::Filter(graph) = &kind {
        println!("Filter graph: {graph}");
    }
    println!("Filtering {}", path.display());
    super::run_export(config, &path, kind, &target).await
}
