//! Export a trimmed copy.

use std::path::PathBuf;

use cutline_common::config::AppConfig;
use cutline_edit_model::trim::TimeRange;
use cutline_export::ExportKind;

use crate::ExportTarget;

pub async fn run(
    config: &AppConfig,
    path: PathBuf,
    start: f64,
    end: f64,
    target: ExportTarget,
) -> anyhow::Result<()> {
    println!("Trimming {} to [{start}, {end}]", path.display());

    let kind = ExportKind::trim(&TimeRange { start, end })
        .ok_or_else(|| anyhow::anyhow!("Trim end must be after trim start"))?;

    super::run_export(config, &path, kind, &target).await
}
