use std::path::{Path, PathBuf};

use anyhow::Context;
use markpea::{Annotation, AnnotationTool, EditorConfig, ExportFormat, ImageSurface};

const USAGE: &str = "usage: markpea <base-image> <annotations.json> <output>";

struct Args {
    base: PathBuf,
    annotations: PathBuf,
    output: PathBuf,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = std::env::args_os().skip(1);
    let (Some(base), Some(annotations), Some(output), None) =
        (args.next(), args.next(), args.next(), args.next())
    else {
        anyhow::bail!(USAGE);
    };
    Ok(Args {
        base: base.into(),
        annotations: annotations.into(),
        output: output.into(),
    })
}

/// Parse a JSON array of annotations, skipping records that don't parse
fn load_annotations(path: &Path) -> anyhow::Result<Vec<Annotation>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array", path.display()))?;

    let mut annotations = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Annotation>(record) {
            Ok(annotation) => annotations.push(annotation),
            Err(err) => log::warn!("Skipping annotation #{index}: {err}"),
        }
    }
    Ok(annotations)
}

fn output_format(path: &Path, fallback: ExportFormat) -> ExportFormat {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(ExportFormat::from_extension)
        .unwrap_or_else(|| {
            log::warn!(
                "Unknown output extension for {}, writing {}",
                path.display(),
                fallback.mime_type()
            );
            fallback
        })
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = EditorConfig::load();
    let base = image::open(&args.base)
        .with_context(|| format!("failed to open {}", args.base.display()))?
        .to_rgba8();
    let annotations = load_annotations(&args.annotations)?;
    log::info!(
        "Replaying {} annotations onto {}x{} image",
        annotations.len(),
        base.width(),
        base.height()
    );

    let mut surface = ImageSurface::new(base);
    let mut tool = AnnotationTool::from_config(&mut surface, &config);
    for annotation in annotations {
        tool.commit(annotation);
    }
    tool.redraw();

    let format = output_format(&args.output, config.export_format);
    tool.download_image(&args.output, format, config.export_quality)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    run(parse_args()?)
}
