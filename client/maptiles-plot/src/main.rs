//! Render a geographic area from slippy-map tiles into an image.

mod args;

use std::process::ExitCode;

use clap::Parser;
use image::RgbaImage;
use maptiles::{
    AreaRenderer, FetchError, MapConfig, MarkerStyle, RasterSurface, RecordingSurface,
    TemplateFetcher, TileImage, TileKey, template::redact,
};

use crate::args::CliArgs;

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    if let Err(e) = args.validate() {
        e.exit();
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Config file first, then command-line overrides.
fn load_config(args: &CliArgs) -> maptiles::Result<MapConfig> {
    let mut config = match &args.config {
        Some(path) => MapConfig::load(path)?,
        None => MapConfig::default(),
    };
    if let Some(template) = &args.template {
        config.resource_locator_template = Some(template.clone());
    }
    if let Some(style) = &args.style {
        config.map_style_id.clone_from(style);
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &CliArgs) -> maptiles::Result<()> {
    let config = load_config(args)?;
    if args.dry_run {
        return dry_run(args, &config);
    }

    let template = config.locator_template(args.access_token.as_deref())?;
    tracing::info!(%template, "using tile source");
    let fetcher = TemplateFetcher::new(template, &config)?;
    let surface = RasterSurface::new(args.width, args.height);
    let mut renderer = AreaRenderer::new(surface, fetcher, &config)?;

    let summary = renderer.render_area(&args.area(), args.zoom)?;
    for marker in args.markers() {
        renderer.plot_point(marker, MarkerStyle::POINT)?;
    }
    tracing::info!(
        tiles = summary.tiles_drawn,
        fetched = summary.fetched,
        bytes = renderer.cache().size_bytes(),
        "rendered area"
    );

    renderer.surface().save(&args.output)
}

/// Run the renderer against a recording surface with placeholder tiles and
/// print what would be fetched.
fn dry_run(args: &CliArgs, config: &MapConfig) -> maptiles::Result<()> {
    // A missing token only matters once something is fetched.
    let template = config
        .locator_template(args.access_token.as_deref())
        .ok();
    let placeholder = |key: TileKey| -> Result<TileImage, FetchError> {
        Ok(TileImage::new(key, RgbaImage::new(1, 1)))
    };
    let mut renderer = AreaRenderer::new(RecordingSurface::new(), placeholder, config)?;

    let summary = renderer.render_area(&args.area(), args.zoom)?;
    for marker in args.markers() {
        renderer.plot_point(marker, MarkerStyle::POINT)?;
    }

    for key in renderer.surface().drawn_tiles() {
        match &template {
            Some(template) => println!("{key}\t{}", redact(&template.expand(key))),
            None => println!("{key}"),
        }
    }
    println!(
        "{} tiles, {} markers, {} surface calls",
        summary.tiles_drawn,
        renderer.surface().markers().len(),
        renderer.surface().calls().len()
    );
    Ok(())
}
