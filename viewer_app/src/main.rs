//! Headless model viewer
//!
//! Loads one model (and its material library) from the local file system
//! through the load orchestrator and prints what ended up in the scene.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use viewer3d::config::ConfigError;
use viewer3d::foundation::logging;
use viewer3d::loading::LoadError;
use viewer3d::prelude::*;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "viewer3d", version, about = "Load a 3D model with its materials and report the result")]
struct Args {
    /// Model URL relative to the asset root (e.g. models/car.obj)
    model: String,

    /// Directory model URLs are resolved against
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Viewer configuration file (.toml or .ron)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read only the top level of DDS textures
    #[arg(long)]
    no_mipmaps: bool,

    /// Retries for a failed geometry fetch
    #[arg(long)]
    retries: Option<u32>,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Error, Debug)]
enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Load of {url} ended in phase {phase}")]
    Incomplete { url: String, phase: LoadPhase },
}

fn build_config(args: &Args) -> Result<ViewerConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::load_from_file(path)?,
        None => ViewerConfig::default(),
    };

    if let Some(level) = &args.log_level {
        config.engine.log_level.clone_from(level);
    }
    if args.no_mipmaps {
        config.loader.load_mipmaps = false;
    }
    if let Some(retries) = args.retries {
        config.loader.geometry_retry.max_retries = retries;
    }

    config.validate()?;
    Ok(config)
}

fn print_report(scene: &SceneGraph, camera: &ViewCamera) {
    for object in scene.objects() {
        println!(
            "{}: {} group(s), {} vertices, {} triangles",
            object.name,
            object.groups.len(),
            object.vertex_count(),
            object.triangle_count()
        );
        for group in &object.groups {
            let material = match (&group.material, &group.material_name) {
                (Some(material), _) => {
                    let maps: Vec<String> = material
                        .maps
                        .iter()
                        .map(|(kind, map)| {
                            let state = if map.is_loaded() { "loaded" } else { "missing" };
                            format!("{:?}={} ({})", kind, map.url, state)
                        })
                        .collect();
                    format!(
                        "{} opacity {:.2}{} [{}]",
                        material.name,
                        material.opacity,
                        if material.transparent { " transparent" } else { "" },
                        maps.join(", ")
                    )
                }
                (None, Some(name)) => format!("{} (unresolved)", name),
                (None, None) => "none".to_string(),
            };
            println!("  {:<16} {:>6} tris  material: {}", group.name, group.mesh.triangle_count(), material);
        }
        if let Some(bounds) = object.bounds() {
            println!("  bounds {:?} .. {:?}", bounds.min.as_slice(), bounds.max.as_slice());
        }
    }
    println!(
        "camera at {:?} looking at {:?}",
        camera.position.as_slice(),
        camera.target.as_slice()
    );
}

fn run(args: &Args) -> Result<(), AppError> {
    let config = build_config(args)?;
    logging::init_with_level(&config.engine.log_level);
    log::debug!("Using configuration {:?}", config);

    let source = FileSource::new(&args.root);
    let textures = SourceTextureLoader::new(source.clone()).with_mipmaps(config.loader.load_mipmaps);
    let mut orchestrator = LoadOrchestrator::new(&config, GeometryDecoders::with_defaults(), Box::new(textures));
    orchestrator.subscribe(Box::new(|event: &LoadEvent| match event {
        LoadEvent::PhaseChanged { phase, detail } if !detail.is_empty() => log::info!("{} ({})", phase, detail),
        LoadEvent::Error { phase, message } => log::warn!("{}: {}", phase, message),
        _ => {}
    }));

    let (mut scene, mut camera) = (SceneGraph::new(), ViewCamera::default());
    let phase = orchestrator.run_blocking(&args.model, &source, &mut ViewerContext::new(&mut scene, &mut camera))?;

    if phase != LoadPhase::Done {
        return Err(AppError::Incomplete {
            url: args.model.clone(),
            phase,
        });
    }

    print_report(&scene, &camera);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
