mod headless;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use sceneforge_author::EditorSession;
use sceneforge_common::{Axis, ObjectKind, TransformField};
use sceneforge_render::{
    BackendKind, FrameSink, SurfaceSize, TextSink, Viewport, ViewportBackend, ViewportConfig,
};
use sceneforge_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

use headless::HeadlessHost;

#[derive(Parser)]
#[command(name = "sceneforge-cli", about = "Headless driver for the scene editor core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Viewport config file (YAML, or JSON by extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, the default scene and the active config
    Info,
    /// Run the render loop headlessly and print the last frame
    Render {
        /// Frames to run before printing
        #[arg(short, long, default_value = "1")]
        frames: u32,
        #[arg(long, default_value = "800")]
        width: f32,
        #[arg(long, default_value = "600")]
        height: f32,
        /// ortho or perspective
        #[arg(short, long, default_value = "ortho")]
        backend: BackendKind,
        /// Objects to add, laid out left to right (e.g. cube,sphere)
        #[arg(short, long, value_delimiter = ',')]
        add: Vec<ObjectKind>,
        /// List every draw command
        #[arg(long)]
        commands: bool,
    },
    /// Resolve a surface pixel to the object drawn there
    Pick {
        x: f32,
        y: f32,
        #[arg(long, default_value = "800")]
        width: f32,
        #[arg(long, default_value = "600")]
        height: f32,
        #[arg(short, long, default_value = "ortho")]
        backend: BackendKind,
        #[arg(short, long, value_delimiter = ',')]
        add: Vec<ObjectKind>,
    },
    /// Walk through the default-scene editing scenario
    Demo {
        #[arg(short, long, default_value = "ortho")]
        backend: BackendKind,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => ViewportConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewportConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            let session = EditorSession::new();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(session.list_objects())?);
                return Ok(());
            }
            println!("sceneforge-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", SceneInspector::summary(session.scene(), None));
            for row in SceneInspector::hierarchy(session.scene(), None) {
                println!("{row}");
            }
            println!(
                "config: {} px/unit, min size {} px, idle {} deg/frame",
                config.pixels_per_unit, config.min_visible_size, config.idle_step_degrees
            );
        }
        Commands::Render {
            frames,
            width,
            height,
            backend,
            add,
            commands,
        } => {
            let session = populated_session(&add)?;
            let mut viewport = Viewport::new(backend.build(config), HeadlessHost::new(width, height));
            viewport.mount()?;

            let mut last = None;
            for _ in 0..frames.max(1) {
                match viewport.on_frame(session.scene(), session.selected_id()) {
                    Ok(frame) => last = Some(frame),
                    Err(e) => tracing::warn!("frame skipped: {e}"),
                }
            }
            viewport.teardown();
            anyhow::ensure!(viewport.host().is_idle(), "render loop still scheduled after teardown");

            let frame = last.context("no frame was rendered (is the surface empty?)")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            } else {
                let mut sink = if commands {
                    TextSink::verbose()
                } else {
                    TextSink::new()
                };
                print!("{}", sink.present(&frame));
                for row in SceneInspector::hierarchy(session.scene(), session.selected_id()) {
                    println!("{row}");
                }
            }
        }
        Commands::Pick {
            x,
            y,
            width,
            height,
            backend,
            add,
        } => {
            let session = populated_session(&add)?;
            let renderer = backend.build(config);
            let size = SurfaceSize::new(width, height);
            let hit = renderer.pick(session.scene(), size, Vec2::new(x, y));
            let info = hit.and_then(|id| SceneInspector::inspect_object(session.scene(), id));
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                match info {
                    Some(info) => println!("hit: {info}"),
                    None => println!("miss at ({x}, {y})"),
                }
            }
        }
        Commands::Demo { backend } => run_demo(backend, config)?,
    }

    Ok(())
}

/// A default session with `kinds` added along the x axis.
fn populated_session(kinds: &[ObjectKind]) -> anyhow::Result<EditorSession> {
    let mut session = EditorSession::new();
    let offset = (kinds.len().saturating_sub(1)) as f32 * 0.75;
    for (i, kind) in kinds.iter().enumerate() {
        session.add_object(*kind)?;
        session.update_selected_transform(
            TransformField::Position,
            Axis::X,
            i as f32 * 1.5 - offset,
        )?;
    }
    Ok(session)
}

fn run_demo(backend: BackendKind, config: ViewportConfig) -> anyhow::Result<()> {
    let size = SurfaceSize::new(800.0, 600.0);
    let mut session = EditorSession::new();
    let renderer = backend.build(config);
    println!("start: {}", SceneInspector::summary(session.scene(), None));

    let cube = session.add_object(ObjectKind::Cube)?;
    println!(
        "added {} at {:?}: {}",
        cube.name,
        cube.transform.position,
        SceneInspector::summary(session.scene(), session.selected_id())
    );

    session.deselect();
    let picked = renderer
        .pick(session.scene(), size, size.center())
        .context("nothing under the viewport centre")?;
    session.select(picked)?;
    println!("picked at centre: {}", picked.short());
    anyhow::ensure!(picked == cube.id, "centre pick hit the wrong object");

    let updated = session.update_selected_transform(TransformField::Scale, Axis::X, -5.0)?;
    println!("scale.x after writing -5: {}", updated.transform.scale.x);

    session.delete_selected();
    println!(
        "deleted: {} (selection {:?})",
        SceneInspector::summary(session.scene(), session.selected_id()),
        session.selected_id()
    );
    session.undo();
    println!("undo: {}", SceneInspector::summary(session.scene(), session.selected_id()));
    Ok(())
}
