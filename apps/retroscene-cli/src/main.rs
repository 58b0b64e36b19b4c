use clap::{Parser, Subcommand};
use glam::Vec2;
use retroscene_frame::{
    DisplayMode, FrameInputs, FrameMatrices, LoggedCues, OrbitRotation, PointerState,
    RecordingSink, RenderLoop, Viewport,
};
use retroscene_scene::{LightRig, MeshSource, Placement, SceneConfig, load_mesh};
use retroscene_screen::StaticText;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "retroscene-cli", about = "CLI tool for retroscene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Load a mesh and report its size and bounds
    Inspect {
        /// Wavefront OBJ file; the built-in monitor is used when omitted
        #[arg(long, requires = "material")]
        object: Option<PathBuf>,
        /// Material library for the OBJ
        #[arg(long, requires = "object")]
        material: Option<PathBuf>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print a scene config as YAML (the defaults when no file is given)
    Config {
        /// YAML file to load and normalize
        path: Option<PathBuf>,
    },
    /// Drive the frame loop headless and report the final state
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        ticks: u32,
        /// Milliseconds between frames
        #[arg(long, default_value = "16.0")]
        frame_ms: f64,
        /// Horizontal drag in pixels, held for the whole run
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        drag_x: f32,
        /// Vertical drag in pixels, held for the whole run
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        drag_y: f32,
    },
    /// Print the per-frame matrices for a given orbit and viewport
    Matrices {
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        pitch: f32,
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        yaw: f32,
        #[arg(long, default_value = "1280")]
        width: u32,
        #[arg(long, default_value = "720")]
        height: u32,
    },
}

#[derive(Debug, Serialize)]
struct MeshReport {
    source: String,
    vertices: usize,
    triangles: usize,
    min: Option<[f32; 3]>,
    max: Option<[f32; 3]>,
}

fn inspect(source: &MeshSource) -> anyhow::Result<MeshReport> {
    let (label, mesh) = match source {
        MeshSource::Files { object, material } => {
            (object.display().to_string(), load_mesh(object, material)?)
        }
        MeshSource::Builtin => (
            "built-in monitor".to_string(),
            retroscene_scene::fallback::retro_monitor()?,
        ),
    };
    let bounds = mesh.bounds();
    Ok(MeshReport {
        source: label,
        vertices: mesh.vertex_count(),
        triangles: mesh.triangle_count(),
        min: bounds.map(|(min, _)| min.to_array()),
        max: bounds.map(|(_, max)| max.to_array()),
    })
}

/// Run `ticks` frames with the pointer held down and offset by `drag`.
fn simulate(ticks: u32, frame_ms: f64, drag: Vec2) -> (RenderLoop, RecordingSink) {
    let placement = Placement::default();
    let light_space = LightRig::default().light_space_matrix(&placement);
    let mut render_loop = RenderLoop::new(placement, light_space, Box::new(LoggedCues));
    let mut sink = RecordingSink::default();
    let mut text = StaticText("READY.".into());

    let mut pointer = PointerState::default();
    if drag != Vec2::ZERO {
        pointer.press();
        pointer.move_to(drag);
    }

    for frame in 0..ticks {
        let inputs = FrameInputs {
            timestamp_ms: f64::from(frame) * frame_ms,
            pointer,
            viewport: Viewport::new(1280, 720),
            mode: DisplayMode::Retro,
        };
        render_loop.tick(&inputs, &mut text, &mut sink);
    }
    (render_loop, sink)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("retroscene-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", retroscene_scene::crate_info());
            println!("frame: {}", retroscene_frame::crate_info());
            println!("screen: {}", retroscene_screen::crate_info());
        }
        Commands::Inspect {
            object,
            material,
            json,
        } => {
            let source = match (object, material) {
                (Some(object), Some(material)) => MeshSource::Files { object, material },
                _ => MeshSource::Builtin,
            };
            let report = inspect(&source)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Mesh: {}", report.source);
                println!(
                    "Vertices: {}  Triangles: {}",
                    report.vertices, report.triangles
                );
                if let (Some(min), Some(max)) = (report.min, report.max) {
                    println!("Bounds: {min:?} .. {max:?}");
                }
            }
        }
        Commands::Config { path } => {
            let config = match path {
                Some(path) => SceneConfig::load(path)?,
                None => SceneConfig::default(),
            };
            print!("{}", config.to_yaml_string()?);
        }
        Commands::Simulate {
            ticks,
            frame_ms,
            drag_x,
            drag_y,
        } => {
            tracing::info!("simulating {ticks} frames at {frame_ms} ms");
            let (render_loop, sink) = simulate(ticks, frame_ms, Vec2::new(drag_x, drag_y));
            let rotation = render_loop.rotation();
            println!("Frames drawn: {}", sink.draws.len());
            println!("Time: {:.3}s", render_loop.time());
            println!(
                "Rotation: pitch={:.4} yaw={:.4}",
                rotation.pitch, rotation.yaw
            );
        }
        Commands::Matrices {
            pitch,
            yaw,
            width,
            height,
        } => {
            let placement = Placement::default();
            let light_space = LightRig::default().light_space_matrix(&placement);
            let matrices = FrameMatrices::compose(
                &OrbitRotation::new(pitch, yaw),
                Viewport::new(width, height),
                &placement,
                light_space,
            );
            println!("camera: {:?}", matrices.camera);
            println!("projection: {:?}", matrices.projection);
            println!("model: {:?}", matrices.model);
            println!("mvp: {:?}", matrices.mvp);
            println!("light_space: {:?}", matrices.light_space);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_inspection_reports_bounds() {
        let report = inspect(&MeshSource::Builtin).unwrap();
        assert_eq!(report.vertices, report.triangles * 3);
        assert!(report.min.is_some() && report.max.is_some());
    }

    #[test]
    fn simulation_draws_every_tick() {
        let (render_loop, sink) = simulate(10, 16.0, Vec2::ZERO);
        assert_eq!(sink.draws.len(), 10);
        assert_eq!(sink.texts.len(), 10);
        assert!(render_loop.time() > 0.0);
        assert_eq!(render_loop.rotation(), OrbitRotation::default());
    }

    #[test]
    fn held_drag_turns_the_model() {
        let (render_loop, _) = simulate(30, 16.0, Vec2::new(200.0, 0.0));
        let rotation = render_loop.rotation();
        assert!(rotation.yaw > 0.0);
        assert_eq!(rotation.pitch, 0.0);
    }
}
