use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use glam::Vec3;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use virtworld_kernel::{HeightMap, VoxelWorld};
use virtworld_render::{Camera, DebugTextRenderer, Renderer, Scene, SceneOptions, WorldDrawMode};
use virtworld_tools::WorldInspector;

#[derive(Parser)]
#[command(name = "virtworld-cli", about = "CLI tool for virtworld levels")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON height-map level; the built-in maze when omitted
    #[arg(long, global = true)]
    level: Option<PathBuf>,

    /// Height of the built-in level's outer wall, in blocks
    #[arg(long, global = true, default_value_t = 10_000)]
    wall_height: u32,

    /// Empty rows above the tallest column
    #[arg(long, global = true, default_value_t = 8)]
    headroom: usize,

    /// Half the edge length of one block
    #[arg(long, global = true, default_value_t = 0.5)]
    cube_size: f32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Summarize the world grid
    Inspect {
        /// Also print the top occupied row of every column
        #[arg(long)]
        columns: bool,
    },
    /// Show the cell a world-space point falls into
    Probe { x: f32, y: f32, z: f32 },
    /// Add or remove blocks at world-space points
    Edit {
        /// Point to fill, as `x,y,z` (repeatable)
        #[arg(long, value_parser = parse_point)]
        add: Vec<Vec3>,
        /// Point to clear, as `x,y,z` (repeatable)
        #[arg(long, value_parser = parse_point)]
        remove: Vec<Vec3>,
    },
    /// Build one frame and print it with the text renderer
    Render {
        /// One draw per block instead of one instanced draw
        #[arg(long)]
        naive: bool,
        /// List every draw command
        #[arg(long)]
        verbose_frame: bool,
        /// Scene time in milliseconds
        #[arg(long, default_value_t = 0.0)]
        time_ms: f64,
        /// Camera position as `x,y,z`
        #[arg(long, value_parser = parse_point)]
        eye: Option<Vec3>,
        /// Look-at point as `x,y,z`
        #[arg(long, value_parser = parse_point)]
        at: Option<Vec3>,
    },
}

fn parse_point(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z, got '{s}'"));
    };
    let coord = |v: &str| v.parse::<f32>().map_err(|e| format!("'{v}': {e}"));
    Ok(Vec3::new(coord(x)?, coord(y)?, coord(z)?))
}

/// A default camera, optionally moved to `eye` and pointed at `at`.
fn posed_camera(eye: Option<Vec3>, at: Option<Vec3>) -> anyhow::Result<Camera> {
    let mut camera = Camera::new(16.0 / 9.0);
    if eye.is_none() && at.is_none() {
        return Ok(camera);
    }
    let eye = eye.unwrap_or(camera.eye());
    let at = at.unwrap_or(eye + camera.look_direction());
    if eye == at {
        bail!("eye and look-at point coincide");
    }
    camera.set_pose(eye, at, Vec3::Y);
    if camera.is_degenerate() {
        bail!("look direction is parallel to up");
    }
    Ok(camera)
}

fn load_world(cli: &Cli) -> anyhow::Result<VoxelWorld> {
    let heights = match &cli.level {
        Some(path) => HeightMap::load(path)
            .with_context(|| format!("loading level {}", path.display()))?,
        None => HeightMap::default_level(cli.wall_height),
    };
    tracing::debug!(
        "height map {}x{}, {} blocks",
        heights.width(),
        heights.depth(),
        heights.total_blocks()
    );
    Ok(VoxelWorld::with_headroom(&heights, cli.cube_size, cli.headroom)?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match &cli.command {
        Commands::Info => {
            println!("virtworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", virtworld_render::crate_info());
            println!("input: {}", virtworld_input::crate_info());
            println!("tools: {}", virtworld_tools::crate_info());
        }
        Commands::Inspect { columns } => {
            let mut world = load_world(&cli)?;
            world.instance_offsets();
            println!("{}", WorldInspector::summary(&world));
            if *columns {
                for z in 0..world.depth() {
                    let row: Vec<String> = (0..world.width())
                        .map(|x| match WorldInspector::column_top(&world, x, z) {
                            Some(y) => (y + 1).to_string(),
                            None => "0".to_string(),
                        })
                        .collect();
                    println!("{}", row.join(" "));
                }
            }
        }
        Commands::Probe { x, y, z } => {
            let world = load_world(&cli)?;
            println!("{}", WorldInspector::probe(&world, Vec3::new(*x, *y, *z)));
        }
        Commands::Edit { add, remove } => {
            if add.is_empty() && remove.is_empty() {
                bail!("nothing to edit: pass --add or --remove");
            }
            let mut world = load_world(&cli)?;
            let edits = add
                .iter()
                .map(|p| (*p, true))
                .chain(remove.iter().map(|p| (*p, false)));
            for (point, is_block) in edits {
                let verb = if is_block { "add" } else { "remove" };
                match world.change_point(point, is_block) {
                    Ok(cell) => println!(
                        "{verb} ({}, {}, {}) -> {}",
                        point.x,
                        point.y,
                        point.z,
                        WorldInspector::inspect_cell(&world, cell)
                    ),
                    Err(e) => tracing::warn!(
                        "{verb} at ({}, {}, {}) skipped: {e}",
                        point.x,
                        point.y,
                        point.z
                    ),
                }
            }
            world.instance_offsets();
            println!("{}", WorldInspector::summary(&world));
        }
        Commands::Render {
            naive,
            verbose_frame,
            time_ms,
            eye,
            at,
        } => {
            let mut world = load_world(&cli)?;
            let options = SceneOptions {
                wall_height: cli.wall_height as f32,
                draw_mode: if *naive {
                    WorldDrawMode::Naive
                } else {
                    WorldDrawMode::Instanced
                },
                debug_uvs: false,
            };
            let scene = Scene::new(&world, options);

            let camera = posed_camera(*eye, *at)?;

            let mut renderer = DebugTextRenderer {
                verbose: *verbose_frame,
            };
            let frame = scene.draw_list(&mut world, *time_ms);
            print!("{}", renderer.render(&camera, &frame));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_parse() {
        assert_eq!(parse_point("1, -2.5,3").unwrap(), Vec3::new(1.0, -2.5, 3.0));
        assert!(parse_point("1,2").is_err());
        assert!(parse_point("a,b,c").is_err());
    }

    #[test]
    fn cli_parses_edit_flags() {
        let cli = Cli::try_parse_from([
            "virtworld-cli",
            "--wall-height",
            "4",
            "edit",
            "--add",
            "0,1,0",
            "--remove",
            "0,0,0",
        ])
        .unwrap();
        assert_eq!(cli.wall_height, 4);
        match cli.command {
            Commands::Edit { add, remove } => {
                assert_eq!(add, vec![Vec3::new(0.0, 1.0, 0.0)]);
                assert_eq!(remove, vec![Vec3::ZERO]);
            }
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn camera_pose_errors_name_the_cause() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let err = posed_camera(Some(p), Some(p)).unwrap_err();
        assert!(err.to_string().contains("coincide"));

        let err = posed_camera(Some(Vec3::ZERO), Some(Vec3::new(0.0, 5.0, 0.0))).unwrap_err();
        assert!(err.to_string().contains("parallel to up"));

        let camera = posed_camera(Some(Vec3::new(0.0, 1.0, 2.0)), None).unwrap();
        assert_eq!(camera.at(), Vec3::new(0.0, 1.0, 1.0));
        assert!(posed_camera(None, None).is_ok());
    }

    #[test]
    fn small_default_world_loads() {
        let cli = Cli::try_parse_from(["virtworld-cli", "--wall-height", "12", "inspect"]).unwrap();
        let world = load_world(&cli).unwrap();
        assert_eq!(world.height(), 12 + 8);
        assert!(world.occupied_count() > 0);
    }
}
