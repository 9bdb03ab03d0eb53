use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "holofoil", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a pointer sweep across the scene as numbered PNGs.
    Sweep(SweepArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Pointer x in canvas px.
    #[arg(long, default_value_t = 0.0)]
    pointer_x: f64,

    /// Pointer y in canvas px.
    #[arg(long, default_value_t = 0.0)]
    pointer_y: f64,

    /// Scene time in seconds (drives ambient float).
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Enable the holographic overlay for this frame.
    #[arg(long)]
    holo: bool,

    /// Assets root; when set, bitmap art named by the scene is loaded.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of frames to render.
    #[arg(long, default_value_t = 30)]
    frames: u32,

    /// Seconds covered by the sweep.
    #[arg(long, default_value_t = 2.0)]
    seconds: f64,

    /// Enable the holographic overlay for the sweep.
    #[arg(long)]
    holo: bool,

    /// Assets root; when set, bitmap art named by the scene is loaded.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output directory for frame_NNNN.png files.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sweep(args) => cmd_sweep(args),
    }
}

fn read_scene_json(path: &Path) -> anyhow::Result<holofoil::SceneConfig> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let r = BufReader::new(f);
    let config: holofoil::SceneConfig =
        serde_json::from_reader(r).with_context(|| "parse scene JSON")?;
    Ok(config)
}

fn mount_session(
    config: &holofoil::SceneConfig,
    assets: Option<&Path>,
    holo: bool,
) -> anyhow::Result<holofoil::ViewSession> {
    let mut session = holofoil::ViewSession::mount(config)?;
    if let Some(root) = assets {
        session.load_art(root);
    }
    session.set_holo_enabled(holo, 0.0);
    Ok(session)
}

fn save_png(frame: &holofoil::FrameRGBA, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = read_scene_json(&args.in_path)?;
    let mut session = mount_session(&config, args.assets.as_deref(), args.holo)?;

    session.pointer_move(
        holofoil::Point::new(args.pointer_x, args.pointer_y),
        args.time,
    );
    let frame = session.render_frame()?;
    save_png(&frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    if args.frames == 0 {
        anyhow::bail!("sweep needs at least one frame");
    }
    let config = read_scene_json(&args.in_path)?;
    let mut session = mount_session(&config, args.assets.as_deref(), args.holo)?;

    let canvas = config.layout.canvas();
    for i in 0..args.frames {
        let t = if args.frames == 1 {
            0.0
        } else {
            f64::from(i) / f64::from(args.frames - 1)
        };
        // Diagonal sweep, corner to corner.
        let pointer = holofoil::Point::new(
            t * f64::from(canvas.width),
            t * f64::from(canvas.height),
        );
        session.pointer_move(pointer, t * args.seconds);

        let frame = session.render_frame()?;
        let out = args.out_dir.join(format!("frame_{i:04}.png"));
        save_png(&frame, &out)?;
    }

    eprintln!(
        "wrote {} frame(s) to {}",
        args.frames,
        args.out_dir.display()
    );
    Ok(())
}
