use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use spiralific::{
    AlphaFade, AlwaysVisible, EngineOpts, MotionLaw, MotionPointCollection, MotionSpeed,
    PixmapDevice, Rect, RenderState, Rgb8, Spirograph, TracingObserver,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "spiralific", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the spirograph render loop headless and save the canvas as a PNG.
    Draw(DrawArgs),
    /// Simulate motion points and rasterize the survivors as a PNG.
    Particles(ParticleArgs),
}

#[derive(Parser, Debug)]
struct DrawArgs {
    /// Canvas width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Wall-clock time to let the render loop run.
    #[arg(long, default_value_t = 2.0)]
    seconds: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Engine options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible shapes.
    #[arg(long)]
    seed: Option<u64>,

    /// Frame-rate cap; 0 disables it.
    #[arg(long)]
    fps: Option<u32>,

    /// Directory for PNG captures of finished shapes.
    #[arg(long)]
    capture_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ParticleArgs {
    /// Motion law (none, bounce, zoom, rotate, snow, from_left, from_right, from_top, from_bottom).
    #[arg(long, default_value = "bounce")]
    law: MotionLaw,

    /// Number of points to spawn.
    #[arg(long, default_value_t = 200)]
    count: usize,

    /// Simulation steps.
    #[arg(long, default_value_t = 100)]
    steps: usize,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,

    #[arg(long)]
    seed: Option<u64>,

    /// Fade-in window in steps.
    #[arg(long, default_value_t = 0)]
    fade_in: i64,

    /// Fade-out window in steps.
    #[arg(long, default_value_t = 0)]
    fade_out: i64,

    /// Life span in steps; 0 is immortal.
    #[arg(long, default_value_t = 0)]
    life: i64,

    /// Cycle each point's color as it moves.
    #[arg(long, default_value_t = false)]
    cycle_color: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Draw(args) => cmd_draw(args),
        Command::Particles(args) => cmd_particles(args),
    }
}

fn cmd_draw(args: DrawArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.seconds.is_finite() && args.seconds >= 0.0,
        "--seconds must be a non-negative number"
    );

    let mut opts = match &args.config {
        Some(path) => EngineOpts::from_path(path)?,
        None => EngineOpts::default(),
    };
    if args.seed.is_some() {
        opts.seed = args.seed;
    }
    if let Some(fps) = args.fps {
        opts.fps_limit = Some(fps);
    }
    if args.capture_dir.is_some() {
        opts.capture_dir = args.capture_dir.clone();
    }

    let device = PixmapDevice::new(args.width, args.height)?;
    let canvas = device.canvas();
    let mut spiro = Spirograph::new(device, AlwaysVisible, opts, Arc::new(TracingObserver));
    if spiro.state() == RenderState::RenderError {
        anyhow::bail!("render loop failed to initialize (see log)");
    }

    spiro.start()?;
    std::thread::sleep(Duration::from_secs_f64(args.seconds));
    spiro.pause();
    canvas
        .save_png(&args.out)
        .with_context(|| format!("write canvas to '{}'", args.out.display()))?;
    spiro.stop();

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_particles(args: ParticleArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.width > 0 && args.height > 0,
        "--width/--height must be non-zero"
    );

    let area = Rect::new(0.0, 0.0, f64::from(args.width), f64::from(args.height));
    let mut points = match args.seed {
        Some(seed) => MotionPointCollection::new(seed),
        None => MotionPointCollection::from_entropy(),
    };
    for _ in 0..args.count {
        let color = Rgb8::random(points.rng_mut());
        let p = points.spawn(area, args.law, MotionSpeed::Default, color);
        p.set_life(args.life);
        p.set_fade_in(args.fade_in);
        p.set_fade_out(args.fade_out);
        p.set_cycle_color(args.cycle_color);
        if args.fade_in > 0 || args.fade_out > 0 {
            p.set_alpha_fade(AlphaFade::Linear);
        }
    }

    for _ in 0..args.steps {
        points.step_all();
        points.cull();
    }
    tracing::info!(survivors = points.len(), steps = args.steps, "simulation done");

    let mut img = image::RgbaImage::from_pixel(args.width, args.height, image::Rgba([0, 0, 0, 255]));
    let (pts, rng) = points.parts_mut();
    for p in pts.iter() {
        let alpha = f64::from(p.alpha_level(rng)) / 255.0;
        let dot = p.ellipse(4);
        let c = p.color();
        let r = dot.width() / 2.0;
        let center = dot.center();
        for y in dot.y0 as i64..dot.y1 as i64 {
            for x in dot.x0 as i64..dot.x1 as i64 {
                if x < 0 || y < 0 || x >= i64::from(args.width) || y >= i64::from(args.height) {
                    continue;
                }
                let (dx, dy) = (x as f64 + 0.5 - center.x, y as f64 + 0.5 - center.y);
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let px = img.get_pixel_mut(x as u32, y as u32);
                for (dst, src) in px.0.iter_mut().zip([c.r, c.g, c.b]) {
                    *dst = (f64::from(src) * alpha + f64::from(*dst) * (1.0 - alpha)).round() as u8;
                }
            }
        }
    }

    img.save(&args.out)
        .with_context(|| format!("write particles to '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
