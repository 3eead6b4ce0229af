//! MotionTask CLI
//!
//! Render the MotionTask page and simulate scroll and playback sessions.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use motiontask_animation::{set_global_scheduler, AnimationScheduler};
use motiontask_core::KeyCode;
use motiontask_page::{
    render_html, EnvPreference, MotionPreferenceSource, OverridePreference, PageConfig,
    PageController,
};

mod session;

use session::{Session, SessionPlan};

/// One hour of frames at 240 fps
const MAX_RENDER_FRAMES: u64 = 240 * 60 * 60;

#[derive(Parser)]
#[command(name = "motiontask")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MotionTask page renderer and playback simulator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./motiontask.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Force reduced motion regardless of environment and config
    #[arg(long, global = true)]
    reduced_motion: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the page to HTML
    Render {
        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Advance the animations by this many milliseconds before rendering
        #[arg(long, default_value = "0")]
        at_ms: f32,

        /// Scroll offset pushed before advancing
        #[arg(long)]
        scroll_to: Option<f32>,
    },

    /// Run a frame-by-frame session and print a JSON summary
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "240")]
        frames: u32,

        /// Scroll offset to jump to
        #[arg(long)]
        scroll_to: Option<f32>,

        /// Frame at which the scroll happens
        #[arg(long, default_value = "0")]
        scroll_at: u32,

        /// Press play/pause at these frames
        #[arg(long = "toggle-at")]
        toggle_at: Vec<u32>,

        /// Activate these cards with the keyboard at frame 0
        #[arg(long = "activate-card")]
        activate_cards: Vec<usize>,

        /// Key used for card activation (Enter, Space, ...)
        #[arg(long, default_value = "Enter")]
        key: String,

        /// Pretty-print the summary
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = load_config(cli.config.as_deref())?;
    if cli.reduced_motion {
        config.page.reduced_motion = Some(true);
    }

    let mut scheduler = AnimationScheduler::new();
    scheduler.set_target_fps(config.engine.target_fps);
    set_global_scheduler(scheduler.handle())
        .context("Failed to initialize the animation scheduler")?;

    let preference = OverridePreference {
        value: config.page.reduced_motion,
        fallback: EnvPreference::default(),
    };

    match cli.command {
        Commands::Render {
            output,
            at_ms,
            scroll_to,
        } => cmd_render(&scheduler, &config, &preference, output.as_deref(), at_ms, scroll_to),

        Commands::Simulate {
            frames,
            scroll_to,
            scroll_at,
            toggle_at,
            activate_cards,
            key,
            pretty,
        } => {
            let plan = SessionPlan {
                frames,
                scroll: scroll_to.map(|offset| (scroll_at, offset)),
                toggles: toggle_at,
                activate_cards,
                activation_key: Some(KeyCode::from_key_name(&key)),
            };
            cmd_simulate(&scheduler, &config, &preference, &plan, pretty)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PageConfig> {
    match path {
        Some(path) => PageConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            PageConfig::load_or_default(&cwd).context("Failed to load motiontask.toml")
        }
    }
}

fn mount_page(config: &PageConfig, preference: &dyn MotionPreferenceSource) -> Result<PageController> {
    let mut page = PageController::from_global(config.page.clone())
        .context("Animation scheduler is not initialized")?;
    page.mount(preference).context("Failed to mount page")?;
    if page.reduce_motion() {
        info!("Reduced motion requested; entrance sequence disabled");
    }
    Ok(page)
}

/// Split `at_ms` into whole frames; the last frame gets the remainder
///
/// Returns the frame count and the length of the last frame.
fn frame_plan(at_ms: f32, frame_ms: f32) -> Result<(u64, f32)> {
    if !at_ms.is_finite() {
        bail!("--at-ms must be a finite number of milliseconds, got {}", at_ms);
    }
    if at_ms < 0.0 {
        warn!("Ignoring negative --at-ms {}", at_ms);
        return Ok((0, 0.0));
    }
    if at_ms == 0.0 {
        return Ok((0, 0.0));
    }

    let at_ms = f64::from(at_ms);
    let frame_ms = f64::from(frame_ms);
    // Tolerate f32 rounding in frame_ms so exact multiples don't gain a
    // near-empty extra frame
    let frames = (at_ms / frame_ms - 1e-4).ceil().max(1.0) as u64;
    if frames > MAX_RENDER_FRAMES {
        bail!(
            "--at-ms {} needs {} frames, more than the limit of {}",
            at_ms,
            frames,
            MAX_RENDER_FRAMES
        );
    }
    let last_frame_ms = at_ms - (frames - 1) as f64 * frame_ms;
    Ok((frames, last_frame_ms as f32))
}

fn cmd_render(
    scheduler: &AnimationScheduler,
    config: &PageConfig,
    preference: &dyn MotionPreferenceSource,
    output: Option<&Path>,
    at_ms: f32,
    scroll_to: Option<f32>,
) -> Result<()> {
    let (frames, last_frame_ms) = frame_plan(at_ms, scheduler.frame_ms())?;
    let mut page = mount_page(config, preference)?;

    if let Some(offset) = scroll_to {
        page.handle_scroll(offset);
    }
    for frame in 0..frames {
        if frame + 1 == frames {
            scheduler.advance(last_frame_ms);
        } else {
            scheduler.advance(scheduler.frame_ms());
        }
    }

    let html = render_html(&page);
    page.unmount();

    match output {
        Some(path) => {
            fs::write(path, &html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} ({} bytes)", path.display(), html.len());
        }
        None => println!("{}", html),
    }
    Ok(())
}

fn cmd_simulate(
    scheduler: &AnimationScheduler,
    config: &PageConfig,
    preference: &dyn MotionPreferenceSource,
    plan: &SessionPlan,
    pretty: bool,
) -> Result<()> {
    let page = mount_page(config, preference)?;
    let mut session = Session::new(scheduler, page);
    let summary = session.run(plan);
    session.finish();

    let json = if pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{}", json);
    Ok(())
}
