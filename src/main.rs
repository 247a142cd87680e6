//! Indexed raster viewer
//!
//! Runs the demo scene in a window: fixed-step updates, one indexed frame
//! per display frame, expanded through the palette and scaled up with
//! nearest filtering.
//!
//! Keys: Tab freezes or resumes the picture, Escape quits.

mod demo;

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::Context;
use clap::Parser;
use macroquad::prelude::*;

use indexed_raster::config::{load_config, RenderConfig};
use indexed_raster::rasterizer::{copy_frame, ChannelOrder, Frame, IndexedBitmap};
use indexed_raster::scene::Scene;
use indexed_raster::VERSION;

use demo::DemoScene;

/// Most updates run to catch up in one display frame
const MAX_CATCH_UP: u32 = 5;

#[derive(Parser, Debug)]
#[command(version, about = "Indexed-colour software rasterizer demo")]
struct Args {
    /// RON render config; defaults apply when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bitmap font image laid out as a 16x16 glyph grid
    #[arg(long)]
    font: Option<PathBuf>,
}

struct Startup {
    config: RenderConfig,
    font: Option<PathBuf>,
}

static STARTUP: OnceLock<Startup> = OnceLock::new();

fn startup() -> &'static Startup {
    STARTUP.get_or_init(|| {
        let args = Args::parse();
        let config = match &args.config {
            Some(path) => match load_config(path) {
                Ok(c) => {
                    log::info!("Loaded config: {}", path.display());
                    c
                }
                Err(e) => {
                    log::warn!("Failed to load config {}: {}, using defaults", path.display(), e);
                    RenderConfig::default()
                }
            },
            None => RenderConfig::default(),
        };
        Startup { config, font: args.font }
    })
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn window_conf() -> Conf {
    // The logger must exist before the config is read
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
    let cfg = &startup().config;
    Conf {
        window_title: format!("Indexed Raster v{}", VERSION),
        window_width: (cfg.canvas_width as u32 * cfg.window_scale) as i32,
        window_height: (cfg.canvas_height as u32 * cfg.window_scale) as i32,
        window_resizable: true,
        ..Default::default()
    }
}

/// Largest rectangle of the canvas aspect ratio centred in the window
fn fit_canvas(canvas_w: f32, canvas_h: f32) -> (f32, f32, f32, f32) {
    let (sw, sh) = (screen_width(), screen_height());
    let scale = (sw / canvas_w).min(sh / canvas_h);
    let (w, h) = (canvas_w * scale, canvas_h * scale);
    ((sw - w) * 0.5, (sh - h) * 0.5, w, h)
}

fn present(frame: &Frame) {
    let (w, h) = (frame.width() as u16, frame.height() as u16);
    let texture = Texture2D::from_rgba8(w, h, frame.pixels());
    texture.set_filter(FilterMode::Nearest);

    let (x, y, w, h) = fit_canvas(frame.width() as f32, frame.height() as f32);
    draw_texture_ex(
        &texture,
        x,
        y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(Vec2::new(w, h)),
            ..Default::default()
        },
    );
}

async fn run() -> anyhow::Result<()> {
    let start = startup();
    let cfg = &start.config;

    let mut ctx = cfg.context();
    if ctx.channel_order != ChannelOrder::Rgba {
        log::warn!("Window textures are RGBA; ignoring channel order {:?}", ctx.channel_order);
        ctx.channel_order = ChannelOrder::Rgba;
    }

    let (width, height) = (cfg.canvas_width, cfg.canvas_height);
    let mut frame = Frame::new(width, height).context("allocating frame")?;
    let mut snapshot = Frame::new(width, height).context("allocating snapshot")?;

    let font = match &start.font {
        Some(path) => Some(
            IndexedBitmap::load(path, cfg.bit_layout)
                .with_context(|| format!("loading font {}", path.display()))?,
        ),
        None => None,
    };

    let mut scene = DemoScene::new(cfg.bit_layout, font);
    scene.init().map_err(anyhow::Error::msg).context("initialising scene")?;

    log::info!(
        "Canvas {}x{}, {} fps, {:?} bit layout",
        cfg.canvas_width,
        cfg.canvas_height,
        cfg.fps,
        cfg.bit_layout
    );

    let step = 1.0 / cfg.fps.max(1) as f32;
    let mut accumulator = 0.0;
    let mut frozen = false;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::Tab) {
            frozen = !frozen;
            if frozen {
                copy_frame(&frame, &mut snapshot);
            }
            log::info!("{}", if frozen { "Frozen" } else { "Running" });
        }

        clear_background(BLACK);

        if frozen {
            ctx.present(&mut snapshot);
            present(&snapshot);
        } else {
            accumulator += get_frame_time();
            let mut updates = 0;
            while accumulator >= step && updates < MAX_CATCH_UP {
                scene.update(step * 60.0);
                accumulator -= step;
                updates += 1;
            }
            if updates == MAX_CATCH_UP {
                accumulator = 0.0;
            }
            scene.draw(&mut ctx.bind(&mut frame));
            ctx.present(&mut frame);
            present(&frame);
        }

        next_frame().await;
    }

    scene.destroy();
    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    if let Err(e) = run().await {
        log::error!("{:#}", e);
    }
}
