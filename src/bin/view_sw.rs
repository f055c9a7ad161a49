use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use glam::{IVec2, Vec2};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use simplelog::TermLogger;

use yaray_rs::{
    config::RenderConfig,
    renderer::{Renderer, Rgba, Software},
    world::{
        AnimationClock, Cell, Entity, Level, Texture, TextureBank, TextureError, TextureId,
        load_level_file,
    },
};

const MOVE_SPEED: f32 = 3.0; // cells per second
const TURN_SPEED: f32 = 2.0; // radians per second
const DOOR_SPEED: f32 = 120.0; // percent per second
const PLAYER_RADIUS: f32 = 0.2;

/// Walk around a grid level with the software raycaster.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Level description (RON).
    #[arg(default_value = "demos/level.ron")]
    level: PathBuf,

    /// Renderer settings (RON); built-in defaults when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 960)]
    width: usize,

    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    TermLogger::init(
        if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        },
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    let bank = demo_textures()?;
    let loaded = load_level_file(&args.level, &bank)
        .with_context(|| format!("loading level {}", args.level.display()))?;
    let mut level = loaded.level;
    let mut player = loaded.spawn;

    let mut renderer = Software::new(config);
    let clock = AnimationClock::default();
    let mut doors: Vec<(IVec2, u8)> = Vec::new(); // cell, target percent

    let (w, h) = (args.width, args.height);
    let mut win = Window::new(&format!("yaray - {}", level.name), w, h, WindowOptions::default())?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO; // cumulated render time
    let mut acc_frames = 0usize; // frames in the current window
    let mut last_print = Instant::now(); // when we printed last
    let mut last_frame = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let dt = last_frame.elapsed().as_secs_f32().min(0.1);
        last_frame = Instant::now();

        /* movement --------------------------------------------------------- */
        let mut forward = 0.0;
        let mut strafe = 0.0;
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            forward += 1.0;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            forward -= 1.0;
        }
        if win.is_key_down(Key::A) {
            strafe -= 1.0;
        }
        if win.is_key_down(Key::D) {
            strafe += 1.0;
        }
        if win.is_key_down(Key::Left) {
            player.turn(-TURN_SPEED * dt);
        }
        if win.is_key_down(Key::Right) {
            player.turn(TURN_SPEED * dt);
        }
        walk(&mut player, &level, forward * MOVE_SPEED * dt, strafe * MOVE_SPEED * dt);

        /* actions ---------------------------------------------------------- */
        if win.is_key_pressed(Key::E, KeyRepeat::No) {
            interact(&player, &mut level, &mut doors);
        }
        if win.is_key_pressed(Key::F1, KeyRepeat::No) {
            renderer.config.debug = !renderer.config.debug;
            log::info!("sprite debug outlines: {}", renderer.config.debug);
        }
        slide_doors(&mut level, &mut doors, dt);

        /* draw */
        let t0 = Instant::now(); // ┌─ frame timer start
        renderer.begin_frame(w, h);
        renderer.draw_level(&player, &level, &bank, clock.frame());
        renderer.end_frame(|fb, w, h| {
            // ─────────── accumulate & report every ~3 s ────────────────────
            acc_time += t0.elapsed();
            acc_frames += 1;
            if let Err(e) = win.update_with_buffer(fb, w, h) {
                log::error!("window update failed: {e}");
            }
        });

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            let fps = 1000.0 / avg_ms;
            log::info!("avg render: {:.2} ms  ({:.1} FPS)", avg_ms, fps);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}

/*──────────────────────────── player ──────────────────────────────*/

fn blocked(level: &Level, p: Vec2) -> bool {
    let cell = p.floor().as_ivec2();
    match level.get_cell(cell.x, cell.y) {
        None => true,
        Some(c) => c.is_solid() && c.door_open().is_none_or(|open| open < 1.0),
    }
}

/// Move with per-axis collision so the player slides along walls.
fn walk(player: &mut Entity, level: &Level, forward: f32, side: f32) {
    if forward == 0.0 && side == 0.0 {
        return;
    }
    let from = player.position;
    let mut moved = *player;
    moved.step(forward, side);
    let delta = moved.position - from;

    let pad = |d: f32| d.signum() * PLAYER_RADIUS;
    if !blocked(level, Vec2::new(from.x + delta.x + pad(delta.x), from.y)) {
        player.position.x += delta.x;
    }
    if !blocked(level, Vec2::new(player.position.x, from.y + delta.y + pad(delta.y))) {
        player.position.y += delta.y;
    }
}

/// Use whatever is in the cell straight ahead.
fn interact(player: &Entity, level: &mut Level, doors: &mut Vec<(IVec2, u8)>) {
    let ahead = (player.position + player.direction.normalize_or_zero()).floor().as_ivec2();
    let Some(cell) = level.cell_mut(ahead.x, ahead.y) else {
        return;
    };
    if let Some(state) = cell.toggle() {
        log::info!("switch at {ahead} -> state {state}");
    } else if let Some(open) = cell.door_open() {
        let target = if open < 0.5 { 100 } else { 0 };
        log::debug!("door at {ahead} moving to {target}%");
        doors.retain(|(c, _)| *c != ahead);
        doors.push((ahead, target));
    }
}

fn slide_doors(level: &mut Level, doors: &mut Vec<(IVec2, u8)>, dt: f32) {
    let step = (DOOR_SPEED * dt).max(1.0) as i32;
    doors.retain(|&(at, target)| {
        let Some(cell) = level.cell_mut(at.x, at.y) else {
            return false;
        };
        let Cell::Door { percent, .. } = &*cell else {
            return false;
        };
        let current = i32::from(*percent);
        let next = if current < i32::from(target) {
            (current + step).min(i32::from(target))
        } else {
            (current - step).max(i32::from(target))
        };
        cell.set_door_percent(next as u8);
        next != i32::from(target)
    });
}

/*──────────────────────────── textures ────────────────────────────*/

const TEX: usize = 32;

/// Fill a packed `frames × states` image cell by cell.
fn paint(
    frames: usize,
    states: usize,
    f: impl Fn(usize, usize, usize, usize) -> Rgba,
) -> Vec<Rgba> {
    let iw = TEX * frames;
    let mut px = vec![0; iw * TEX * states];
    for s in 0..states {
        for fr in 0..frames {
            for y in 0..TEX {
                for x in 0..TEX {
                    px[(s * TEX + y) * iw + fr * TEX + x] = f(x, y, fr, s);
                }
            }
        }
    }
    px
}

fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    0xFF00_0000 | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Small deterministic noise so flat colours get some grain.
fn grain(x: usize, y: usize) -> u8 {
    let n = (x as u32).wrapping_mul(374_761_393) ^ (y as u32).wrapping_mul(668_265_263);
    (n.wrapping_mul(1_274_126_177) >> 28) as u8
}

fn demo_textures() -> anyhow::Result<TextureBank> {
    let mut bank = TextureBank::default_with_checker();
    let mut add = |name: &str,
                   frames: usize,
                   states: usize,
                   f: &dyn Fn(usize, usize, usize, usize) -> Rgba|
     -> Result<TextureId, TextureError> {
        let tex = Texture::new(name, TEX, TEX, frames, states, paint(frames, states, f))?;
        bank.insert(name, tex)
    };

    add("BRICK", 1, 1, &|x, y, _, _| {
        let row = y / 8;
        let offset = if row % 2 == 0 { 0 } else { 8 };
        if y % 8 == 7 || (x + offset) % 16 == 15 {
            rgb(90, 90, 90)
        } else {
            rgb(150 + grain(x, y) * 3, 60, 40)
        }
    })?;
    add("STONE", 1, 1, &|x, y, _, _| {
        let g = 100 + grain(x, y) * 4;
        if x % 16 == 0 || y % 16 == 0 { rgb(60, 60, 60) } else { rgb(g, g, g) }
    })?;
    add("FLOOR", 1, 1, &|x, y, _, _| {
        let light = ((x / 16) + (y / 16)) % 2 == 0;
        let g = grain(x, y) * 2;
        if light { rgb(120 + g, 110 + g, 90) } else { rgb(70 + g, 60 + g, 50) }
    })?;
    add("CEIL", 1, 1, &|x, y, _, _| {
        if (x % 8 == 4) && (y % 8 == 4) { rgb(200, 200, 160) } else { rgb(50, 50, 60) }
    })?;
    add("FENCE", 1, 1, &|x, y, _, _| {
        // bars and rails, transparent elsewhere
        if x % 8 < 2 || y < 2 || y >= TEX - 2 { rgb(80, 80, 90) } else { 0 }
    })?;
    add("DOOR", 1, 1, &|x, y, _, _| {
        if x < 2 || x >= TEX - 2 || y < 2 || y >= TEX - 2 {
            rgb(60, 40, 20)
        } else if (x / 4) % 2 == 0 {
            rgb(130, 90, 50)
        } else {
            rgb(110, 75, 40)
        }
    })?;
    add("SWITCH", 1, 2, &|x, y, _, s| {
        let lamp = (12..20).contains(&x) && (12..20).contains(&y);
        match (lamp, s) {
            (true, 0) => rgb(200, 30, 30),
            (true, _) => rgb(30, 200, 30),
            _ => rgb(90, 90, 100),
        }
    })?;
    add("WATER", 4, 1, &|x, y, fr, _| {
        let wave = ((x + y + fr * 8) % TEX) as u8;
        rgb(20, 60 + wave * 2, 150 + wave * 3)
    })?;
    add("BARREL", 1, 1, &|x, y, _, _| {
        let dx = x as i32 * 2 - TEX as i32 + 1;
        if dx.abs() > 20 || y < 6 {
            0
        } else if y % 8 == 0 {
            rgb(70, 70, 70)
        } else {
            rgb(60, 110 + grain(x, y) * 2, 40)
        }
    })?;
    add("LAMP", 1, 1, &|x, y, _, _| {
        let dx = x as i32 - 16;
        if y < 4 && dx.abs() < 2 {
            rgb(40, 40, 40)
        } else if (4..12).contains(&y) && dx.abs() < 5 {
            rgb(250, 230, 150)
        } else {
            0
        }
    })?;
    // 4 views: one coloured face per direction
    add("PILLAR", 4, 1, &|x, _, fr, _| {
        if !(8..24).contains(&x) {
            return 0;
        }
        [rgb(200, 50, 50), rgb(50, 200, 50), rgb(50, 50, 200), rgb(200, 200, 50)][fr]
    })?;

    log::info!("{} demo textures", bank.len() - 1);
    Ok(bank)
}
