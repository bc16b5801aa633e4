use anyhow::{Context, Result};

use quadlite_engine::coords::{Edge, Polygon, Rect, UvRect, Vec2};
use quadlite_engine::device::{Gpu, GpuInit};
use quadlite_engine::lighting::LightSource;
use quadlite_engine::logging::{init_logging, LoggingConfig};
use quadlite_engine::paint::Color;
use quadlite_engine::render::{Camera2d, Renderer, RendererConfig, WgpuDevice, WgpuDeviceConfig};

const WIDTH: i32 = 800;
const HEIGHT: i32 = 600;

/// Renders one frame of sample geometry headlessly and writes it to
/// `screenshots/`. An optional first argument names a TTF/OTF font for text.
fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let gpu = Gpu::new_blocking(GpuInit::default())?;
    let device = WgpuDevice::new(&gpu, WgpuDeviceConfig {
        screen_size: (WIDTH as u32, HEIGHT as u32),
        ..WgpuDeviceConfig::default()
    })?;

    let mut renderer = Renderer::new(device, RendererConfig {
        window_size: (WIDTH, HEIGHT),
        ..RendererConfig::default()
    })?;
    renderer.set_camera(Camera2d::new(WIDTH as f32, HEIGHT as f32));

    if let Some(font) = font_bytes()? {
        renderer.load_default_font(&font)?;
    }

    let checker = renderer.create_texture(8, 8, &checkerboard(8))?;

    // ── offscreen pass ──────────────────────────────────────────────────────
    let minimap = renderer.create_render_target(200, 150)?;
    renderer.set_render_target(Some(&minimap))?;
    for i in 0..10 {
        let t = i as f32 / 9.0;
        renderer.draw_rect_solid(
            Rect::new(10.0 + i as f32 * 18.0, 20.0, 14.0, 110.0),
            renderer.default_texture(),
            Color::from_straight(t, 0.4, 1.0 - t, 1.0),
        )?;
    }
    renderer.set_render_target(None)?;

    // ── screen pass ─────────────────────────────────────────────────────────
    renderer.begin_frame();

    let ground = Color::from_srgb_u8(0x2e, 0x34, 0x40, 0xff);
    renderer.draw_rect_solid(Rect::new(0.0, 0.0, WIDTH as f32, 120.0), renderer.default_texture(), ground)?;

    renderer.draw_rect(
        Rect::new(40.0, 160.0, 160.0, 160.0),
        checker,
        [Color::WHITE, Color::WHITE, Color::from_straight(1.0, 0.6, 0.6, 1.0), Color::WHITE],
        UvRect::FULL,
    )?;

    let hexagon = regular_polygon(Vec2::new(420.0, 300.0), 70.0, 6);
    let light = LightSource { position: Vec2::new(300.0, 420.0), radius: 4.0, ..LightSource::default() };
    renderer.draw_shadows(&light, &hexagon, Color::from_straight(0.0, 0.0, 0.0, 0.5))?;
    renderer.draw_polygon(&hexagon, Color::from_srgb_u8(0x88, 0xc0, 0xd0, 0xff))?;
    renderer.draw_polygon_outline(&hexagon, 3.0, Color::WHITE)?;

    renderer.draw_line(
        Edge::new(Vec2::new(40.0, 140.0), Vec2::new(760.0, 140.0)),
        2.0,
        Color::from_srgb_u8(0xeb, 0xcb, 0x8b, 0xff),
    )?;

    renderer.draw_rect_solid(Rect::new(580.0, 420.0, 200.0, 150.0), minimap.texture(), Color::WHITE)?;
    renderer.draw_text("quadlite\nbatched quads", Vec2::new(40.0, 560.0), Color::WHITE, 24.0)?;

    let stats = renderer.end_frame()?;
    log::info!("frame drawn: {} quads in {} batches", stats.quads, stats.batches);

    let path = renderer.save_screenshot(None, "_demo")?;
    println!("wrote {}", path.display());

    renderer.destroy_render_target(minimap)?;
    renderer.destroy_texture(checker);
    drop(renderer.shutdown());
    Ok(())
}

fn font_bytes() -> Result<Option<Vec<u8>>> {
    match std::env::args().nth(1) {
        Some(path) => std::fs::read(&path)
            .with_context(|| format!("failed to read font {path}"))
            .map(Some),
        None => {
            log::warn!("no font given; text is skipped");
            Ok(None)
        }
    }
}

fn checkerboard(size: u32) -> Vec<u8> {
    (0..size * size)
        .flat_map(|i| {
            let (x, y) = (i % size, i / size);
            if (x + y) % 2 == 0 { [255, 255, 255, 255] } else { [40, 40, 40, 255] }
        })
        .collect()
}

fn regular_polygon(center: Vec2, radius: f32, sides: usize) -> Polygon {
    let vertices = (0..sides)
        .map(|i| {
            let a = i as f32 / sides as f32 * std::f32::consts::TAU;
            center + Vec2::new(a.cos(), a.sin()) * radius
        })
        .collect();
    Polygon::new(vertices)
}
