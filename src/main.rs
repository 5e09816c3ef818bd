// What you SEE:
// • A white canvas under a dark HUD strip.
// • Hold Left Mouse and drag: a black 5px line follows the cursor.
// • Z undoes the last stroke/clear, Y redoes it, C clears (undoable).
// • S saves the canvas as drawing.png. ESC quits.

mod config;
mod draw;
mod error;
mod export;
mod history;
mod input;
mod logging;
mod sketchpad;
mod stroke;
mod surface;
mod types;

use clap::Parser;
use config::{Cli, SketchConfig};
use draw::{blit_canvas, canvas_origin, draw_crosshair, draw_frame, draw_text_5x7, fill_hud, Drawer};
use error::Error;
use export::DirectorySink;
use input::PointerTracker;
use sketchpad::Sketchpad;
use surface::{RasterSurface, Surface};
use types::{FrameBuffer, Rgba};

const PAGE_COLOR: u32 = 0x00_B0_B0_B0;
const HUD_COLOR: u32 = 0x00_20_20_20;
const FRAME_COLOR: u32 = 0x00_60_60_60;

fn main() -> Result<(), Error> {
    let config = SketchConfig::try_from(Cli::parse())?;
    logging::init(config.debug);

    /* --- Canvas setup ---
       A canvas that cannot be painted on ends the app before any window opens. */
    let canvas = match RasterSurface::new(config.width, config.height) {
        Ok(canvas) => canvas,
        Err(e) => {
            tracing::error!("{e}");
            return Ok(());
        }
    };
    let mut pad = Sketchpad::setup(canvas, config.pen, config.history_limit);
    let mut sink = DirectorySink::new(config.export_dir.clone());
    tracing::info!(
        width = config.width,
        height = config.height,
        export_dir = %sink.dir().display(),
        "sketchpad started"
    );

    /* --- Window setup --- */
    let (win_w, win_h) = draw::window_size_for((config.width, config.height));
    let mut drawer = Drawer::new("Sketchpad", win_w, win_h)?;
    let mut screen = FrameBuffer::new(win_w, win_h);

    let mut pointer = PointerTracker::default();
    let mut status = String::new();

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Layout: the canvas stays centered when the window is resized. */
        let (w, h) = drawer.size();
        screen.resize(w, h);
        let (ox, oy) = canvas_origin((w, h), (config.width, config.height));
        pad.surface_mut().set_origin(ox as f32, oy as f32);

        /* 2) Pointer → contact events → strokes. */
        if let Some(mut event) = pointer.poll(drawer.left_mouse_down(), drawer.mouse_pos()) {
            pad.handle_contact(&mut event);
            if !event.default_prevented() {
                tracing::trace!(kind = ?event.kind, "contact not consumed by the canvas");
            }
        }

        /* 3) Shortcuts. Ignored mid-stroke so a stroke is never split. */
        if !pad.pen().is_drawing() {
            if drawer.z_pressed_once() {
                status = if pad.undo() { String::new() } else { "OLDEST".into() };
            }
            if drawer.y_pressed_once() {
                status = if pad.redo() { String::new() } else { "NEWEST".into() };
            }
            if drawer.c_pressed_once() {
                pad.clear();
                status.clear();
            }
            if drawer.s_pressed_once() {
                status = match pad.export_image(&mut sink) {
                    Some(_) => "SAVED".into(),
                    None => "SAVE FAILED".into(),
                };
            }
        }

        /* 4) Compose: page, canvas on white paper, frame, HUD, crosshair. */
        screen.fill(PAGE_COLOR);
        blit_canvas(&mut screen, pad.surface().pixels(), ox, oy, Rgba::WHITE);
        draw_frame(
            &mut screen,
            ox as i32,
            oy as i32,
            pad.surface().width() as i32,
            pad.surface().height() as i32,
            FRAME_COLOR,
        );

        fill_hud(&mut screen, HUD_COLOR);
        let history = pad.history();
        let hud = format!(
            "Z UNDO  Y REDO  C CLEAR  S SAVE | {}/{} | {}",
            history.cursor() + 1,
            history.len(),
            status
        );
        draw_text_5x7(&mut screen, 8, 6, &hud, 0x00_FF_FF_FF);

        if let Some((mx, my)) = drawer.mouse_pos() {
            draw_crosshair(&mut screen, mx as i32, my as i32, 8, 0x00_CC_33_33);
        }

        /* 5) Present. */
        drawer.present(&screen)?;
    }

    tracing::info!(entries = pad.history().len(), "sketchpad closed");
    Ok(())
}
