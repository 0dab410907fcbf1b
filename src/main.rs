use anyhow::{Context as _, Result};
use clap::Parser;
use fontdue::{Font, Metrics};
use softbuffer::{Context, Surface};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, ModifiersState, NamedKey};
use winit::window::Window;

use gridclue::cli::CliArgs;
use gridclue::commands::Cmd;
use gridclue::font;
use gridclue::layout::{GridLayout, EDGE_WIDTH, NUMBER_INSET};
use gridclue::messages::{AppMsg, Msg};
use gridclue::model::{AppModel, Grid};
use gridclue::svg;
use gridclue::theme;
use gridclue::update::update;

// Glyph cache key: (character, font_size as bits)
type GlyphCacheKey = (char, u32);
type GlyphCache = HashMap<GlyphCacheKey, (Metrics, Vec<u8>)>;

// ============================================================================
// VIEW - Render the model to screen
// ============================================================================

struct Renderer {
    font: Font,
    surface: Surface<Rc<Window>, Rc<Window>>,
    width: u32,
    height: u32,
    glyph_cache: GlyphCache,
}

impl Renderer {
    fn new(window: Rc<Window>, context: &Context<Rc<Window>>, font: Font) -> Result<Self> {
        let (width, height) = {
            let size = window.inner_size();
            (size.width, size.height)
        };

        let surface = Surface::new(context, Rc::clone(&window))
            .map_err(|e| anyhow::anyhow!("Failed to create surface: {}", e))?;

        Ok(Self {
            font,
            surface,
            width,
            height,
            glyph_cache: HashMap::new(),
        })
    }

    fn render(&mut self, model: &AppModel) -> Result<()> {
        if self.width != model.window_size.0 || self.height != model.window_size.1 {
            self.width = model.window_size.0;
            self.height = model.window_size.1;
        }

        let (width_nz, height_nz) = match (NonZeroU32::new(self.width), NonZeroU32::new(self.height))
        {
            (Some(w), Some(h)) => (w, h),
            // Minimized window; nothing to paint.
            _ => return Ok(()),
        };
        self.surface
            .resize(width_nz, height_nz)
            .map_err(|e| anyhow::anyhow!("Failed to resize surface: {}", e))?;

        let width = self.width;
        let height = self.height;

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("Failed to get surface buffer: {}", e))?;

        let colors = &model.theme.colors;
        buffer.fill(colors.background.to_argb_u32());

        let layout = GridLayout::compute(width as f32, height as f32, &model.grid);
        if !layout.is_degenerate() {
            Self::render_cells(
                &mut buffer,
                model,
                &layout,
                &self.font,
                &mut self.glyph_cache,
                width,
                height,
            );
            Self::render_edges(&mut buffer, model, &layout, width, height);
        }

        buffer
            .present()
            .map_err(|e| anyhow::anyhow!("Failed to present buffer: {}", e))?;
        Ok(())
    }

    /// First pass: cell backgrounds, characters and clue numbers.
    fn render_cells(
        buffer: &mut [u32],
        model: &AppModel,
        layout: &GridLayout,
        font: &Font,
        glyph_cache: &mut GlyphCache,
        width: u32,
        height: u32,
    ) {
        let colors = &model.theme.colors;
        let cell_fill = colors.cell_fill.to_argb_u32();
        let text_color = colors.text.to_argb_u32();
        let number_color = colors.number.to_argb_u32();

        let cs = layout.cell;
        let char_size = layout.char_size();
        let num_size = layout.number_size();

        let (char_ascent, char_descent) = line_metrics(font, char_size);
        let (num_ascent, _) = line_metrics(font, num_size);

        for (r, c, cell) in model.grid.iter() {
            if !cell.is_active() {
                continue;
            }

            let (x, y) = layout.cell_origin(r, c);

            fill_rect(buffer, width, height, x, y, cs, cs, cell_fill);

            // Character, centered in the cell
            let advance = glyph_advance(font, glyph_cache, cell.ch, char_size);
            let baseline = y + cs / 2.0 + (char_ascent - char_descent) / 2.0;
            draw_glyph(
                buffer,
                font,
                glyph_cache,
                char_size,
                width,
                height,
                x + cs / 2.0 - advance / 2.0,
                baseline,
                cell.ch,
                text_color,
            );

            // Clue number, tucked into the top-left corner
            if cell.num > 0 {
                let mut nx = x + NUMBER_INSET;
                let ny = y + NUMBER_INSET + num_ascent;
                for digit in cell.num.to_string().chars() {
                    draw_glyph(
                        buffer,
                        font,
                        glyph_cache,
                        num_size,
                        width,
                        height,
                        nx,
                        ny,
                        digit,
                        number_color,
                    );
                    nx += glyph_advance(font, glyph_cache, digit, num_size);
                }
            }
        }
    }

    /// Second pass: run-boundary edges on top of the cell fills.
    ///
    /// Left edge only at the start of an across run, top edge only at the
    /// start of a down run; right and bottom edges always, so interior
    /// boundaries come from the neighbor's trailing edge.
    fn render_edges(
        buffer: &mut [u32],
        model: &AppModel,
        layout: &GridLayout,
        width: u32,
        height: u32,
    ) {
        let edge_color = model.theme.colors.edge.to_argb_u32();
        let cs = layout.cell;

        for (r, c, cell) in model.grid.iter() {
            if !cell.is_active() {
                continue;
            }

            let (x, y) = layout.cell_origin(r, c);

            if !cell.is_l {
                vline(buffer, width, height, x, y, y + cs, edge_color);
            }
            vline(buffer, width, height, x + cs, y, y + cs, edge_color);

            if !cell.is_u {
                hline(buffer, width, height, x, x + cs, y, edge_color);
            }
            hline(buffer, width, height, x, x + cs, y + cs, edge_color);
        }
    }
}

/// Ascent/descent for a font size, falling back to a size-derived guess for
/// fonts without horizontal line metrics.
fn line_metrics(font: &Font, size: f32) -> (f32, f32) {
    match font.horizontal_line_metrics(size) {
        Some(m) => (m.ascent, m.descent),
        None => (size * 0.8, -size * 0.2),
    }
}

fn glyph_advance(font: &Font, glyph_cache: &mut GlyphCache, ch: char, size: f32) -> f32 {
    let key = (ch, size.to_bits());
    if !glyph_cache.contains_key(&key) {
        let (metrics, bitmap) = font.rasterize(ch, size);
        glyph_cache.insert(key, (metrics, bitmap));
    }
    glyph_cache[&key].0.advance_width
}

/// Draw one glyph with its origin on the text baseline, alpha-blended
/// against whatever is already in the buffer.
#[allow(clippy::too_many_arguments)]
fn draw_glyph(
    buffer: &mut [u32],
    font: &Font,
    glyph_cache: &mut GlyphCache,
    font_size: f32,
    width: u32,
    height: u32,
    x: f32,
    baseline: f32,
    ch: char,
    color: u32,
) {
    let key = (ch, font_size.to_bits());
    if !glyph_cache.contains_key(&key) {
        let (metrics, bitmap) = font.rasterize(ch, font_size);
        glyph_cache.insert(key, (metrics, bitmap));
    }
    let (metrics, bitmap) = glyph_cache.get(&key).unwrap();

    // Position glyph for PositiveYDown coordinate system
    // (matches fontdue's layout.rs: y = -height - ymin)
    let glyph_top = baseline - metrics.height as f32 - metrics.ymin as f32;

    for bitmap_y in 0..metrics.height {
        for bitmap_x in 0..metrics.width {
            let bitmap_idx = bitmap_y * metrics.width + bitmap_x;
            if bitmap_idx >= bitmap.len() {
                continue;
            }
            let alpha = bitmap[bitmap_idx];
            if alpha == 0 {
                continue;
            }

            let px = x as isize + bitmap_x as isize + metrics.xmin as isize;
            let py = (glyph_top + bitmap_y as f32) as isize;

            if px >= 0 && py >= 0 && (px as usize) < width as usize && (py as usize) < height as usize
            {
                let px = px as usize;
                let py = py as usize;

                // Blend the glyph with background based on alpha
                let alpha_f = alpha as f32 / 255.0;
                let bg_pixel = buffer[py * width as usize + px];

                let bg_r = ((bg_pixel >> 16) & 0xFF) as f32;
                let bg_g = ((bg_pixel >> 8) & 0xFF) as f32;
                let bg_b = (bg_pixel & 0xFF) as f32;

                let fg_r = ((color >> 16) & 0xFF) as f32;
                let fg_g = ((color >> 8) & 0xFF) as f32;
                let fg_b = (color & 0xFF) as f32;

                let final_r = (bg_r * (1.0 - alpha_f) + fg_r * alpha_f) as u32;
                let final_g = (bg_g * (1.0 - alpha_f) + fg_g * alpha_f) as u32;
                let final_b = (bg_b * (1.0 - alpha_f) + fg_b * alpha_f) as u32;

                buffer[py * width as usize + px] =
                    0xFF000000 | (final_r << 16) | (final_g << 8) | final_b;
            }
        }
    }
}

fn fill_rect(buffer: &mut [u32], width: u32, height: u32, x: f32, y: f32, w: f32, h: f32, color: u32) {
    let x0 = x.max(0.0) as usize;
    let y0 = y.max(0.0) as usize;
    let x1 = ((x + w).max(0.0) as usize).min(width as usize);
    let y1 = ((y + h).max(0.0) as usize).min(height as usize);

    for py in y0..y1 {
        for px in x0..x1 {
            buffer[py * width as usize + px] = color;
        }
    }
}

/// Vertical edge centered on x, EDGE_WIDTH pixels thick.
fn vline(buffer: &mut [u32], width: u32, height: u32, x: f32, y0: f32, y1: f32, color: u32) {
    fill_rect(
        buffer,
        width,
        height,
        x - EDGE_WIDTH / 2.0,
        y0 - EDGE_WIDTH / 2.0,
        EDGE_WIDTH,
        y1 - y0 + EDGE_WIDTH,
        color,
    );
}

/// Horizontal edge centered on y, EDGE_WIDTH pixels thick.
fn hline(buffer: &mut [u32], width: u32, height: u32, x0: f32, x1: f32, y: f32, color: u32) {
    fill_rect(
        buffer,
        width,
        height,
        x0 - EDGE_WIDTH / 2.0,
        y - EDGE_WIDTH / 2.0,
        x1 - x0 + EDGE_WIDTH,
        EDGE_WIDTH,
        color,
    );
}

// ============================================================================
// INPUT HANDLING
// ============================================================================

fn handle_key(model: &mut AppModel, key: Key, ctrl: bool, logo: bool) -> Option<Cmd> {
    match key {
        // Export the grid as SVG
        Key::Character(ref s) if s.eq_ignore_ascii_case("p") || s.eq_ignore_ascii_case("e") => {
            update(model, Msg::App(AppMsg::ExportSvg))
        }

        // Re-read the puzzle file
        Key::Character(ref s) if s.eq_ignore_ascii_case("r") => {
            update(model, Msg::App(AppMsg::ReloadPuzzle))
        }

        // Quit (Escape, Ctrl+Q, Cmd+Q)
        Key::Named(NamedKey::Escape) => update(model, Msg::App(AppMsg::Quit)),
        Key::Character(ref s) if s.eq_ignore_ascii_case("q") && (ctrl || logo) => {
            update(model, Msg::App(AppMsg::Quit))
        }

        _ => None,
    }
}

// ============================================================================
// APP - winit application shell
// ============================================================================

struct App {
    model: AppModel,
    renderer: Option<Renderer>,
    window: Option<Rc<Window>>,
    context: Option<Context<Rc<Window>>>,
    modifiers: ModifiersState,
    /// Font handed to the renderer once the window exists
    pending_font: Option<Font>,
    /// Channel sender for async command results
    msg_tx: Sender<Msg>,
    /// Channel receiver for async command results
    msg_rx: Receiver<Msg>,
}

impl App {
    fn new(model: AppModel, font: Font) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            model,
            renderer: None,
            window: None,
            context: None,
            modifiers: ModifiersState::empty(),
            pending_font: Some(font),
            msg_tx,
            msg_rx,
        }
    }

    fn handle_event(&mut self, event: &WindowEvent) -> Option<Cmd> {
        match event {
            WindowEvent::Resized(size) => update(
                &mut self.model,
                Msg::App(AppMsg::Resize(size.width, size.height)),
            ),
            WindowEvent::ModifiersChanged(mods) => {
                self.modifiers = mods.state();
                None
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    let ctrl = self.modifiers.control_key();
                    let logo = self.modifiers.super_key();
                    handle_key(&mut self.model, event.logical_key.clone(), ctrl, logo)
                } else {
                    None
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    tracing::error!("Render error: {}", e);
                }
                None
            }
            _ => None,
        }
    }

    fn render(&mut self) -> Result<()> {
        if let Some(renderer) = &mut self.renderer {
            renderer.render(&self.model)?;
        }
        Ok(())
    }

    fn sync_title(&self) {
        if let Some(window) = &self.window {
            window.set_title(&self.model.window_title());
        }
    }

    /// Process a command, potentially spawning async operations
    fn process_cmd(&self, cmd: Cmd) {
        match cmd {
            Cmd::Redraw => {
                // Handled by the caller requesting a window redraw
            }
            Cmd::LoadPuzzle { path } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let result = Grid::load(&path).map_err(|e| e.to_string());
                    let _ = tx.send(Msg::App(AppMsg::PuzzleLoaded { path, result }));
                });
            }
            Cmd::WriteSvg { path, document } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let result = svg::write_svg(&path, &document)
                        .map(|_| path)
                        .map_err(|e| e.to_string());
                    let _ = tx.send(Msg::App(AppMsg::ExportCompleted(result)));
                });
            }
            Cmd::Quit => {
                // Handled by the caller exiting the event loop
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }

    /// Process pending async messages from the channel
    fn process_async_messages(&mut self) -> bool {
        let mut needs_redraw = false;
        while let Ok(msg) = self.msg_rx.try_recv() {
            if let Some(cmd) = update(&mut self.model, msg) {
                if cmd.needs_redraw() {
                    needs_redraw = true;
                }
                self.process_cmd(cmd);
            }
        }
        if needs_redraw {
            self.sync_title();
        }
        needs_redraw
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attributes = Window::default_attributes()
                .with_title(self.model.window_title())
                .with_inner_size(LogicalSize::new(800, 800));

            let window = match event_loop.create_window(window_attributes) {
                Ok(window) => Rc::new(window),
                Err(e) => {
                    tracing::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };
            let context = match Context::new(Rc::clone(&window)) {
                Ok(context) => context,
                Err(e) => {
                    tracing::error!("Failed to create graphics context: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            // resumed fires once per desktop session; the font is only
            // handed over on that first call.
            let Some(font) = self.pending_font.take() else {
                return;
            };
            match Renderer::new(Rc::clone(&window), &context, font) {
                Ok(renderer) => self.renderer = Some(renderer),
                Err(e) => {
                    tracing::error!("Failed to initialize renderer: {}", e);
                    event_loop.exit();
                    return;
                }
            }

            let size = window.inner_size();
            self.model.window_size = (size.width, size.height);

            self.window = Some(window);
            self.context = Some(context);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let is_our_window = self
            .window
            .as_ref()
            .map(|window| window_id == window.id())
            .unwrap_or(false);

        let mut should_exit = matches!(event, WindowEvent::CloseRequested);
        let should_redraw = if is_our_window && !should_exit {
            if let Some(cmd) = self.handle_event(&event) {
                should_exit = cmd.wants_exit();
                let needs_redraw = cmd.needs_redraw();
                self.process_cmd(cmd);
                self.sync_title();
                needs_redraw
            } else {
                false
            }
        } else {
            false
        };

        if should_exit {
            event_loop.exit();
        } else if should_redraw {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Poll so results from worker threads are picked up promptly
        event_loop.set_control_flow(ControlFlow::Poll);

        if self.process_async_messages() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}

// ============================================================================
// MAIN - Entry point
// ============================================================================

fn main() -> Result<()> {
    gridclue::tracing::init();

    let config = CliArgs::parse().into_config();

    let theme = theme::load_theme(&config.theme_id)
        .map_err(|e| anyhow::anyhow!("Failed to load theme {:?}: {}", config.theme_id, e))?;

    let grid = match Grid::load(&config.puzzle_path) {
        Ok(grid) => grid,
        Err(e)
            if !config.puzzle_explicit && e.kind() == std::io::ErrorKind::NotFound =>
        {
            tracing::warn!(
                "No {} in the working directory; starting with an empty grid",
                config.puzzle_path.display()
            );
            Grid::default()
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to load puzzle {}", config.puzzle_path.display())
            });
        }
    };

    // Headless export: no window, no font needed
    if let Some(export_path) = &config.export_path {
        let document = svg::render_svg(&grid, &theme);
        svg::write_svg(export_path, &document)
            .with_context(|| format!("Failed to write {}", export_path.display()))?;
        println!("Wrote {}", export_path.display());
        return Ok(());
    }

    let font = font::load_font(config.font_path.as_deref())?;

    let model = AppModel::new(grid, config.puzzle_path, theme, 800, 800);

    let event_loop = EventLoop::new()?;
    let mut app = App::new(model, font);

    event_loop.run_app(&mut app)?;

    Ok(())
}

// ============================================================================
// TESTS - Key binding tests that require handle_key()
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gridclue::theme::Theme;
    use std::path::PathBuf;

    fn test_model() -> AppModel {
        AppModel::new(
            Grid::from_text("AB\n C"),
            PathBuf::from("daily.txt"),
            Theme::default(),
            800,
            800,
        )
    }

    fn contains_write(cmd: &Option<Cmd>) -> bool {
        matches!(
            cmd,
            Some(Cmd::Batch(cmds))
                if cmds.iter().any(|c| matches!(c, Cmd::WriteSvg { .. }))
        )
    }

    fn contains_load(cmd: &Option<Cmd>) -> bool {
        matches!(
            cmd,
            Some(Cmd::Batch(cmds))
                if cmds.iter().any(|c| matches!(c, Cmd::LoadPuzzle { .. }))
        )
    }

    #[test]
    fn test_p_key_exports_svg() {
        let mut model = test_model();
        let cmd = handle_key(&mut model, Key::Character("p".into()), false, false);
        assert!(contains_write(&cmd));
    }

    #[test]
    fn test_e_key_also_exports() {
        let mut model = test_model();
        let cmd = handle_key(&mut model, Key::Character("E".into()), false, false);
        assert!(contains_write(&cmd));
    }

    #[test]
    fn test_r_key_reloads_puzzle() {
        let mut model = test_model();
        let cmd = handle_key(&mut model, Key::Character("r".into()), false, false);
        assert!(contains_load(&cmd));
    }

    #[test]
    fn test_escape_quits() {
        let mut model = test_model();
        let cmd = handle_key(&mut model, Key::Named(NamedKey::Escape), false, false);
        assert!(cmd.map(|c| c.wants_exit()).unwrap_or(false));
    }

    #[test]
    fn test_ctrl_q_quits_but_bare_q_does_not() {
        let mut model = test_model();
        let cmd = handle_key(&mut model, Key::Character("q".into()), true, false);
        assert!(cmd.map(|c| c.wants_exit()).unwrap_or(false));

        let cmd = handle_key(&mut model, Key::Character("q".into()), false, false);
        assert!(cmd.is_none());
    }
}
