use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};
use serde::{Deserialize, Serialize};

use crate::{
    data::textures::TextureKey,
    domain::weather::ParticleKind,
    ui::particles::{Motion, ParticleEngine},
};

/// Texels fainter than this after effect alpha are not drawn.
const MIN_VISIBLE_ALPHA: f32 = 0.05;
const SNOW_FRAMES: [char; 4] = ['*', '✳', '✶', '✻'];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSize {
    pub width_px: f32,
    pub height_px: f32,
}

impl CellSize {
    /// Largest cell edge, in surface pixels, the engine accepts.
    pub const MAX_PX: f32 = 256.0;

    /// Both edges finite, positive and no larger than [`Self::MAX_PX`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.width_px, self.height_px]
            .iter()
            .all(|px| px.is_finite() && *px > 0.0 && *px <= Self::MAX_PX)
    }
}

impl Default for CellSize {
    fn default() -> Self {
        Self {
            width_px: 8.0,
            height_px: 16.0,
        }
    }
}

/// The full-viewport particle layer, measured in virtual pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSurface {
    columns: u16,
    rows: u16,
    cell: CellSize,
}

impl RenderSurface {
    #[must_use]
    pub fn new(columns: u16, rows: u16, cell: CellSize) -> Self {
        Self {
            columns,
            rows,
            cell,
        }
    }

    /// Returns `true` when the viewport size actually changed.
    pub fn resize(&mut self, columns: u16, rows: u16) -> bool {
        if self.columns == columns && self.rows == rows {
            return false;
        }
        self.columns = columns;
        self.rows = rows;
        true
    }

    #[must_use]
    pub fn columns(&self) -> u16 {
        self.columns
    }

    #[must_use]
    pub fn rows(&self) -> u16 {
        self.rows
    }

    #[must_use]
    pub fn cell(&self) -> CellSize {
        self.cell
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        f32::from(self.columns) * self.cell.width_px
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        f32::from(self.rows) * self.cell.height_px
    }

    /// Cell containing the pixel, `None` outside the surface.
    #[must_use]
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || self.cell.width_px <= 0.0 || self.cell.height_px <= 0.0 {
            return None;
        }
        let col = (x / self.cell.width_px) as u32;
        let row = (y / self.cell.height_px) as u32;
        (col < u32::from(self.columns) && row < u32::from(self.rows))
            .then_some((col as u16, row as u16))
    }

    #[must_use]
    pub fn cell_center(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (f32::from(col) + 0.5) * self.cell.width_px,
            (f32::from(row) + 0.5) * self.cell.height_px,
        )
    }
}

/// Paints the live particles over whatever is already in the buffer.
///
/// Cells not covered by a sprite are left untouched, so the layer is
/// transparent over the background and must be rendered before the HUD.
pub struct ParticleLayer<'a> {
    engine: &'a ParticleEngine,
}

impl<'a> ParticleLayer<'a> {
    #[must_use]
    pub fn new(engine: &'a ParticleEngine) -> Self {
        Self { engine }
    }
}

impl Widget for ParticleLayer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(session) = self.engine.session().filter(|s| s.running) else {
            return;
        };
        let Some(texture) = self.engine.textures().get(TextureKey::from(session.kind)) else {
            return;
        };
        let Some(params) = self.engine.params() else {
            return;
        };
        let surface = self.engine.surface();
        let sprite_w = texture.width() * params.scale;
        let sprite_h = texture.height() * params.scale;

        for particle in self.engine.particles() {
            let cells = sprite_cells(surface, particle.x, particle.y, sprite_w, sprite_h);
            for (col, row, u, v) in cells {
                let [r, g, b, a] = texture.sample(u, v);
                let alpha = f32::from(a) / 255.0 * params.alpha;
                if alpha < MIN_VISIBLE_ALPHA {
                    continue;
                }
                let (x, y) = (area.x + col, area.y + row);
                if x >= area.right() || y >= area.bottom() {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_char(glyph(particle.motion, alpha))
                        .set_style(Style::default().fg(Color::Rgb(r, g, b)));
                }
            }
        }
    }
}

/// Cells covered by a sprite, with the texture coordinate sampled for each.
fn sprite_cells(
    surface: RenderSurface,
    x: f32,
    y: f32,
    sprite_w: f32,
    sprite_h: f32,
) -> Vec<(u16, u16, f32, f32)> {
    let cell = surface.cell();
    if sprite_w <= 0.0 || sprite_h <= 0.0 {
        return Vec::new();
    }

    if sprite_w < cell.width_px && sprite_h < cell.height_px {
        return surface
            .cell_at(x + sprite_w / 2.0, y + sprite_h / 2.0)
            .map(|(col, row)| vec![(col, row, 0.5, 0.5)])
            .unwrap_or_default();
    }

    let first_col = (x / cell.width_px).floor().max(0.0) as u16;
    let first_row = (y / cell.height_px).floor().max(0.0) as u16;
    let last_col = ((x + sprite_w) / cell.width_px).ceil().max(0.0) as u16;
    let last_row = ((y + sprite_h) / cell.height_px).ceil().max(0.0) as u16;

    let mut cells = Vec::new();
    for row in first_row..last_row.min(surface.rows()) {
        for col in first_col..last_col.min(surface.columns()) {
            let (cx, cy) = surface.cell_center(col, row);
            let u = (cx - x) / sprite_w;
            let v = (cy - y) / sprite_h;
            if (0.0..1.0).contains(&u) && (0.0..1.0).contains(&v) {
                cells.push((col, row, u, v));
            }
        }
    }
    cells
}

fn glyph(motion: Motion, alpha: f32) -> char {
    match motion {
        Motion::Rain => '│',
        Motion::Snow { rotation, .. } => {
            let frame = (rotation / std::f32::consts::FRAC_PI_2) as usize;
            SNOW_FRAMES[frame % SNOW_FRAMES.len()]
        }
        Motion::Cloud => {
            if alpha < 0.4 {
                '░'
            } else if alpha < 0.75 {
                '▒'
            } else {
                '▓'
            }
        }
    }
}

/// Backdrop colour painted beneath the particle layer.
#[must_use]
pub fn sky_color(kind: Option<ParticleKind>) -> Color {
    match kind {
        Some(ParticleKind::Rain) => Color::Rgb(28, 34, 48),
        Some(ParticleKind::Snow) => Color::Rgb(44, 52, 66),
        Some(ParticleKind::Cloud) => Color::Rgb(40, 56, 80),
        None => Color::Rgb(18, 48, 96),
    }
}
