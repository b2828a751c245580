#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reference render and UI sinks for Lane Defence adapters.
//!
//! [`AsciiRenderer`] rasterises each [`Frame`] into one character per grid
//! cell, which is enough for headless runs and golden tests. [`HudLine`]
//! formats the status display into a single line of text.

use glam::Vec2;
use lane_defence_core::{
    EnemyKind, Frame, GridLayout, HudSnapshot, RenderSink, TowerKind, UiSink, WorldPoint, Zone,
};

const LANE_GLYPH: char = '=';
const SLOT_GLYPH: char = '|';
const INVENTORY_GLYPH: char = '#';
const OPEN_GLYPH: char = '.';
const PROJECTILE_GLYPH: char = '*';
const LEGAL_DROP_GLYPH: char = '+';
const ILLEGAL_DROP_GLYPH: char = 'x';

/// Character used for an enemy preset.
#[must_use]
pub const fn enemy_glyph(kind: EnemyKind) -> char {
    match kind {
        EnemyKind::Normal => 'n',
        EnemyKind::Fast => 'f',
        EnemyKind::Tank => 't',
    }
}

/// Character used for a tower; upper-case while selected.
#[must_use]
pub fn tower_glyph(kind: TowerKind, selected: bool) -> char {
    let initial = kind.initial();
    if selected {
        initial
    } else {
        initial.to_ascii_lowercase()
    }
}

fn zone_glyph(zone: Zone) -> char {
    match zone {
        Zone::EnemyLane => LANE_GLYPH,
        Zone::TowerSlots => SLOT_GLYPH,
        Zone::Inventory => INVENTORY_GLYPH,
        Zone::Open | Zone::OutOfBounds => OPEN_GLYPH,
    }
}

/// Character raster of a single frame, addressed by column and row.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Raster {
    columns: usize,
    cells: Vec<char>,
}

impl Raster {
    fn for_grid(grid: &GridLayout) -> Self {
        let columns = grid.columns() as usize;
        let cells = (0..grid.rows())
            .flat_map(|row| {
                (0..grid.columns()).map(move |column| {
                    zone_glyph(grid.zone_of(lane_defence_core::CellCoord::new(column, row)))
                })
            })
            .collect();
        Self { columns, cells }
    }

    fn plot(&mut self, grid: &GridLayout, point: WorldPoint, glyph: char) {
        if let Some(index) = raster_index(grid, point) {
            if let Some(cell) = self.cells.get_mut(index) {
                *cell = glyph;
            }
        }
    }

    fn into_text(self) -> String {
        let width = self.columns.max(1);
        let mut text = String::with_capacity(self.cells.len() + self.cells.len() / width);
        for row in self.cells.chunks(width) {
            text.extend(row.iter());
            text.push('\n');
        }
        text
    }
}

/// Maps a canvas point onto a raster index, or `None` when it lies off the grid.
fn raster_index(grid: &GridLayout, point: WorldPoint) -> Option<usize> {
    let scaled = (Vec2::new(point.x(), point.y()) / grid.cell_size()).floor();
    if scaled.x < 0.0 || scaled.y < 0.0 {
        return None;
    }
    let (column, row) = (scaled.x as u32, scaled.y as u32);
    if column >= grid.columns() || row >= grid.rows() {
        return None;
    }
    Some(row as usize * grid.columns() as usize + column as usize)
}

/// Rasterises a frame into text, one line per grid row.
#[must_use]
pub fn render_frame(frame: &Frame) -> String {
    let grid = &frame.grid;
    let mut raster = Raster::for_grid(grid);

    if let Some(preview) = frame.drag {
        if let Some(cell) = preview.cell {
            let glyph = if preview.placeable {
                LEGAL_DROP_GLYPH
            } else {
                ILLEGAL_DROP_GLYPH
            };
            raster.plot(grid, grid.center_of(cell), glyph);
        }
    }

    for tower in frame.towers.iter() {
        raster.plot(grid, tower.position, tower_glyph(tower.kind, tower.selected));
    }
    for enemy in frame.enemies.iter() {
        raster.plot(grid, enemy.position, enemy_glyph(enemy.kind));
    }
    for projectile in frame.towers.iter().flat_map(|tower| tower.projectiles.iter()) {
        raster.plot(grid, projectile.position, PROJECTILE_GLYPH);
    }

    let mut text = raster.into_text();
    if frame.game_over {
        text.push_str("GAME OVER\n");
    }
    text
}

/// Render sink keeping the most recent rasterised frame.
#[derive(Clone, Debug, Default)]
pub struct AsciiRenderer {
    last_frame: String,
    frames_presented: u64,
}

impl AsciiRenderer {
    /// Creates a renderer that has not presented anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the most recently presented frame.
    #[must_use]
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    /// Number of frames presented so far.
    #[must_use]
    pub const fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl RenderSink for AsciiRenderer {
    fn present(&mut self, frame: &Frame) {
        self.last_frame = render_frame(frame);
        self.frames_presented = self.frames_presented.saturating_add(1);
    }
}

/// Formats the status display as a single line.
#[must_use]
pub fn format_hud(hud: &HudSnapshot) -> String {
    let mut line = format!(
        "Money: {} | Lives: {} | Wave: {}",
        hud.money, hud.lives, hud.wave
    );
    if hud.game_over {
        line.push_str(" | GAME OVER");
    }
    line
}

/// UI sink recording every status line it was asked to show.
#[derive(Clone, Debug, Default)]
pub struct HudLine {
    history: Vec<String>,
}

impl HudLine {
    /// Creates an empty status line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent status line, if any update arrived.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    /// Every status line in arrival order.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl UiSink for HudLine {
    fn hud_changed(&mut self, hud: &HudSnapshot) {
        self.history.push(format_hud(hud));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::{
        CellCoord, DragPreview, EnemyId, EnemySnapshot, EnemyView, Health, LaneId,
        ProjectileSnapshot, TowerId, TowerSnapshot, TowerView,
    };

    fn empty_frame() -> Frame {
        Frame {
            grid: GridLayout::new(17, 8, 40.0),
            enemies: EnemyView::default(),
            towers: TowerView::default(),
            drag: None,
            game_over: false,
        }
    }

    #[test]
    fn empty_grid_shows_zones() {
        let text = render_frame(&empty_frame());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], ".................");
        assert_eq!(lines[2], "==============|##");
        assert_eq!(lines[5], "==============|##");
        assert_eq!(lines[6], ".................");
    }

    #[test]
    fn entities_are_drawn_over_zones() {
        let mut frame = empty_frame();
        frame.towers = TowerView::from_snapshots(vec![TowerSnapshot {
            id: TowerId::new(0),
            kind: TowerKind::Sniper,
            level: 1,
            cell: CellCoord::new(14, 3),
            position: WorldPoint::new(580.0, 140.0),
            range: 800.0,
            selected: false,
            projectiles: vec![ProjectileSnapshot {
                position: WorldPoint::new(300.0, 140.0),
                splash_radius: 0.0,
            }],
        }]);
        frame.enemies = EnemyView::from_snapshots(vec![EnemySnapshot {
            id: EnemyId::new(0),
            kind: EnemyKind::Tank,
            lane: LaneId::new(3),
            position: WorldPoint::new(20.0, 140.0),
            size: 25.0,
            health: Health::new(200),
            max_health: Health::new(200),
        }]);

        let text = render_frame(&frame);
        let row: &str = text.lines().nth(3).expect("row three");
        assert_eq!(row, "t======*======s##");
    }

    #[test]
    fn drag_preview_marks_hovered_cell() {
        let mut frame = empty_frame();
        frame.drag = Some(DragPreview {
            tower: TowerId::new(0),
            cell: Some(CellCoord::new(5, 4)),
            placeable: false,
            sprite_origin: WorldPoint::new(220.0, 180.0),
        });
        frame.game_over = true;

        let text = render_frame(&frame);
        assert_eq!(text.lines().nth(4), Some("=====x========|##"));
        assert_eq!(text.lines().last(), Some("GAME OVER"));
    }

    #[test]
    fn selected_towers_are_upper_case() {
        assert_eq!(tower_glyph(TowerKind::Aoe, true), 'A');
        assert_eq!(tower_glyph(TowerKind::Aoe, false), 'a');
        assert_eq!(enemy_glyph(EnemyKind::Fast), 'f');
    }

    #[test]
    fn points_off_the_grid_are_skipped() {
        let grid = GridLayout::new(17, 8, 40.0);
        assert_eq!(raster_index(&grid, WorldPoint::new(-1.0, 5.0)), None);
        assert_eq!(raster_index(&grid, WorldPoint::new(5.0, 320.0)), None);
        assert_eq!(raster_index(&grid, WorldPoint::new(45.0, 5.0)), Some(1));
    }

    #[test]
    fn hud_line_records_updates() {
        let mut sink = HudLine::new();
        sink.hud_changed(&HudSnapshot {
            money: 100,
            lives: 10,
            wave: 0,
            game_over: false,
        });
        sink.hud_changed(&HudSnapshot {
            money: 0,
            lives: 0,
            wave: 3,
            game_over: true,
        });
        assert_eq!(sink.history()[0], "Money: 100 | Lives: 10 | Wave: 0");
        assert_eq!(sink.current(), Some("Money: 0 | Lives: 0 | Wave: 3 | GAME OVER"));
    }

    #[test]
    fn renderer_keeps_latest_frame() {
        let mut renderer = AsciiRenderer::new();
        renderer.present(&empty_frame());
        assert_eq!(renderer.frames_presented(), 1);
        assert!(renderer.last_frame().starts_with("................."));
    }
}
