use std::time::Duration;

use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};
use pathgrid::{CellState, Point, Visualizer};

const COLOR_OPEN: Color32 = Color32::WHITE;
const COLOR_WALL: Color32 = Color32::from_rgb(12, 53, 71);
const COLOR_START: Color32 = Color32::from_rgb(0, 170, 0);
const COLOR_FINISH: Color32 = Color32::from_rgb(200, 0, 0);
const COLOR_VISITED: Color32 = Color32::from_rgb(64, 206, 227);
const COLOR_PATH: Color32 = Color32::from_rgb(255, 254, 106);
const COLOR_GRID_LINE: Color32 = Color32::from_rgb(175, 216, 248);

pub struct App {
    visualizer: Visualizer,
    /// Cell that was painted last during the current gesture, so holding the mouse still does
    /// not toggle the same wall every frame
    last_painted: Option<Point>,
    draw_grid_lines: bool,
    output_cell: String,
    output_search: String,
}

impl App {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>, visualizer: Visualizer) -> Self {
        Self {
            visualizer,
            last_painted: None,
            draw_grid_lines: true,
            output_cell: Default::default(),
            output_search: Default::default(),
        }
    }

    fn visualize(&mut self, now: Duration) {
        match self.visualizer.visualize(now) {
            Ok(summary) => {
                self.output_search = match summary.distance {
                    Some(distance) => format!(
                        "Visited {} cells\nShortest path: {} steps",
                        summary.visited, distance
                    ),
                    None => format!(
                        "Visited {} cells\nThe finish is unreachable",
                        summary.visited
                    ),
                };
            }
            Err(e) => log::warn!("cannot visualize: {e}"),
        }
    }

    /// Translate the pointer into wall painting on the visualizer
    fn handle_pointer(&mut self, ui: &egui::Ui, response: &egui::Response, cell_size: f32) {
        let (pressed, down, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.latest_pos(),
            )
        });

        let grid = self.visualizer.grid();
        let (rows, columns) = (grid.rows(), grid.columns());
        let point = pos
            .filter(|pos| response.rect.contains(*pos))
            .map(|pos| pos - response.rect.min)
            .map(|offset| {
                Point::new(
                    (offset.y / cell_size) as usize,
                    (offset.x / cell_size) as usize,
                )
            })
            .filter(|point| point.row < rows && point.col < columns);

        if pressed && response.hovered() {
            if let Some(point) = point {
                self.visualizer.mouse_down(point);
                self.last_painted = Some(point);
            }
        } else if down && self.visualizer.is_painting() {
            if let Some(point) = point.filter(|point| self.last_painted != Some(*point)) {
                self.visualizer.mouse_enter(point);
                self.last_painted = Some(point);
            }
        } else if !down && self.visualizer.is_painting() {
            self.visualizer.mouse_up();
            self.last_painted = None;
        }

        self.output_cell = match point {
            Some(point) => format!(
                "Cell @{}:{} {:?}",
                point.row,
                point.col,
                self.visualizer.cell_state(point)
            ),
            None => String::new(),
        };
    }

    fn grid_painting(&mut self, ui: &mut egui::Ui) {
        let grid = self.visualizer.grid();
        let (rows, columns) = (grid.rows(), grid.columns());

        let available = ui.available_size();
        let cell_size = (available.x / columns as f32)
            .min(available.y / rows as f32)
            .max(1.0);
        let (response, painter) = ui.allocate_painter(
            Vec2::new(cell_size * columns as f32, cell_size * rows as f32),
            Sense::click_and_drag(),
        );

        self.handle_pointer(ui, &response, cell_size);

        let origin: Pos2 = response.rect.min;
        for cell in self.visualizer.grid().cells() {
            let rect = Rect::from_min_size(
                origin + Vec2::new(cell.col as f32, cell.row as f32) * cell_size,
                Vec2::splat(cell_size),
            );

            let color = if cell.is_start {
                COLOR_START
            } else if cell.is_finish {
                COLOR_FINISH
            } else if cell.is_wall {
                COLOR_WALL
            } else {
                match self.visualizer.cell_state(cell.point()) {
                    CellState::Unvisited => COLOR_OPEN,
                    CellState::Visited => COLOR_VISITED,
                    CellState::Path => COLOR_PATH,
                }
            };

            painter.rect_filled(rect, 0.0, color);
            if self.draw_grid_lines {
                painter.rect_stroke(rect, 0.0, Stroke::new(0.5, COLOR_GRID_LINE));
            }
        }
    }
}

impl eframe::App for App {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Duration::from_secs_f64(ctx.input(|i| i.time));

        if self.visualizer.is_animating() {
            self.visualizer.tick(now);
            // keep frames coming until the replay is over
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                // NOTE: no File->Quit on web pages!
                let is_web = cfg!(target_arch = "wasm32");
                if !is_web {
                    ui.menu_button("File", |ui| {
                        if ui.button("Quit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                    ui.add_space(16.0);
                }

                egui::widgets::global_dark_light_mode_buttons(ui);
            });
        });

        egui::SidePanel::left("side_panel").show(ctx, |ui| {
            ui.heading("Pathfinding Visualizer");

            let animating = self.visualizer.is_animating();

            if ui
                .add_enabled(
                    !animating,
                    egui::Button::new("Visualize Dijkstra's Algorithm"),
                )
                .clicked()
            {
                self.visualize(now);
            }

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(animating, egui::Button::new("Cancel"))
                    .clicked()
                {
                    self.visualizer.cancel();
                }
                if ui
                    .add_enabled(!animating, egui::Button::new("Clear"))
                    .clicked()
                {
                    match self.visualizer.clear_search() {
                        Ok(()) => self.output_search.clear(),
                        Err(e) => log::warn!("cannot clear: {e}"),
                    }
                }
            });

            ui.checkbox(&mut self.draw_grid_lines, "Draw grid lines");

            ui.separator();
            ui.label(&self.output_search);
            ui.label(&self.output_cell);

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                powered_by_egui_and_eframe(ui);
                egui::warn_if_debug_build(ui);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.grid_painting(ui);
        });
    }
}

fn powered_by_egui_and_eframe(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        ui.label("Powered by ");
        ui.hyperlink_to("egui", "https://github.com/emilk/egui");
        ui.label(" and ");
        ui.hyperlink_to(
            "eframe",
            "https://github.com/emilk/egui/tree/master/crates/eframe",
        );
        ui.label(".");
    });
}
