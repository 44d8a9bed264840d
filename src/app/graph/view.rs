use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::super::render_utils::{
    blend_color, circle_visible, dim_color, draw_background, edge_visible, world_to_screen,
};
use super::super::{GraphSession, NODE_RADIUS};

const ENTITY_FILL: Color32 = Color32::from_rgb(87, 156, 214);
const HOVER_FILL: Color32 = Color32::from_rgb(255, 164, 101);
const SELECTED_TINT: Color32 = Color32::from_rgb(245, 206, 93);
const SEARCH_TINT: Color32 = Color32::from_rgb(103, 196, 255);
const EDGE_COLOR: Color32 = Color32::from_rgb(110, 118, 129);

impl GraphSession {
    fn search_matches(&self) -> Option<HashSet<usize>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let matcher = SkimMatcherV2::default();
        Some(
            self.scene
                .nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| {
                    matcher.fuzzy_match(&node.id, query).map(|_score| index)
                })
                .collect(),
        )
    }

    /// One frame: step the simulation if it still has energy, then repaint
    /// every edge, edge label, circle, and node label from the current
    /// positions.
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_zoom(ui, rect, &response);

        let moving = self.sim.tick();

        let pan = self.pan;
        let zoom = self.zoom;
        self.screen_positions.clear();
        self.screen_positions
            .extend(
                self.sim
                    .nodes()
                    .iter()
                    .map(|node| world_to_screen(rect, pan, zoom, node.pos)),
            );

        let hovered = self.hovered_node(ui);
        self.handle_drag(ui, rect, &response, hovered);

        if moving || response.dragged() {
            ui.ctx().request_repaint();
        }

        let matches = self.search_matches();
        let search_active = matches.as_ref().is_some_and(|matched| !matched.is_empty());

        let node_radius = NODE_RADIUS * self.zoom;
        let label_font = FontId::proportional(12.0);
        let edge_stroke = Stroke::new((1.2 * self.zoom.sqrt()).clamp(0.6, 3.0), EDGE_COLOR);

        for edge in &self.scene.edges {
            let Some(&start) = self.screen_positions.get(edge.source) else {
                continue;
            };
            let Some(&end) = self.screen_positions.get(edge.target) else {
                continue;
            };
            if !edge_visible(rect, start, end, 2.0) {
                continue;
            }

            painter.line_segment([start, end], edge_stroke);
            painter.text(
                start + (end - start) * 0.5,
                Align2::CENTER_CENTER,
                &edge.label,
                label_font.clone(),
                Color32::from_gray(150),
            );
        }

        for (index, node) in self.scene.nodes.iter().enumerate() {
            let Some(&position) = self.screen_positions.get(index) else {
                continue;
            };
            if !circle_visible(rect, position, node_radius) {
                continue;
            }

            let is_hovered = hovered == Some(index);
            let is_selected = self.selected.as_deref() == Some(node.id.as_str());
            let is_match = matches.as_ref().is_some_and(|matched| matched.contains(&index));

            let fill = if is_hovered {
                HOVER_FILL
            } else if is_selected {
                blend_color(ENTITY_FILL, SELECTED_TINT, 0.7)
            } else if is_match {
                blend_color(ENTITY_FILL, SEARCH_TINT, 0.7)
            } else if search_active {
                dim_color(ENTITY_FILL, 0.45)
            } else {
                ENTITY_FILL
            };

            painter.circle_filled(position, node_radius, fill);
            painter.circle_stroke(
                position,
                node_radius,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );
            painter.text(
                position + vec2(node_radius + 5.0, 0.0),
                Align2::LEFT_CENTER,
                &node.id,
                label_font.clone(),
                Color32::from_gray(238),
            );
        }

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if response.clicked() {
            self.selected =
                hovered.and_then(|index| self.scene.nodes.get(index).map(|node| node.id.clone()));
        }
    }
}
