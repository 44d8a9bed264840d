use eframe::egui::{self, Rect, Ui, Vec2};

use super::super::render_utils::screen_to_world;
use super::super::sim::DRAG_ALPHA_TARGET;
use super::super::{DragGesture, GraphSession, NODE_RADIUS};

pub(in crate::app) const MIN_ZOOM: f32 = 0.5;
pub(in crate::app) const MAX_ZOOM: f32 = 5.0;

impl GraphSession {
    pub(in crate::app) fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = self.clamped_zoom(zoom_factor);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    /// The view scale after applying `factor`, bounded to the allowed range
    /// no matter how extreme the gesture input.
    pub(in crate::app) fn clamped_zoom(&self, factor: f32) -> f32 {
        (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM)
    }

    /// Closest node whose circle is under the pointer, by this frame's
    /// screen positions.
    pub(in crate::app) fn hovered_node(&self, ui: &Ui) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        let hit_radius = (NODE_RADIUS * self.zoom).max(6.0);

        self.screen_positions
            .iter()
            .enumerate()
            .filter_map(|(index, position)| {
                let distance = position.distance(pointer);
                (distance <= hit_radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub(in crate::app) fn handle_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        hovered: Option<usize>,
    ) {
        if response.drag_started() {
            self.drag = Some(match hovered {
                Some(index) => {
                    self.begin_node_drag(index);
                    DragGesture::Node(index)
                }
                None => DragGesture::Pan,
            });
        }

        if response.dragged() {
            match self.drag {
                Some(DragGesture::Node(index)) => {
                    if let Some(pointer) = ui.input(|input| input.pointer.interact_pos()) {
                        self.drag_node_to(index, screen_to_world(rect, self.pan, self.zoom, pointer));
                    }
                }
                Some(DragGesture::Pan) => self.pan += response.drag_delta(),
                None => {}
            }
        }

        if response.drag_stopped() {
            self.finish_drag();
        }
    }

    /// Drag start: reheat an idle simulation and pin the node where it is,
    /// so the first tick after the gesture begins holds it in place.
    pub(in crate::app) fn begin_node_drag(&mut self, index: usize) {
        if self.sim.alpha_target() < DRAG_ALPHA_TARGET {
            self.sim.reheat(DRAG_ALPHA_TARGET);
        }
        if let Some(node) = self.sim.nodes().get(index) {
            let position = node.pos;
            self.sim.set_pin(index, position);
        }
    }

    /// Drag move: the pin follows the pointer and the next tick consumes it.
    pub(in crate::app) fn drag_node_to(&mut self, index: usize, world: Vec2) {
        self.sim.set_pin(index, world);
    }

    /// Drag end: alpha resumes normal decay and the node goes back to free
    /// simulation.
    pub(in crate::app) fn finish_drag(&mut self) {
        if let Some(DragGesture::Node(index)) = self.drag.take() {
            self.sim.cool();
            self.sim.clear_pin(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::super::super::{DragGesture, GraphSession};
    use super::{MAX_ZOOM, MIN_ZOOM};
    use crate::kb::{adapt, demo_payload};

    fn demo_session() -> GraphSession {
        GraphSession::new(
            "demo".to_owned(),
            adapt(demo_payload()).expect("demo payload adapts"),
        )
    }

    #[test]
    fn zoom_never_leaves_the_allowed_range() {
        let mut session = demo_session();

        for _ in 0..100 {
            session.zoom = session.clamped_zoom(10.0);
        }
        assert_eq!(session.zoom, MAX_ZOOM);

        for _ in 0..100 {
            session.zoom = session.clamped_zoom(0.0001);
        }
        assert_eq!(session.zoom, MIN_ZOOM);
    }

    #[test]
    fn drag_pins_the_node_and_reheats_the_simulation() {
        let mut session = demo_session();
        while session.sim.tick() {}
        assert!(!session.sim.is_active());

        session.begin_node_drag(0);
        assert!(session.sim.is_active());
        let pinned_at = session.sim.nodes()[0].pin.expect("drag start pins the node");
        assert_eq!(pinned_at, session.sim.nodes()[0].pos);

        session.drag_node_to(0, vec2(100.0, 200.0));
        session.sim.tick();
        assert_eq!(session.sim.nodes()[0].pos, vec2(100.0, 200.0));
    }

    #[test]
    fn release_unpins_and_hands_the_node_back_to_the_simulation() {
        let mut session = demo_session();
        session.begin_node_drag(0);
        session.drag_node_to(0, vec2(100.0, 200.0));
        session.sim.tick();

        session.drag = Some(DragGesture::Node(0));
        session.finish_drag();

        assert!(session.sim.nodes()[0].pin.is_none());
        assert_eq!(session.sim.alpha_target(), 0.0);

        for _ in 0..5 {
            session.sim.tick();
        }
        assert_ne!(session.sim.nodes()[0].pos, vec2(100.0, 200.0));
    }

    #[test]
    fn pan_gesture_does_not_touch_node_positions() {
        let mut session = demo_session();
        let before = session
            .sim
            .nodes()
            .iter()
            .map(|node| node.pos)
            .collect::<Vec<_>>();

        session.drag = Some(DragGesture::Pan);
        session.pan += vec2(40.0, -25.0);
        session.finish_drag();

        for (node, pos) in session.sim.nodes().iter().zip(before) {
            assert_eq!(node.pos, pos);
            assert!(node.pin.is_none());
        }
    }
}
