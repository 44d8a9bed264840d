use eframe::egui::{self, Align, Context, Layout, RichText};

use super::super::{KbChoice, KbVizApp, SessionState};

impl KbVizApp {
    pub(in crate::app) fn show_panels(&mut self, ctx: &Context) {
        let mut pending_choice: Option<KbChoice> = None;
        let mut retry_label: Option<String> = None;

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("kbviz");
                    ui.separator();
                    match &self.state {
                        SessionState::Empty => {
                            ui.label("no knowledge base selected");
                        }
                        SessionState::Loading { label } => {
                            ui.label(format!("loading {label}"));
                        }
                        SessionState::Ready(session) => {
                            ui.label(session.label.as_str());
                            ui.label(format!("entities: {}", session.graph.node_count()));
                            ui.label(format!("relations: {}", session.graph.edge_count()));
                        }
                        SessionState::Error { label, .. } => {
                            ui.label(format!("failed to load {label}"));
                        }
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.small(self.options.base_url.as_str());
                    });
                });
            });

        egui::SidePanel::left("knowledge_bases")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Knowledge bases");
                ui.add_space(6.0);

                let current = self.current_label().map(str::to_owned);
                for choice in &self.catalog {
                    let is_current = current.as_deref() == Some(choice.label.as_str());
                    if ui.selectable_label(is_current, &choice.label).clicked() {
                        pending_choice = Some(choice.clone());
                    }
                }

                if let SessionState::Ready(session) = &mut self.state {
                    ui.separator();
                    ui.label(RichText::new("Search entities").strong());
                    ui.text_edit_singleline(&mut session.search);

                    ui.separator();
                    ui.label(RichText::new("Selection").strong());
                    match session.selected.clone() {
                        Some(selected) => {
                            ui.heading(&selected);
                            ui.add_space(4.0);
                            for edge in session.graph.relations_of(&selected) {
                                if edge.source == selected {
                                    ui.label(format!("\u{2192} {} ({})", edge.target, edge.label));
                                } else {
                                    ui.label(format!("\u{2190} {} ({})", edge.source, edge.label));
                                }
                            }
                            ui.add_space(4.0);
                            if ui.button("Clear selection").clicked() {
                                session.selected = None;
                            }
                        }
                        None => {
                            ui.label("Click an entity in the graph to inspect it.");
                        }
                    }
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| match &mut self.state {
            SessionState::Empty => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Select a knowledge base to display its graph.");
                });
            }
            SessionState::Loading { label } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading(format!("Loading {label}..."));
                    ui.add_space(8.0);
                    ui.spinner();
                });
            }
            SessionState::Error { label, message } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading(format!("Failed to load {label}"));
                    ui.add_space(8.0);
                    ui.label(message.as_str());
                    ui.add_space(8.0);
                    if ui.button("Retry").clicked() {
                        retry_label = Some(label.clone());
                    }
                });
            }
            SessionState::Ready(session) => session.draw_graph(ui),
        });

        if let Some(choice) = pending_choice {
            self.select(&choice);
        } else if let Some(label) = retry_label {
            self.select_by_label(&label);
        }
    }
}
