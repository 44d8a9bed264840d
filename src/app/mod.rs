use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{Context, Pos2, Vec2};

use crate::kb::{DEMO_NAME, KbSelector, KnowledgeGraph, adapt, demo_payload, fetch_knowledge_base};

mod graph;
mod render_utils;
mod sim;
mod ui;

use sim::ForceSimulation;

pub(in crate::app) const NODE_RADIUS: f32 = 10.0;

#[derive(Clone, Debug)]
pub struct AppOptions {
    pub base_url: String,
    pub knowledge_bases: Vec<String>,
    pub authorized: bool,
    pub demo: bool,
}

pub struct KbVizApp {
    options: AppOptions,
    catalog: Vec<KbChoice>,
    session_token: u64,
    state: SessionState,
    pending: Option<PendingFetch>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct KbChoice {
    label: String,
    source: KbSource,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum KbSource {
    Demo,
    Remote(KbSelector),
}

enum SessionState {
    Empty,
    Loading { label: String },
    Ready(Box<GraphSession>),
    Error { label: String, message: String },
}

struct PendingFetch {
    token: u64,
    label: String,
    rx: Receiver<Result<KnowledgeGraph, String>>,
}

/// Everything owned by one displayed knowledge base: the adapted graph, its
/// visual scene, the running simulation, and the view/interaction state.
/// Dropped wholesale on every new selection.
struct GraphSession {
    label: String,
    graph: KnowledgeGraph,
    scene: GraphScene,
    sim: ForceSimulation,
    pan: Vec2,
    zoom: f32,
    drag: Option<DragGesture>,
    search: String,
    selected: Option<String>,
    screen_positions: Vec<Pos2>,
}

/// Visual elements bound one-to-one to graph entries, fixed at construction.
struct GraphScene {
    nodes: Vec<SceneNode>,
    edges: Vec<SceneEdge>,
}

struct SceneNode {
    id: String,
}

struct SceneEdge {
    source: usize,
    target: usize,
    label: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DragGesture {
    Node(usize),
    Pan,
}

impl KbVizApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: AppOptions) -> Self {
        Self::with_options(options)
    }

    fn with_options(options: AppOptions) -> Self {
        let mut catalog = Vec::new();
        if options.demo {
            catalog.push(KbChoice {
                label: DEMO_NAME.to_owned(),
                source: KbSource::Demo,
            });
        }
        for selector in std::iter::once(KbSelector::Latest).chain(
            options
                .knowledge_bases
                .iter()
                .map(|id| KbSelector::Id(id.clone())),
        ) {
            catalog.push(KbChoice {
                label: selector.display_name().to_owned(),
                source: KbSource::Remote(selector),
            });
        }

        Self {
            options,
            catalog,
            session_token: 0,
            state: SessionState::Empty,
            pending: None,
        }
    }

    /// Tear down the current session and start loading `choice`. Always a
    /// full rebuild, including re-selection of the id already shown.
    fn select(&mut self, choice: &KbChoice) {
        self.session_token += 1;
        let token = self.session_token;
        self.pending = None;
        self.state = SessionState::Loading {
            label: choice.label.clone(),
        };
        log::info!("selected knowledge base {:?}", choice.label);

        match &choice.source {
            KbSource::Demo => {
                let result = adapt(demo_payload()).map_err(|error| error.to_string());
                self.apply_fetch_result(token, choice.label.clone(), result);
            }
            KbSource::Remote(selector) => {
                self.pending = Some(Self::spawn_fetch(
                    token,
                    choice.label.clone(),
                    self.options.clone(),
                    selector.clone(),
                ));
            }
        }
    }

    fn select_by_label(&mut self, label: &str) {
        if let Some(choice) = self
            .catalog
            .iter()
            .find(|choice| choice.label == label)
            .cloned()
        {
            self.select(&choice);
        }
    }

    fn spawn_fetch(
        token: u64,
        label: String,
        options: AppOptions,
        selector: KbSelector,
    ) -> PendingFetch {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = fetch_knowledge_base(&options.base_url, &selector, options.authorized)
                .map_err(|error| format!("{error:#}"))
                .and_then(|payload| adapt(payload).map_err(|error| error.to_string()));
            let _ = tx.send(result);
        });

        PendingFetch { token, label, rx }
    }

    fn poll_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending.rx.try_recv() {
            Ok(result) => self.apply_fetch_result(pending.token, pending.label, result),
            Err(TryRecvError::Empty) => self.pending = Some(pending),
            Err(TryRecvError::Disconnected) => self.apply_fetch_result(
                pending.token,
                pending.label,
                Err("background fetch worker disconnected".to_owned()),
            ),
        }
    }

    /// Completion of a fetch started under `token`. Results from superseded
    /// selections are discarded so the newest selection always wins.
    fn apply_fetch_result(
        &mut self,
        token: u64,
        label: String,
        result: Result<KnowledgeGraph, String>,
    ) {
        if token != self.session_token {
            log::debug!("discarding stale fetch result for {label:?}");
            return;
        }

        self.state = match result {
            Ok(graph) => {
                log::info!(
                    "loaded {label:?}: {} entities, {} relations",
                    graph.node_count(),
                    graph.edge_count()
                );
                SessionState::Ready(Box::new(GraphSession::new(label, graph)))
            }
            Err(message) => {
                log::error!("failed to load {label:?}: {message}");
                SessionState::Error { label, message }
            }
        };
    }

    fn current_label(&self) -> Option<&str> {
        match &self.state {
            SessionState::Empty => None,
            SessionState::Loading { label } | SessionState::Error { label, .. } => Some(label),
            SessionState::Ready(session) => Some(&session.label),
        }
    }
}

impl eframe::App for KbVizApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_pending();
        if self.pending.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }

        self.show_panels(ctx);
    }
}
