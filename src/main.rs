mod app;
mod kb;
mod util;

use clap::Parser;

use app::AppOptions;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:5000/api")]
    base_url: String,

    /// Knowledge base ids to list alongside the latest one.
    #[arg(long = "kb")]
    knowledge_bases: Vec<String>,

    #[arg(long)]
    authorized: bool,

    /// Add a built-in offline demo knowledge base to the catalog.
    #[arg(long)]
    demo: bool,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let app_options = AppOptions {
        base_url: args.base_url,
        knowledge_bases: args.knowledge_bases,
        authorized: args.authorized,
        demo: args.demo,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "kbviz",
        options,
        Box::new(move |cc| Ok(Box::new(app::KbVizApp::new(cc, app_options)))),
    )
}
