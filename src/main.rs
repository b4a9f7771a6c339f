mod app;
mod items;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with receipt item statistics; built-in sample data when omitted.
    #[arg(long)]
    items: Option<String>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([900.0, 700.0]),
        ..Default::default()
    };

    eframe::run_native(
        "spend-bubbles",
        options,
        Box::new(move |cc| Ok(Box::new(app::SpendBubblesApp::new(cc, args.items.clone())))),
    )
}
