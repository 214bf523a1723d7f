use clap::Parser;
use plotshelf::serve::{self, Options};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "plotshelf")]
#[command(author, version, about = "Browse pre-generated plot files in a local web UI")]
struct Args {
    /// Plot root directory to serve
    #[arg(default_value = "static/plots")]
    path: PathBuf,

    /// Port to listen on
    #[arg(short, long, default_value = "3001")]
    port: u16,

    /// Don't open the browser on startup
    #[arg(long)]
    no_open: bool,

    /// Suppress the startup banner and request log
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    let options = Options {
        open_browser: !args.no_open,
        quiet: args.quiet,
    };

    if let Err(e) = serve::start(args.port, args.path, options) {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
