use clap::Parser;

use treemount_cli::Args;

fn main() {
    env_logger::init();
    let args = Args::parse();

    let stdout = std::io::stdout();
    if let Err(e) = treemount_cli::run(&args, &mut stdout.lock()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
