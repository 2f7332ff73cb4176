use clap::Parser;
use rinexmod::cli::args::Args;
use rinexmod::cli::run;

fn main() {
    let args = Args::parse();

    match run::execute(args) {
        Ok(summary) => {
            if summary.files_skipped > 0 {
                std::process::exit(2);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
