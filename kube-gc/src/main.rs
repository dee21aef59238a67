use clap::Parser;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Determining the local offset is only sound while the process is single threaded, so do it before anything else.
    if let Err(error) = kube_gc::time_ext::local_offset() {
        log::debug!("timestamps are shown in UTC: {error}");
    }

    if let Err(error) = kube_gc::cli::Cli::parse().run() {
        const BOLD_RED: &str = "\x1b[1;31m";
        const BOLD: &str = "\x1b[1m";
        const RESET: &str = "\x1b[0m";
        eprintln!("{BOLD_RED}error{RESET}{BOLD}:{RESET} {error}");
        std::process::exit(1);
    }
}
