fn main() {
    if let Err(e) = insightpulse::cli::run() {
        eprintln!("{:#}", e); // pretty anyhow chain
        std::process::exit(1);
    }
}
