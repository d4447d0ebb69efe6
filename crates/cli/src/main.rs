fn main() {
    if let Err(e) = batchlens_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
