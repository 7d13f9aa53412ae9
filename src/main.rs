fn main() {
    if let Err(err) = reactmap::run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
