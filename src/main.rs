fn main() {
    if let Err(err) = roster_placement::run() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
