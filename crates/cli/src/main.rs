fn main() {
    if let Err(e) = beanscope_cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
