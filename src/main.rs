fn main() {
    #[cfg(feature = "cli")]
    storecursor::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("storecursor: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
