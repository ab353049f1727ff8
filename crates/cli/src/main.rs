fn main() -> anyhow::Result<()> {
    clubhub_observability::init();

    let limits = clubhub_validation::ValidationLimits::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    clubhub_cli::run(&args, stdin.lock(), stdout.lock(), limits)
}
