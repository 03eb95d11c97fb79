fn main() -> anyhow::Result<()> {
    fmsxml::cli::run_cli()
}
