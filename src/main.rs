use clap::Parser;
use std::process::ExitCode;
use wirekit::{convert, init_logging, Cli, Config};

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    init_logging(config.logging.level, config.logging.format)?;
    tracing::debug!(
        "wirekit {} (built {})",
        wirekit::VERSION,
        wirekit::BUILD_DATE
    );

    let summary = convert(&cli.input_stl, &cli.output_svg, &config)?;

    println!("Wire diameter: {:.4} units", summary.wire_diameter);
    println!(
        "Number of Bezier curves in the spline: {}",
        summary.number_of_curves
    );
    println!("SVG file created: {}", summary.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
