use std::process::ExitCode;

use anyhow::Context as _;
use spvforge::cli::{self, CliCommand, CliOptions};
use spvforge::{BuildReport, ForgeSettings, ShaderBuildOrchestrator};

fn main() -> ExitCode {
    let options = match cli::parse_args(std::env::args_os().skip(1)) {
        Ok(CliCommand::Build(options)) => options,
        Ok(CliCommand::Help) => {
            println!("{}", cli::USAGE);
            return ExitCode::SUCCESS;
        }
        Ok(CliCommand::Version) => {
            println!("spvforge {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("spvforge: {err}\n\n{}", cli::USAGE);
            return ExitCode::from(2);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(options.log_filter().as_str()))
        .format_timestamp(None)
        .init();

    match build(&options) {
        Ok(report) => {
            println!("{report}");
            ExitCode::from(u8::try_from(report.exit_code()).unwrap_or(1))
        }
        Err(err) => {
            eprintln!("spvforge: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn build(options: &CliOptions) -> anyhow::Result<BuildReport> {
    let mut settings =
        ForgeSettings::load_or_default(options.config.as_deref()).context("Failed to load settings")?;
    settings.apply_env();
    options.apply(&mut settings);

    let forge = ShaderBuildOrchestrator::from_settings(settings)?;
    let report = forge.run_configured().context("Shader build aborted")?;
    Ok(report)
}
