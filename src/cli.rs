//! Command-line parsing for the `spvforge` binary.
//!
//! Flags override whatever the settings file and environment provided; see
//! [`CliOptions::apply`].

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use spvforge_core::{ForgeError, ForgeSettings, Result};

pub const USAGE: &str = "\
Usage: spvforge [OPTIONS] [DIR]...

Compiles every .vert, .frag and .comp file in each DIR into DIR/spv/<name>.spv.
Without DIRs, the directories from the settings file (or scanline/compute,
scanline/surface and common) are used. Relative directories from a settings
file resolve against that file's directory; DIRs and the built-in defaults
without a settings file resolve against the working directory.

Options:
  -c, --compiler <PATH>   Compiler executable or directory holding glslc [env: SHADERC_PATH]
  -t, --timeout <SECS>    Per-shader timeout in seconds [default: 30]
  -j, --jobs <N>          Compiler processes to run at once [default: CPU count]
  -r, --recursive         Also compile shaders in subdirectories
      --config <FILE>     Settings file [default: spvforge.toml if present]
  -X <ARG>                Pass ARG to the compiler (repeatable)
  -q, --quiet             Only log warnings and errors
  -v, --verbose           Log more (repeat for trace output)
  -h, --help              Print help
  -V, --version           Print version

Exit status: 0 when every shader compiled, 1 when any shader failed or a
directory was missing, 2 when the run could not start.";

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
pub enum CliCommand {
    Build(CliOptions),
    Help,
    Version,
}

/// Parsed build options. `None` / empty means "keep the configured value".
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub directories: Vec<PathBuf>,
    pub compiler: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub jobs: Option<usize>,
    pub recursive: bool,
    pub config: Option<PathBuf>,
    pub extra_args: Vec<String>,
    /// Negative for `--quiet`, positive per `--verbose`.
    pub verbosity: i8,
}

impl CliOptions {
    /// Layers these options over `settings`.
    pub fn apply(&self, settings: &mut ForgeSettings) {
        if !self.directories.is_empty() {
            settings.directories.clone_from(&self.directories);
        }
        if let Some(compiler) = &self.compiler {
            settings.compiler = Some(compiler.clone());
        }
        if let Some(timeout_secs) = self.timeout_secs {
            settings.timeout_secs = timeout_secs;
        }
        if let Some(jobs) = self.jobs {
            settings.jobs = jobs;
        }
        if self.recursive {
            settings.recursive = true;
        }
        settings.extra_args.extend(self.extra_args.iter().cloned());
    }

    /// Default log filter for the chosen verbosity; `RUST_LOG` still wins.
    #[must_use]
    pub fn log_filter(&self) -> LevelFilter {
        match self.verbosity {
            i8::MIN..=-1 => LevelFilter::Warn,
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Parses arguments, excluding the program name.
///
/// Directory and path values are kept as raw OS strings, so names that are
/// not valid Unicode pass through untouched.
pub fn parse_args<I, S>(args: I) -> Result<CliCommand>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::<OsString>::into);
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        if arg == "--" {
            options.directories.extend(args.by_ref().map(PathBuf::from));
            break;
        }
        // Anything not spelled as a UTF-8 option is a directory.
        let text = match arg.into_string() {
            Ok(text) if text.starts_with('-') => text,
            Ok(text) => {
                options.directories.push(PathBuf::from(text));
                continue;
            }
            Err(raw) => {
                options.directories.push(PathBuf::from(raw));
                continue;
            }
        };

        // `--flag=value` and `--flag value` are both accepted.
        let (flag, inline) = match text.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(OsString::from(value))),
            _ => (text.clone(), None),
        };
        let mut value = |name: &str| -> Result<OsString> {
            inline
                .clone()
                .or_else(|| args.next())
                .ok_or_else(|| ForgeError::InvalidConfig(format!("{name} requires a value")))
        };

        match flag.as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-V" | "--version" => return Ok(CliCommand::Version),
            "-c" | "--compiler" => options.compiler = Some(PathBuf::from(value(&flag)?)),
            "-t" | "--timeout" => options.timeout_secs = Some(parse_number(&flag, &value(&flag)?)?),
            "-j" | "--jobs" => options.jobs = Some(parse_number(&flag, &value(&flag)?)?),
            "--config" => options.config = Some(PathBuf::from(value(&flag)?)),
            "-X" => options.extra_args.push(utf8(&flag, value(&flag)?)?),
            "-r" | "--recursive" => options.recursive = true,
            "-q" | "--quiet" => options.verbosity = -1,
            "-v" | "--verbose" => options.verbosity = options.verbosity.max(0).saturating_add(1),
            "-vv" => options.verbosity = 2,
            _ => return Err(ForgeError::InvalidConfig(format!("unknown option {flag}"))),
        }
    }

    Ok(CliCommand::Build(options))
}

fn utf8(flag: &str, value: OsString) -> Result<String> {
    value
        .into_string()
        .map_err(|value| ForgeError::InvalidConfig(format!("{flag} expects UTF-8 text, got {value:?}")))
}

fn parse_number<T: FromStr>(flag: &str, value: &OsStr) -> Result<T> {
    value
        .to_str()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| ForgeError::InvalidConfig(format!("{flag} expects a number, got {value:?}")))
}
