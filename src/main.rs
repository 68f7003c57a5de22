//! Purpose: `fitzlink` CLI for checking MuPDF linkage from a shell or CI job.
//! Role: Binary crate root; parses args, runs one subcommand, emits JSON on stdout.
//! Invariants: Errors are emitted as JSON on stderr; logs also go to stderr.
//! Invariants: Process exit code is derived from `to_exit_code`.
//! Invariants: `init` mirrors the C symbol and always exits 0.
use std::io::{self, Write};

use clap::{CommandFactory, Parser, Subcommand, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

use fitzlink::abi::fitzlink_shim_init;
use fitzlink::core::error::{Error, ErrorKind, to_exit_code};
use fitzlink::core::native::NativeAllocator;
use fitzlink::core::probe::{self, ProbeOptions};
use fitzlink::core::store::StoreBudget;

#[derive(Parser)]
#[command(
    name = "fitzlink",
    version,
    about = "Check that the MuPDF runtime is linked and usable",
    long_about = r#"Check that the MuPDF runtime is linked and usable.

Logging goes to stderr and is controlled by RUST_LOG (default: warn).

  $ fitzlink probe --repeat 3
  $ fitzlink probe --budget 64MiB --require-native
  $ fitzlink version"#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Create and drop MuPDF contexts, then print a JSON report")]
    Probe {
        #[arg(
            long,
            default_value = "unlimited",
            help = "Store budget: unlimited|default|<bytes>[K|M|G]"
        )]
        budget: String,
        #[arg(long, default_value_t = 1, help = "Number of acquire/release cycles")]
        repeat: u32,
        #[arg(long, help = "Exit non-zero unless a context was created")]
        require_native: bool,
    },
    #[command(about = "Run the link-forcing initializer; prints nothing")]
    Init,
    #[command(about = "Print crate and MuPDF versions as JSON")]
    Version,
    #[command(
        about = "Generate shell completions",
        long_about = r#"Generate shell completion scripts.

  $ fitzlink completion bash > ~/.local/share/bash-completion/completions/fitzlink
  $ fitzlink completion zsh > ~/.zfunc/_fitzlink"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<i32, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(code);
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Try `fitzlink --help`."));
            }
        },
    };

    match cli.command {
        Command::Probe {
            budget,
            repeat,
            require_native,
        } => {
            let options = ProbeOptions {
                budget: budget.parse::<StoreBudget>()?,
                repeat,
                require: require_native,
            };
            let report = probe::run(&NativeAllocator::new(), &options)?;
            let value = serde_json::to_value(&report).map_err(|err| {
                Error::new(ErrorKind::Internal)
                    .with_message("failed to serialize probe report")
                    .with_source(err)
            })?;
            emit_json(&value)?;
        }
        Command::Init => fitzlink_shim_init(),
        Command::Version => {
            emit_json(&json!({
                "fitzlink": env!("CARGO_PKG_VERSION"),
                "mupdf": NativeAllocator::version(),
                "linked": NativeAllocator::is_linked(),
            }))?;
        }
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "fitzlink", &mut io::stdout());
        }
    }
    Ok(0)
}

fn emit_json(value: &Value) -> Result<(), Error> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)
        .map_err(io::Error::from)
        .and_then(|()| writeln!(stdout))
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to write stdout")
                .with_source(err)
        })
}

fn emit_error(err: &Error) {
    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Unavailable => "MuPDF is not available".to_string(),
        ErrorKind::Alloc => "context allocation failed".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
