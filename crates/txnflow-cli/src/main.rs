use serde::Serialize;
use std::io::{Read, Write};
use txnflow_graph::{LayoutOptions, PlaceholderMode, layout_lanes, layout_transactions};
use txnflow_model::{
    AppAddressResolver, ApplicationId, ChainAppAddress, Transaction, parse_transactions_json,
};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Model(txnflow_model::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Model(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<txnflow_model::Error> for CliError {
    fn from(value: txnflow_model::Error) -> Self {
        Self::Model(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Lanes,
    AppAddress(ApplicationId),
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    verbose: bool,
    placeholder: PlaceholderMode,
}

fn usage() -> &'static str {
    "txnflow-cli\n\
\n\
USAGE:\n\
  txnflow-cli [layout] [--pretty] [--placeholder when-needed|always|never] [--verbose] [<path>|-]\n\
  txnflow-cli lanes [--pretty] [--verbose] [<path>|-]\n\
  txnflow-cli app-address <application-id>\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a JSON array of transactions; inner transactions nest under AppCall.\n\
  - layout prints {lanes, rows}; rows embed their transaction;\n\
    app calls list innerTransactionCount instead of their children.\n\
  - lanes prints the lane list only, without the trailing placeholder.\n\
  - Diagnostics go to stderr; set TXNFLOW_LOG (e.g. debug) or pass --verbose.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "lanes" => args.command = Command::Lanes,
            "app-address" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let id = id
                    .parse::<ApplicationId>()
                    .map_err(|_| CliError::Usage(usage()))?;
                args.command = Command::AppAddress(id);
            }
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--placeholder" => {
                let Some(mode) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.placeholder = match mode.as_str() {
                    "when-needed" => PlaceholderMode::WhenNeeded,
                    "always" => PlaceholderMode::Always,
                    "never" => PlaceholderMode::Never,
                    _ => return Err(CliError::Usage(usage())),
                };
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("TXNFLOW_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn load_transactions(input: Option<&str>) -> Result<Vec<Transaction>, CliError> {
    let text = read_input(input)?;
    let transactions = parse_transactions_json(&text)?;
    tracing::debug!(
        input = input.unwrap_or("-"),
        transactions = transactions.len(),
        "parsed transactions"
    );
    Ok(transactions)
}

fn run(args: Args) -> Result<(), CliError> {
    let options = LayoutOptions::default().with_placeholder(args.placeholder);
    match args.command {
        Command::AppAddress(id) => {
            println!("{}", ChainAppAddress.app_address(id));
            Ok(())
        }
        Command::Lanes => {
            let transactions = load_transactions(args.input.as_deref())?;
            write_json(&layout_lanes(&transactions, &options), args.pretty)
        }
        Command::Layout => {
            let transactions = load_transactions(args.input.as_deref())?;
            write_json(&layout_transactions(&transactions, &options), args.pretty)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_logging(args.verbose);

    if let Err(err) = run(args) {
        tracing::debug!(error = ?err, "command failed");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("txnflow-cli")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn defaults_to_layout_from_stdin() {
        let args = parse_args(&argv(&[])).unwrap();
        assert!(matches!(args.command, Command::Layout));
        assert_eq!(args.input, None);
        assert_eq!(args.placeholder, PlaceholderMode::WhenNeeded);
    }

    #[test]
    fn parses_flags_and_path() {
        let args = parse_args(&argv(&[
            "lanes",
            "--pretty",
            "--placeholder",
            "never",
            "txns.json",
        ]))
        .unwrap();
        assert!(matches!(args.command, Command::Lanes));
        assert!(args.pretty);
        assert_eq!(args.placeholder, PlaceholderMode::Never);
        assert_eq!(args.input.as_deref(), Some("txns.json"));
    }

    #[test]
    fn app_address_takes_a_numeric_id() {
        let args = parse_args(&argv(&["app-address", "42"])).unwrap();
        assert!(matches!(args.command, Command::AppAddress(42)));
        assert!(matches!(
            parse_args(&argv(&["app-address", "x"])),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn rejects_unknown_flags_and_second_path() {
        assert!(matches!(
            parse_args(&argv(&["--bogus"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["a.json", "b.json"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["--placeholder", "sometimes"])),
            Err(CliError::Usage(_))
        ));
    }
}
