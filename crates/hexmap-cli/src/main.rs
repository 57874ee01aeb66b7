use futures::executor::block_on;
use hexmap::Viewport;
use hexmap::render::{Visual, VisualError, VisualHost};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Visual(VisualError),
    Json(serde_json::Error),
    UnknownRegion(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Visual(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::UnknownRegion(name) => write!(f, "unknown region: {name}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<VisualError> for CliError {
    fn from(value: VisualError) -> Self {
        Self::Visual(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    ViewModel,
    Frame,
    #[default]
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    viewport_width: f64,
    viewport_height: f64,
    select: Vec<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "hexmap-cli\n\
\n\
USAGE:\n\
  hexmap-cli view-model [--pretty] [--out <path>] [<path>|-]\n\
  hexmap-cli frame [--pretty] [--viewport-width <w>] [--viewport-height <h>] [--select <region>]... [--out <path>] [<path>|-]\n\
  hexmap-cli [render] [--viewport-width <w>] [--viewport-height <h>] [--select <region>]... [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - Input is a visual update payload ({\"dataViews\": [...], \"viewport\": {...}}) or a bare data view.\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - --viewport-width/--viewport-height apply when the input carries no viewport (default 620x420).\n\
  - --select clicks a region (full name or abbreviation) before output, dimming the others.\n\
  - Diagnostics go to stderr; set RUST_LOG (default: warn) to see more.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        viewport_width: 620.0,
        viewport_height: 420.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "view-model" => args.command = Command::ViewModel,
            "frame" => args.command = Command::Frame,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--viewport-width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_width = parse_dimension(w)?;
            }
            "--viewport-height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_height = parse_dimension(h)?;
            }
            "--select" => {
                let Some(region) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.select.push(region.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
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

fn parse_dimension(raw: &str) -> Result<f64, CliError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(CliError::Usage(usage())),
    }
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

fn to_json(value: &impl Serialize, pretty: bool) -> Result<String, CliError> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let mut visual = Visual::new(VisualHost::default());
    visual.update_json(
        &text,
        Viewport::new(args.viewport_width, args.viewport_height),
    )?;

    for name in &args.select {
        let Some((key, _)) = visual.layout().find(name) else {
            return Err(CliError::UnknownRegion(name.clone()));
        };
        let key = key.to_string();
        block_on(visual.click_and_wait(&key));
    }

    let output = match args.command {
        Command::ViewModel => {
            let view_model = visual.view_model().cloned().unwrap_or_default();
            to_json(&view_model, args.pretty)?
        }
        Command::Frame => visual.frame_json(args.pretty)?.unwrap_or_default(),
        Command::Render => visual.render_svg().unwrap_or_default(),
    };
    write_text(&output, args.out.as_deref())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

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

    if let Err(err) = run(args) {
        tracing::debug!(error = ?err, "hexmap-cli failed");
        eprintln!("{err}");
        std::process::exit(1);
    }
}
