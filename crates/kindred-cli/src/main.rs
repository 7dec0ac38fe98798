use kindred::render::raster::{RasterError, RasterOptions};
use kindred::render::{
    FileThumbnailLoader, HeadlessError, NodeId, SvgRenderOptions, sanitize_svg_id,
};
use kindred::{Chart, ChartOptions, FamilyTree, LayoutDirection, OptionLayers};
use serde_json::Value;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

const LOG_ENV: &str = "KINDRED_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Input(kindred::Error),
    Chart(HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Input(err) => write!(f, "{err}"),
            CliError::Chart(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<kindred::Error> for CliError {
    fn from(value: kindred::Error) -> Self {
        Self::Input(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Chart(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
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
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    /// Chart options given on the command line, merged over the config file.
    flags: OptionLayers,
    collapse: Vec<NodeId>,
    log: Option<String>,
    pretty: bool,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    diagram_id: Option<String>,
    thumbnails: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "kindred-cli\n\
\n\
USAGE:\n\
  kindred-cli [layout] [--pretty] [OPTIONS] [<path>|-]\n\
  kindred-cli render [--format svg|png|jpg] [--scale <n>] [--background <css-color>] [--id <chart-id>] [--thumbnails <dir>] [--out <path>] [OPTIONS] [<path>|-]\n\
\n\
OPTIONS:\n\
  --config <file>            JSON file with chart options (camelCase keys)\n\
  --layout <code>            top-bottom | bottom-top | left-right | right-left\n\
  --generations <n>          generations to show (2-25)\n\
  --hide-spouses             replace spouses by empty slots\n\
  --show-alternative-name    add the alternative name line\n\
  --show-married-names       ask the host for married names (passed through)\n\
  --open-new-tab             open individual links in a new tab\n\
  --individual-url <tpl>     link template, {xref} is replaced by the individual's xref\n\
  --rtl                      right-to-left document\n\
  --collapse <node-id>       start with this node collapsed (repeatable)\n\
  --log <filter>             tracing filter, e.g. debug or kindred_render=trace (env: KINDRED_LOG)\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the family tree JSON is read from stdin.\n\
  - layout prints the chart layout as JSON.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG/JPG output defaults to writing next to the input file (or ./out.png / ./out.jpg for stdin).\n\
  - Thumbnails are resolved relative to --thumbnails, else the input file's directory.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--config" => args.config = Some(value(&mut it)?),
            "--layout" => {
                let layout = LayoutDirection::from_str(&value(&mut it)?)?;
                args.flags.set_value("layout", Value::from(layout.as_str()));
            }
            "--generations" => {
                let n = value(&mut it)?
                    .parse::<u32>()
                    .map_err(|_| CliError::Usage(usage()))?;
                args.flags.set_value("generations", Value::from(n));
            }
            "--hide-spouses" => args.flags.set_value("hideSpouses", Value::Bool(true)),
            "--show-alternative-name" => {
                args.flags.set_value("showAlternativeName", Value::Bool(true))
            }
            "--show-married-names" => args.flags.set_value("showMarriedNames", Value::Bool(true)),
            "--open-new-tab" => args.flags.set_value("openNewTabOnClick", Value::Bool(true)),
            "--individual-url" => {
                args.flags
                    .set_value("individualUrl", Value::String(value(&mut it)?));
            }
            "--rtl" => args.flags.set_value("rtl", Value::Bool(true)),
            "--collapse" => {
                let id = value(&mut it)?
                    .parse::<NodeId>()
                    .map_err(|_| CliError::Usage(usage()))?;
                args.collapse.push(id);
            }
            "--log" => args.log = Some(value(&mut it)?),
            "--format" => {
                args.render_format = value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = value(&mut it)?
                    .parse::<f32>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--id" => args.diagram_id = Some(sanitize_svg_id(&value(&mut it)?)),
            "--thumbnails" => args.thumbnails = Some(value(&mut it)?),
            "--out" => args.out = Some(value(&mut it)?),
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
            "-" if args.input.is_none() => args.input = Some("-".to_string()),
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

fn value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<String, CliError> {
    it.next().cloned().ok_or(CliError::Usage(usage()))
}

fn init_tracing(filter: Option<&str>) {
    use tracing_subscriber::EnvFilter;

    let filter = match filter {
        Some(f) => EnvFilter::try_new(f).ok(),
        None => EnvFilter::try_from_env(LOG_ENV).ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
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

fn chart_options(args: &Args) -> Result<ChartOptions, CliError> {
    let file = match &args.config {
        Some(path) => serde_json::from_str::<Value>(&std::fs::read_to_string(path)?)?,
        None => Value::Object(Default::default()),
    };
    Ok(ChartOptions::from_layers([&file, args.flags.as_value()])?)
}

fn thumbnail_dir(args: &Args) -> PathBuf {
    if let Some(dir) = &args.thumbnails {
        return PathBuf::from(dir);
    }
    match args.input.as_deref() {
        Some(path) if path != "-" => Path::new(path)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
        _ => PathBuf::from("."),
    }
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn write_bytes(
    bytes: &[u8],
    out: Option<&str>,
    input: Option<&str>,
    ext: &str,
) -> Result<(), CliError> {
    match out {
        Some("-") => std::io::stdout().lock().write_all(bytes)?,
        Some(path) => std::fs::write(path, bytes)?,
        None => std::fs::write(default_raster_out_path(input, ext), bytes)?,
    }
    Ok(())
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension(ext),
        _ => PathBuf::from(format!("out.{ext}")),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let options = chart_options(&args)?;
    let tree = FamilyTree::from_json(&read_input(args.input.as_deref())?)?;
    tracing::info!(
        nodes = tree.node_count(),
        layout = %options.layout,
        generations = options.generations,
        "loaded family tree"
    );

    let svg_options = SvgRenderOptions {
        diagram_id: args.diagram_id.clone(),
        ..Default::default()
    };
    let loader = FileThumbnailLoader::new(thumbnail_dir(&args));
    let mut chart = Chart::new(tree, options)?
        .with_svg_options(svg_options)
        .with_thumbnail_loader(Arc::new(loader));
    for &id in &args.collapse {
        chart.collapse(id);
    }

    match args.command {
        Command::Layout => {
            let layout = chart.layout()?;
            let json = layout.to_json(args.pretty).map_err(HeadlessError::from)?;
            write_text(&json, args.out.as_deref())?;
        }
        Command::Render => {
            let raster = RasterOptions {
                scale: args.render_scale,
                background: args.background.clone(),
                ..Default::default()
            };
            match args.render_format {
                RenderFormat::Svg => write_text(&chart.draw_svg()?, args.out.as_deref())?,
                RenderFormat::Png => write_bytes(
                    &chart.draw_png(&raster)?,
                    args.out.as_deref(),
                    args.input.as_deref(),
                    "png",
                )?,
                RenderFormat::Jpeg => write_bytes(
                    &chart.draw_jpeg(&raster)?,
                    args.out.as_deref(),
                    args.input.as_deref(),
                    "jpg",
                )?,
            }
        }
    }
    Ok(())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    init_tracing(args.log.as_deref());

    if let Err(err) = run(args) {
        tracing::error!(error = %err, "kindred-cli failed");
        eprintln!("{err}");
        std::process::exit(1);
    }
}
