use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::PathBuf;

use chipviz::pipeline::{trace_boundary_file, BoundaryTrace};
use chipviz::prelude::*;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Dumps what chipviz reads from the toolchain outputs.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct ExportCli {
    /// Boundary configuration file (.ron).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level on stderr, overrides the configuration.
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a graph file
    Graph {
        file: PathBuf,
        #[arg(short, long, default_value_t = ExportFormat::Json)]
        export_format: ExportFormat,
    },
    /// Extract the midpoints of a hyperplane file
    Midpoints {
        file: PathBuf,
        /// Defaults to the configured dimensionality.
        #[arg(short, long)]
        dimensions: Option<usize>,
        #[arg(short, long, default_value_t = ExportFormat::Json)]
        export_format: ExportFormat,
    },
    /// Parse a classifier output file
    Classes {
        file: PathBuf,
        #[arg(short, long, default_value_t = ExportFormat::Json)]
        export_format: ExportFormat,
    },
    /// Trace the boundary through the midpoints of a hyperplane file
    Boundary {
        file: PathBuf,
        #[arg(
            long,
            num_args = 4,
            value_names = ["XMIN", "XMAX", "YMIN", "YMAX"],
            allow_negative_numbers = true
        )]
        viewport: Option<Vec<f64>>,
        #[arg(short, long, default_value_t = ExportFormat::Json)]
        export_format: ExportFormat,
    },
}

/// Entry point of the `chipviz-export` binary.
pub fn run_cli() -> ChipResult<()> {
    let args = ExportCli::parse();
    let config = match &args.config {
        Some(path) => read_configuration(path)?,
        None => BoundaryConfig::default(),
    };
    let level = match &args.log_level {
        Some(level) => parse_level(level)?,
        None => config.log_level()?,
    };
    basic_logging_setup(level)?;
    match &args.config {
        Some(path) => info!("Using configuration {}", path.display()),
        None => info!("Using the default configuration"),
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(args.command, &config, &mut out)
}

/// Executes one command, writing its export to `out`.
pub fn run(command: Command, config: &BoundaryConfig, out: &mut dyn Write) -> ChipResult<()> {
    match command {
        Command::Graph {
            file,
            export_format,
        } => write_graph(&read_graph(file)?, export_format, out),
        Command::Midpoints {
            file,
            dimensions,
            export_format,
        } => {
            let midpoints = read_midpoints(file, dimensions.unwrap_or(config.dimensions))?;
            write_midpoints(&midpoints, export_format, out)
        }
        Command::Classes {
            file,
            export_format,
        } => write_classes(&read_classification(file)?, export_format, out),
        Command::Boundary {
            file,
            viewport,
            export_format,
        } => {
            let mut config = config.clone();
            if let Some(bounds) = viewport {
                let [xmin, xmax, ymin, ymax] = bounds[..] else {
                    return Err(ChipError::InvalidViewport(format!(
                        "expected 4 bounds, got {}",
                        bounds.len()
                    )));
                };
                config.viewport = Some(Viewport::new(xmin, xmax, ymin, ymax)?);
            }
            write_boundary(&trace_boundary_file(file, &config)?, export_format, out)
        }
    }
}

fn output_error(e: impl Into<std::io::Error>) -> ChipError {
    ChipError::Io {
        path: PathBuf::from("<output>"),
        source: e.into(),
    }
}

fn write_json<T: Serialize>(value: &T, out: &mut dyn Write) -> ChipResult<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(output_error)?;
    writeln!(out).map_err(output_error)
}

fn join<T: Display>(values: impl IntoIterator<Item = T>, separator: &str) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

/// One row per vertex: `id,cluster,coords,adjacent` with `;` separated lists and
/// adjacency entries written `neighbor:flag`.
pub fn write_graph(graph: &Graph, format: ExportFormat, out: &mut dyn Write) -> ChipResult<()> {
    match format {
        ExportFormat::Json => write_json(graph, out),
        ExportFormat::Csv => {
            writeln!(out, "id,cluster,coords,adjacent").map_err(output_error)?;
            for vertex in graph {
                let adjacent = join(
                    vertex
                        .adjacent
                        .iter()
                        .map(|a| format!("{}:{}", a.neighbor, u8::from(a.support))),
                    ";",
                );
                writeln!(
                    out,
                    "{},{},{},{}",
                    vertex.id,
                    vertex.cluster,
                    join(&vertex.coords, ";"),
                    adjacent
                )
                .map_err(output_error)?;
            }
            Ok(())
        }
    }
}

pub fn write_midpoints(
    midpoints: &MidpointSet,
    format: ExportFormat,
    out: &mut dyn Write,
) -> ChipResult<()> {
    match format {
        ExportFormat::Json => write_json(midpoints, out),
        ExportFormat::Csv => {
            let header = join((0..midpoints.dimensions()).map(|d| format!("x{d}")), ",");
            writeln!(out, "{header}").map_err(output_error)?;
            for point in midpoints {
                writeln!(out, "{}", join(point.coords(), ",")).map_err(output_error)?;
            }
            Ok(())
        }
    }
}

pub fn write_classes(
    classes: &ClassificationMap,
    format: ExportFormat,
    out: &mut dyn Write,
) -> ChipResult<()> {
    match format {
        ExportFormat::Json => write_json(classes, out),
        ExportFormat::Csv => {
            writeln!(out, "id,class").map_err(output_error)?;
            for (id, class) in classes.iter() {
                writeln!(out, "{id},{class}").map_err(output_error)?;
            }
            Ok(())
        }
    }
}

/// CSV output is the extended polyline only, JSON the whole trace.
pub fn write_boundary(
    trace: &BoundaryTrace,
    format: ExportFormat,
    out: &mut dyn Write,
) -> ChipResult<()> {
    match format {
        ExportFormat::Json => write_json(trace, out),
        ExportFormat::Csv => {
            writeln!(out, "x,y").map_err(output_error)?;
            for [x, y] in &trace.extended {
                writeln!(out, "{x},{y}").map_err(output_error)?;
            }
            Ok(())
        }
    }
}
