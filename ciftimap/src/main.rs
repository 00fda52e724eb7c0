//! A command-line application to export the correspondence between matrix
//! indices and surface vertices or voxels of a CIFTI header as CSV.

#![allow(clippy::needless_return)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use cifti::prelude::*;
use clap::{Parser, ValueEnum};
use log::*;

/// Which indices of the matrix to export.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Indices {
  /// Row indices.
  Row,
  /// Column indices.
  Column
}

impl From<Indices> for Direction {
  fn from(value: Indices) -> Self {
    return match value {
      Indices::Row => Direction::AlongColumn,
      Indices::Column => Direction::AlongRow,
    };
  }
}

/// The arguments passed to the exporter.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about)]
struct Cli {
  /// Surfaces to export. Can be specified more than once, or comma-separated.
  /// If absent and --volume isn't given, every surface and the volume are
  /// written.
  #[arg(short = 's', long = "structures", num_args = 0.., value_delimiter = ',')]
  structures: Vec<Structure>,
  /// Export the voxels.
  #[arg(long = "volume")]
  volume: bool,
  /// Which matrix indices to export.
  #[arg(long = "direction", value_enum, default_value_t = Indices::Row)]
  direction: Indices,
  /// The delimiter used in the CSV.
  #[arg(short = 'd', long = "delim", default_value = ",")]
  delim: char,
  /// Output extra/debug info while parsing and exporting.
  #[arg(short = 'v', long = "verbose")]
  verbose: bool,
  /// Path to write output to. If absent, writes to standard output.
  #[arg(short = 'o')]
  output: Option<PathBuf>,
  /// The name of the input XML header.
  input: PathBuf,
}

fn main() -> io::Result<()> {
  // init cli stuff
  let args = Cli::parse();
  let log_level = if args.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  };
  env_logger::builder().filter_level(log_level).init();
  // parse the header
  if !args.input.is_file() {
    error!("Provided path either does not exist or is not a file!");
    std::process::exit(1);
  }
  let header = match HeaderModel::from_xml_str(&std::fs::read_to_string(&args.input)?) {
    Ok(h) => h,
    Err(e) => {
      error!("{}", e);
      std::process::exit(1);
    }
  };
  info!("Done parsing.");
  let direction: Direction = args.direction.into();
  let translator = IndexTranslator::new(&header);
  // pick what to write
  let everything = args.structures.is_empty() && !args.volume;
  let surfaces: Vec<Structure> = if everything {
    Structure::all().iter()
      .copied()
      .filter(|s| translator.has_surface_data(*s, direction))
      .collect()
  } else {
    args.structures.clone()
  };
  let volume = everything || args.volume;
  // init the csv writer
  let output: BufWriter<Box<dyn Write>> = BufWriter::new(
    if let Some(ref op) = args.output {
      Box::new(File::create(op)?)
    } else {
      Box::new(io::stdout())
    }
  );
  let delim_byte: u8 = match args.delim.try_into() {
    Ok(b) => b,
    Err(_) => {
      error!("Delimiter must be a single-byte character!");
      std::process::exit(1);
    }
  };
  let mut wtr = csv::WriterBuilder::new()
    .delimiter(delim_byte)
    .flexible(true)
    .from_writer(output);
  // write surfaces
  for structure in surfaces {
    let mapping = translator.surface_mapping(structure, direction);
    if mapping.is_empty() {
      warn!("{} has no vertices along {}.", structure.pretty_name(), direction);
      continue;
    }
    debug!("Writing {} vertices of {}...", mapping.len(), structure.pretty_name());
    for entry in mapping {
      wtr.write_record([
        entry.index.to_string(),
        structure.name().to_string(),
        entry.node.to_string()
      ])?;
    }
  }
  // write voxels
  if volume {
    let mapping = translator.volume_mapping(direction);
    if mapping.is_empty() && !everything {
      warn!("There are no voxels along {}.", direction);
    }
    debug!("Writing {} voxels...", mapping.len());
    for entry in mapping {
      let [i, j, k] = entry.ijk;
      wtr.write_record([
        entry.index.to_string(),
        entry.structure.name().to_string(),
        i.to_string(),
        j.to_string(),
        k.to_string()
      ])?;
    }
  }
  wtr.flush()?;
  info!("All done.");
  return Ok(());
}
