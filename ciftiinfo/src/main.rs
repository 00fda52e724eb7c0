//! Dumps information on a CIFTI header, such as what each direction maps to,
//! which structures are present, etc.

#![allow(clippy::needless_return)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::io::{self, Read};
use std::path::PathBuf;

use cifti::prelude::*;
use clap::Parser;
use log::{LevelFilter, info, error};

/// The arguments passed to the dumper.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
  /// Output extra/debug info while parsing.
  #[arg(short, long)]
  verbose: bool,
  /// Print the whole header model as JSON to standard output instead.
  #[arg(short, long)]
  json: bool,
  /// Path to the XML header (set to "-" to read from standard input).
  file: PathBuf
}

/// Indentation for nested info lines.
const INDENT: &str = "  ";

/// Logs what one direction maps to.
fn describe_axis(header: &HeaderModel, direction: Direction) {
  let axis = header.axis(direction);
  info!(
    "{} maps to {} ({} indices).",
    direction,
    axis.mapping_type(),
    axis.length()
  );
  match axis.payload() {
    MapPayload::BrainModels(parts) => {
      for part in parts.iter() {
        match part {
          BrainModelPart::Surface(s) => info!(
            "{}- {}: {} of {} vertices",
            INDENT,
            s.structure.pretty_name(),
            s.nodes.len(),
            s.number_of_nodes
          ),
          BrainModelPart::Volume(v) => {
            info!(
              "{}- Volume: {} voxels in a {:?} grid",
              INDENT,
              v.voxels.len(),
              v.space.dimensions()
            );
            for structure in v.structures() {
              let n = v.voxels.iter().filter(|vx| vx.structure == structure).count();
              info!("{}{}- {}: {} voxels", INDENT, INDENT, structure.pretty_name(), n);
            }
          }
        }
      }
    },
    MapPayload::Series(series) => info!(
      "{}- Starts at {}s, one sample every {}s.",
      INDENT,
      series.start_seconds(),
      series.step_seconds()
    ),
    MapPayload::Scalars(_) | MapPayload::Labels(_) => {
      for i in 0..axis.length() {
        let name = axis.map_name(i).unwrap_or_default();
        match header.label_table(direction, i) {
          Some(t) => info!("{}- #{}: \"{}\" ({} labels)", INDENT, i + 1, name, t.len()),
          None => info!("{}- #{}: \"{}\"", INDENT, i + 1, name),
        }
      }
    },
    MapPayload::Parcels(parcels) => {
      for p in parcels.parcels.iter() {
        let nodes: usize = p.nodes.iter().map(|pn| pn.nodes.len()).sum();
        info!(
          "{}- \"{}\": {} vertices, {} voxels",
          INDENT,
          p.name,
          nodes,
          p.voxels.len()
        );
      }
    }
  }
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
  // read the header
  let text = if args.file.as_os_str().eq_ignore_ascii_case("-") {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    buf
  } else if args.file.is_file() {
    if let Some(bn) = args.file.file_name() {
      if let Some(sbn) = bn.to_str() {
        info!("Parsing {}...", sbn);
      }
    } else {
      info!("Parsing...");
    }
    std::fs::read_to_string(&args.file)?
  } else {
    error!("Provided path either does not exist or is not a file!");
    std::process::exit(1);
  };
  let header = match HeaderModel::from_xml_str(&text) {
    Ok(h) => h,
    Err(e) => {
      error!("{}", e);
      std::process::exit(1);
    }
  };
  info!("Done parsing.");
  if args.json {
    println!("{}", serde_json::to_string_pretty(&header)?);
    return Ok(());
  }
  // print the overview
  info!("CIFTI version {}.", header.version());
  info!(
    "Matrix has {} rows and {} columns.",
    header.number_of_rows(),
    header.number_of_columns()
  );
  if header.metadata().is_empty() {
    info!("No metadata.");
  } else {
    info!("Metadata:");
    for (k, v) in header.metadata().iter() {
      info!("{}- {}: {}", INDENT, k, v);
    }
  }
  for d in Direction::all().iter().rev() {
    describe_axis(&header, *d);
  }
  return Ok(());
}
