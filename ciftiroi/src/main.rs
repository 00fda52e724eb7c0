//! This utility makes a region-of-interest file out of a label file: every
//! location carrying the chosen label becomes 1, everything else 0.
//!
//! The matrix is read from and written to plain CSV, one matrix row per line,
//! next to the XML headers.

#![allow(clippy::needless_return)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use cifti::prelude::*;
use clap::{Args, Parser};
use log::{LevelFilter, info, error};

/// The label to look for; exactly one of these must be given.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct Selection {
  /// The label name, looked up in each map's table.
  #[arg(short, long)]
  name: Option<String>,
  /// The label key, used as-is in every map.
  #[arg(short, long, allow_negative_numbers = true)]
  key: Option<i32>
}

/// The arguments passed to the tool.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
  /// Output extra/debug info while working.
  #[arg(short, long)]
  verbose: bool,
  /// The label to look for.
  #[command(flatten)]
  selection: Selection,
  /// Only use this map, given by 1-based number or by name. If absent, every
  /// map gets its own output column.
  #[arg(short, long)]
  map: Option<String>,
  /// The delimiter used in the CSV files.
  #[arg(short = 'd', long = "delim", default_value = ",")]
  delim: char,
  /// Path to the input XML header.
  in_header: PathBuf,
  /// Path to the input CSV matrix.
  in_matrix: PathBuf,
  /// Path to write the output XML header to.
  out_header: PathBuf,
  /// Path to write the output CSV matrix to.
  out_matrix: PathBuf
}

/// Logs an error and leaves.
fn die<E: std::fmt::Display>(e: E) -> ! {
  error!("{}", e);
  std::process::exit(1);
}

/// Reads a CSV matrix, one row per record.
fn read_matrix(path: &Path, delim: u8) -> io::Result<InMemoryMatrix> {
  let mut rdr = csv::ReaderBuilder::new()
    .delimiter(delim)
    .has_headers(false)
    .from_path(path)?;
  let mut rows: Vec<Vec<f32>> = Vec::new();
  for (i, record) in rdr.records().enumerate() {
    let row = record?.iter()
      .map(|field| field.trim().parse::<f32>())
      .collect::<Result<Vec<f32>, _>>()
      .unwrap_or_else(|e| die(format!("bad value in row {}: {}", i + 1, e)));
    rows.push(row);
  }
  return Ok(InMemoryMatrix::from_rows(&rows).unwrap_or_else(|e| die(e)));
}

/// Writes a matrix as CSV, one row per record.
fn write_matrix(path: &Path, delim: u8, matrix: &InMemoryMatrix) -> io::Result<()> {
  let mut wtr = csv::WriterBuilder::new()
    .delimiter(delim)
    .from_writer(BufWriter::new(File::create(path)?));
  for row in matrix.rows() {
    wtr.write_record(row.iter().map(|v| v.to_string()))?;
  }
  wtr.flush()?;
  return Ok(());
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
  let delim_byte: u8 = args.delim.try_into()
    .unwrap_or_else(|_| die("Delimiter must be a single-byte character!"));
  let selector: LabelSelector = match (args.selection.name, args.selection.key) {
    (Some(name), _) => name.into(),
    (None, Some(key)) => key.into(),
    (None, None) => die("Either a label name or a key must be given!"),
  };
  // load the input
  if !args.in_header.is_file() || !args.in_matrix.is_file() {
    error!("Input paths either do not exist or are not files!");
    std::process::exit(1);
  }
  info!("Loading {}...", args.in_header.display());
  let header = HeaderModel::from_xml_str(&std::fs::read_to_string(&args.in_header)?)
    .unwrap_or_else(|e| die(e));
  info!("Loading {}...", args.in_matrix.display());
  let input = read_matrix(&args.in_matrix, delim_byte)?;
  // run
  let which_map = args.map.as_deref()
    .map(|m| resolve_map(&header, m).unwrap_or_else(|e| die(e)));
  let (out_header, output) = roi_from_label(&header, &input, &selector, which_map)
    .unwrap_or_else(|e| die(e));
  // write the output
  let xml = out_header.to_xml_string().unwrap_or_else(|e| die(e));
  std::fs::write(&args.out_header, xml)?;
  write_matrix(&args.out_matrix, delim_byte, &output)?;
  info!(
    "Wrote {} and {}.",
    args.out_header.display(),
    args.out_matrix.display()
  );
  return Ok(());
}
