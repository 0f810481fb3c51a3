//! File-output CLI variant: writes the plain rendering to a text file.

#![allow(clippy::print_stdout)]

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use structure::cli::parse_ignore_list;
use structure::tree;

/// Save a directory structure tree to a file.
#[derive(Debug, Parser)]
#[command(name = "structure-file", version)]
struct Args {
    /// Directory to map (defaults to the current directory).
    directory: Option<PathBuf>,

    /// Output file for the rendered tree.
    #[arg(default_value = "structure.txt")]
    output: PathBuf,

    /// Comma-separated list of extra directory names to ignore.
    #[arg(short, long)]
    ignore: Option<String>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let root = args.directory.unwrap_or_else(|| PathBuf::from("."));
    let extra_ignore = parse_ignore_list(args.ignore.as_deref());

    let (_, plain) = tree::render(&root, &extra_ignore, false);
    fs::write(&args.output, plain.join("\n"))?;

    println!("Directory structure has been saved to {}", args.output.display());

    Ok(())
}
