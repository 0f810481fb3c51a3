//! Terminal CLI: renders a directory tree and optionally shares it.

#![allow(clippy::print_stdout)]

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use structure::cli::{parse_ignore_list, project_name_from_root};
use structure::share::ShareClient;
use structure::tree;

/// Generate and share directory structure trees.
#[derive(Debug, Parser)]
#[command(name = "structure", version)]
struct Args {
    /// Directory to map (defaults to the current directory).
    directory: Option<PathBuf>,

    /// Comma-separated list of extra directory names to ignore.
    #[arg(short, long)]
    ignore: Option<String>,

    /// Project name used when sharing (defaults to the directory name).
    #[arg(short, long)]
    project: Option<String>,

    /// Upload the rendered tree and print a shareable link.
    #[arg(short, long)]
    share: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args = Args::parse();
    let root = args.directory.unwrap_or_else(|| PathBuf::from("."));
    let project_name = args.project.unwrap_or_else(|| project_name_from_root(&root));
    let extra_ignore = parse_ignore_list(args.ignore.as_deref());

    // Decoration is only useful on an interactive terminal.
    let use_color = !args.no_color && io::stdout().is_terminal();

    let (decorated, plain) = tree::render(&root, &extra_ignore, use_color);
    let plain_content = plain.join("\n");

    if use_color {
        println!("\n{}", "╭───── Directory Structure ─────╮".green().bold());
        println!("{}", decorated.join("\n"));
        println!("{}\n", "╰───────────────────────────────╯".green().bold());
    } else {
        println!("{plain_content}");
    }

    if args.share {
        publish(&plain_content, &project_name, use_color).await;
    }

    Ok(())
}

/// Publishes the plain rendering and prints the outcome.
///
/// Publish failures are reported without failing the process; the tree has
/// already been rendered.
async fn publish(plain_content: &str, project_name: &str, use_color: bool) {
    if use_color {
        println!("{}", "Generating shareable link...".cyan());
    } else {
        println!("\nGenerating shareable link...");
    }

    let result = match ShareClient::new() {
        Ok(client) => client.publish(plain_content, project_name).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(url) => {
            if use_color {
                println!("{} {}", "Shareable link:".bold(), url.green());
            } else {
                println!("Shareable link: {url}");
            }
        }
        Err(err) => println!("Error sharing structure: {err}"),
    }
}
