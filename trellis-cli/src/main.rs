//! Trellis CLI
//!
//! Parse a markup document and print it back, dump its tree, or list the
//! nodes a CSS selector finds.

mod json;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use trellis_css::parse_selector;
use trellis_dom::{DomTree, NodeId};
use trellis_html::{HTMLParser, print_tree};

/// Trellis: parse markup and query it with CSS selectors
#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Parse a file and print it back
    trellis ./index.html

    # Print the node tree
    trellis --tree ./index.html

    # List every link inside a nav list
    trellis --select 'ul.nav > li a[href]' ./index.html

    # Parse inline markup and dump matches as JSON
    trellis --html '<p class="x">hi</p>' --select '.x' --json
"#)]
struct Cli {
    /// Path to the HTML file to parse
    #[arg(value_name = "FILE", conflicts_with = "html")]
    path: Option<PathBuf>,

    /// Parse this HTML string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Print the nodes matching this selector
    #[arg(short, long, value_name = "SELECTOR")]
    select: Option<String>,

    /// Print the indented node tree instead of markup
    #[arg(short, long)]
    tree: bool,

    /// Print JSON instead of markup
    #[arg(long, conflicts_with = "tree")]
    json: bool,

    /// Print the selector's specificity
    #[arg(long, requires = "select")]
    specificity: bool,

    /// Treat recoverable markup problems as errors
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (source, input) = load_input(&cli)?;

    let mut parser = HTMLParser::new(&input);
    if cli.strict {
        parser = parser.with_strict_mode();
    }
    let (tree, result) = parser.run();
    result.with_context(|| format!("failed to parse {source}"))?;

    match cli.select {
        Some(ref selector) => print_matches(&cli, &tree, selector),
        None => print_node(&cli, &tree, NodeId::ROOT),
    }
}

/// Read the document from `--html` or the file argument
fn load_input(cli: &Cli) -> Result<(String, String)> {
    if let Some(ref html) = cli.html {
        Ok(("--html input".to_string(), html.clone()))
    } else if let Some(ref path) = cli.path {
        let input = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok((path.display().to_string(), input))
    } else {
        bail!("expected a file path or --html")
    }
}

fn print_matches(cli: &Cli, tree: &DomTree, selector: &str) -> Result<()> {
    let (chain, _) =
        parse_selector(selector).with_context(|| format!("invalid selector {selector:?}"))?;

    if cli.specificity {
        let specificity = chain.specificity();
        println!(
            "{} ({}, {}, {}) = {}",
            "specificity:".bold(),
            specificity.0,
            specificity.1,
            specificity.2,
            specificity.value()
        );
    }

    let found = chain
        .find(tree, NodeId::ROOT)
        .with_context(|| format!("cannot evaluate selector {selector:?}"))?;

    if cli.json {
        let nodes: Vec<_> = found.iter().filter_map(|&id| json::node(tree, id)).collect();
        println!("{}", serde_json::to_string_pretty(&nodes)?);
        return Ok(());
    }

    for (i, &id) in found.iter().enumerate() {
        if cli.tree {
            println!("{}", format!("#{}", i + 1).cyan());
            print_tree(tree, id, 1);
        } else {
            println!("{} {}", format!("{:>3}", i + 1).cyan(), tree.display(id));
        }
    }
    eprintln!(
        "{}",
        format!("{} match{}", found.len(), if found.len() == 1 { "" } else { "es" }).dimmed()
    );
    Ok(())
}

fn print_node(cli: &Cli, tree: &DomTree, id: NodeId) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&json::node(tree, id))?);
    } else if cli.tree {
        print_tree(tree, id, 0);
    } else {
        println!("{}", tree.display(id));
    }
    Ok(())
}
