use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use docdex_core::load::{index_to_string, load_index};
use docdex_core::lookup::{lookup_exact, lookup_term, titles_containing};
use docdex_core::validate::validate;
use docdex_core::SearchIndex;
use tracing_subscriber::{fmt, EnvFilter};

use std::fs;
use std::path::Path;

#[derive(Parser)]
#[command(name = "inspector")]
#[command(about = "Inspect generated documentation search indexes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the build consistency check and report structural defects
    Validate {
        /// Search index file (wrapped JS or bare JSON)
        #[arg(long)]
        index: String,
        /// Fail on warnings as well as errors
        #[arg(long, default_value_t = false)]
        deny_warnings: bool,
    },
    /// Print document, term, and object counts plus generator metadata
    Stats {
        #[arg(long)]
        index: String,
    },
    /// Look up a term and print matching documents as JSON lines
    Lookup {
        #[arg(long)]
        index: String,
        /// Word to look up
        #[arg(long)]
        term: String,
        /// Probe the term table verbatim instead of folding the word first
        #[arg(long, default_value_t = false)]
        raw: bool,
        /// Also scan section titles for the word
        #[arg(long, default_value_t = false)]
        titles: bool,
    },
    /// List every document with its title and URL
    Titles {
        #[arg(long)]
        index: String,
    },
    /// Re-emit the index, wrapped in the loader call or as bare JSON
    Export {
        #[arg(long)]
        index: String,
        /// Output file path
        #[arg(long)]
        output: String,
        /// Emit the Search.setIndex(...) wrapper
        #[arg(long, default_value_t = false)]
        wrap: bool,
        /// Pretty-print the JSON payload
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            index,
            deny_warnings,
        } => run_validate(&index, deny_warnings),
        Commands::Stats { index } => run_stats(&index),
        Commands::Lookup {
            index,
            term,
            raw,
            titles,
        } => run_lookup(&index, &term, raw, titles),
        Commands::Titles { index } => run_titles(&index),
        Commands::Export {
            index,
            output,
            wrap,
            pretty,
        } => run_export(&index, &output, wrap, pretty),
    }
}

fn run_validate(path: &str, deny_warnings: bool) -> Result<()> {
    let index = load_index(path)?;
    let report = validate(&index);
    for issue in &report.issues {
        println!("{issue}");
    }
    let errors = report.num_errors();
    let warnings = report.num_warnings();
    if !report.is_well_formed() {
        bail!("{path}: {errors} errors, {warnings} warnings");
    }
    if deny_warnings && warnings > 0 {
        bail!("{path}: {warnings} warnings (denied)");
    }
    tracing::info!(path, warnings, "index is well-formed");
    Ok(())
}

fn run_stats(path: &str) -> Result<()> {
    let index = load_index(path)?;
    let num_objects: usize = index.objects.values().map(Vec::len).sum();
    println!("documents:     {}", index.num_docs());
    println!("terms:         {}", index.terms.len());
    println!("title terms:   {}", index.titleterms.len());
    println!("titles:        {}", index.alltitles.len());
    println!("index entries: {}", index.indexentries.len());
    println!("objects:       {num_objects}");
    for (name, version) in &index.envversion {
        println!("envversion:    {name} = {version}");
    }
    Ok(())
}

fn run_lookup(path: &str, term: &str, raw: bool, titles: bool) -> Result<()> {
    let index = load_index(path)?;
    let hits = if raw {
        lookup_exact(&index, term)
    } else {
        lookup_term(&index, term)
    };
    for hit in &hits {
        println!("{}", serde_json::to_string(hit)?);
    }
    if titles {
        for hit in titles_containing(&index, term) {
            println!("{}", serde_json::to_string(&hit)?);
        }
    }
    tracing::info!(term, hits = hits.len(), "lookup complete");
    Ok(())
}

fn run_titles(path: &str) -> Result<()> {
    let index = load_index(path)?;
    for doc in index.docs() {
        println!("{}\t{}\t{}", doc.doc_id, doc.title, doc.url);
    }
    Ok(())
}

fn run_export(path: &str, output: &str, wrap: bool, pretty: bool) -> Result<()> {
    let index: SearchIndex = load_index(path)?;
    let out = index_to_string(&index, wrap, pretty)?;
    if let Some(dir) = Path::new(output).parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    fs::write(output, out)?;
    tracing::info!(output, wrap, pretty, "index exported");
    Ok(())
}
