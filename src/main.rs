//! Command-line entry point for database validation.

use clap::Parser;
use std::process;

use geneset_verify::{discover_gene_types, validate_database, validate_genes, Result};

/// Check a gene set database for formatting and consistency problems.
#[derive(Parser, Debug)]
#[command(name = "gsv", version, about)]
struct Cli {
    /// Database prefix, of the form `<DIRECTORY>/<SPECIES>_`.
    prefix: String,

    /// Gene name types to check, comma-separated. Defaults to every
    /// `<PREFIX><TYPE>.tsv.gz` file found next to the prefix.
    #[arg(short, long, value_delimiter = ',')]
    types: Vec<String>,

    /// Prefix for the gene name files, if different from the database prefix.
    #[arg(short, long)]
    gene_prefix: Option<String>,
}

fn run(cli: &Cli) -> Result<u64> {
    let gene_prefix = cli.gene_prefix.as_deref().unwrap_or(&cli.prefix);
    let types = if cli.types.is_empty() {
        discover_gene_types(gene_prefix)?
    } else {
        cli.types.clone()
    };

    let num_genes = validate_genes(gene_prefix, &types)?;
    validate_database(&cli.prefix, num_genes)?;
    Ok(num_genes)
}

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(num_genes) => {
            println!("{}* is consistent ({} genes)", cli.prefix, num_genes);
        }
        Err(e) => {
            eprintln!("gsv: {}", e);
            process::exit(1);
        }
    }
}
