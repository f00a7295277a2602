//! Whole-database validation for a single species.
//!
//! This ties the per-file checks together and enforces the cross-file
//! contracts: collection set counts sum to the number of sets, the token
//! files reproduce the tokenization of set names and descriptions, and the
//! set-to-gene and gene-to-set mappings are exact transposes.

use crate::details::{check_collection_details, check_set_details};
use crate::error::{Result, ValidateError};
use crate::indices::{check_indices_raw_only, check_indices_with_gzip};
use crate::ranges::{load_named_ranges, load_ranges, load_ranges_with_sizes};
use crate::tokens::{check_tokens, tokenize, TokenMap};

fn check_token_file(prefix: &str, kind: &str, total_sets: u64, computed: &TokenMap) -> Result<()> {
    let rel_path = format!("tokens-{}.tsv", kind);
    let rel_ranges = format!("{}.ranges.gz", rel_path);
    let (tokens, bytes) = load_named_ranges(&format!("{}{}", prefix, rel_ranges))?;
    check_tokens(&tokens, &rel_ranges)?;

    if tokens.len() != computed.len() {
        return Err(ValidateError::Invalid(format!(
            "different number of tokens from {} between '{}' and 'sets.tsv'",
            kind, rel_ranges
        )));
    }

    check_indices_raw_only(
        &format!("{}{}", prefix, rel_path),
        total_sets,
        &bytes,
        |line, indices| {
            let tok = String::from_utf8_lossy(&tokens[line as usize]);
            match computed.get(tok.as_ref()) {
                None => Err(ValidateError::Invalid(format!(
                    "token '{}' in '{}' is not present in {} in 'sets.tsv'",
                    tok, rel_ranges, kind
                ))),
                Some(expected) if expected[..] != *indices => Err(ValidateError::Invalid(format!(
                    "sets for token '{}' in '{}' are inconsistent with {} in 'sets.tsv'",
                    tok, rel_path, kind
                ))),
                Some(_) => Ok(()),
            }
        },
    )
}

/// Validate all database files for one species, except the gene name files
/// which are covered by [`validate_genes`](crate::genes::validate_genes).
///
/// `prefix` should be of the form `<DIRECTORY>/<SPECIES>_` where the species
/// is an NCBI taxonomy ID; `num_genes` is the gene count that the name files
/// agreed on. Any formatting problem or inconsistency between files is
/// reported as an error.
pub fn validate_database(prefix: &str, num_genes: u64) -> Result<()> {
    let mut total_sets: u64 = 0;
    {
        let (coll_bytes, coll_numbers) =
            load_ranges_with_sizes(&format!("{}collections.tsv.ranges.gz", prefix))?;
        check_collection_details(
            &format!("{}collections.tsv", prefix),
            &coll_bytes,
            &coll_numbers,
        )?;
        for &x in &coll_numbers {
            if u64::MAX - total_sets < x {
                return Err(ValidateError::Invalid(
                    "64-bit unsigned integer overflow for the sum of the number of sets in 'collections.tsv.ranges.gz'"
                        .to_string(),
                ));
            }
            total_sets += x;
        }
    }

    let set_sizes;
    {
        let (set_bytes, sizes) = load_ranges_with_sizes(&format!("{}sets.tsv.ranges.gz", prefix))?;
        if set_bytes.len() as u64 != total_sets {
            return Err(ValidateError::Invalid(
                "total number of sets in 'sets.tsv' does not match with the reported number from 'collections.tsv.ranges.gz'"
                    .to_string(),
            ));
        }
        set_sizes = sizes;

        let mut token_names = TokenMap::default();
        let mut token_descriptions = TokenMap::default();
        check_set_details(
            &format!("{}sets.tsv", prefix),
            &set_bytes,
            &set_sizes,
            |line, name, description| {
                tokenize(line, name, &mut token_names);
                tokenize(line, description, &mut token_descriptions);
                Ok(())
            },
        )?;

        check_token_file(prefix, "names", total_sets, &token_names)?;
        check_token_file(prefix, "descriptions", total_sets, &token_descriptions)?;
    }

    // Collect the set membership of every gene so the reverse mapping can be
    // compared against it afterwards.
    let mut reverse_map: Vec<Vec<u64>> = vec![Vec::new(); num_genes as usize];
    {
        let s2g_bytes = load_ranges(&format!("{}set2gene.tsv.ranges.gz", prefix))?;
        if s2g_bytes.len() as u64 != total_sets {
            return Err(ValidateError::Invalid(
                "number of lines in 'set2gene.tsv.ranges.gz' does not match the total number of sets"
                    .to_string(),
            ));
        }

        check_indices_with_gzip(
            &format!("{}set2gene.tsv", prefix),
            num_genes,
            &s2g_bytes,
            |line, indices| {
                if indices.len() as u64 != set_sizes[line as usize] {
                    return Err(ValidateError::Invalid(format!(
                        "size of set {} from 'sets.tsv.ranges.gz' does not match with that in 'set2gene.tsv'",
                        line
                    )));
                }
                for &i in indices {
                    reverse_map[i as usize].push(line);
                }
                Ok(())
            },
        )?;
    }

    {
        let g2s_bytes = load_ranges(&format!("{}gene2set.tsv.ranges.gz", prefix))?;
        if g2s_bytes.len() as u64 != num_genes {
            return Err(ValidateError::Invalid(
                "number of lines in 'gene2set.tsv.ranges.gz' does not match the total number of genes"
                    .to_string(),
            ));
        }

        check_indices_with_gzip(
            &format!("{}gene2set.tsv", prefix),
            total_sets,
            &g2s_bytes,
            |line, indices| {
                if reverse_map[line as usize][..] != *indices {
                    return Err(ValidateError::Invalid(format!(
                        "sets for gene {} in 'gene2set.tsv' are inconsistent with 'set2gene.tsv'",
                        line
                    )));
                }
                Ok(())
            },
        )?;
    }

    Ok(())
}
