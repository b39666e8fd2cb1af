//! Per-chromosome querying of BED regions.
//!
//! The indexed file gets one [`OverlapIndex`] per chromosome, holding
//! references to the parsed regions. Query regions are answered against the
//! index for their chromosome. Chunks of queries run in parallel; each index
//! is only read once built.

use ahash::AHashMap;
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use rayon::prelude::*;

use crate::index::{IntervalSet, OverlapIndex};
use crate::output::{format_contains_line, format_count_line, format_hit_line};
use crate::parser::BedData;
use crate::types::{QueryMode, Region};

/// One overlap index per chromosome, borrowing regions from a [`BedData`].
pub type ChromIndex<'a> = AHashMap<&'a str, OverlapIndex<&'a Region>>;

/// Build an index for every chromosome of `data`.
///
/// Fails if any region has `start > end`.
pub fn build_indexes(data: &BedData) -> Result<ChromIndex<'_>> {
    let chroms: Vec<(&String, &Vec<Region>)> = data.regions_by_chrom.iter().collect();

    let built = chroms
        .par_iter()
        .map(|&(chrom, regions)| {
            let intervals = regions
                .iter()
                .map(|region| {
                    region
                        .as_interval()
                        .with_context(|| format!("Invalid region {}", region.id()))
                })
                .collect::<Result<Vec<_>>>()?;
            let index: OverlapIndex<&Region> = intervals.into_iter().collect();
            Ok::<_, anyhow::Error>((chrom.as_str(), index))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(built.into_iter().collect())
}

/// Answer one query region, returning formatted output lines.
pub fn query_region(
    region: &Region,
    indexes: &ChromIndex<'_>,
    mode: QueryMode,
) -> Result<Vec<String>> {
    region
        .as_interval()
        .with_context(|| format!("Invalid query region {}", region.id()))?;

    let (start, end) = (region.start, region.end);
    let index = indexes.get(region.chrom.as_str());

    let lines = match mode {
        QueryMode::Overlap => index
            .map(|index| {
                index
                    .find(start, end)
                    .map(|hit| format_hit_line(region, hit.data(), None))
                    .collect()
            })
            .unwrap_or_default(),
        QueryMode::Closest => index
            .map(|index| {
                index
                    .closest(start, end)
                    .into_iter()
                    .map(|hit| {
                        format_hit_line(region, hit.data(), Some(hit.distance(start, end)))
                    })
                    .collect()
            })
            .unwrap_or_default(),
        QueryMode::Count => {
            let count = index.map_or(0, |index| index.find(start, end).count());
            vec![format_count_line(region, count)]
        }
        QueryMode::Contains => {
            let found = index.is_some_and(|index| index.contains(start, end));
            vec![format_contains_line(region, found)]
        }
        QueryMode::Merge | QueryMode::Subtract => {
            bail!("Mode {} does not query individual regions", mode)
        }
    };

    Ok(lines)
}

/// Answer a chunk of query regions in parallel, keeping input order.
pub fn query_chunk(
    chunk: &[Region],
    indexes: &ChromIndex<'_>,
    mode: QueryMode,
) -> Result<Vec<String>> {
    let per_region = chunk
        .par_iter()
        .map(|region| query_region(region, indexes, mode))
        .collect::<Result<Vec<_>>>()?;

    Ok(per_region.into_iter().flatten().collect())
}

/// Build the merged coverage of a chromosome's regions.
fn coverage(chrom: &str, regions: &[Region]) -> Result<IntervalSet> {
    IntervalSet::from_ranges(regions.iter().map(|r| (r.start, r.end)))
        .with_context(|| format!("Invalid region on {}", chrom))
}

/// Merge the regions of every chromosome, in first-seen chromosome order.
pub fn merge_by_chrom(data: &BedData) -> Result<IndexMap<&str, IntervalSet>> {
    let chroms: Vec<(&String, &Vec<Region>)> = data.regions_by_chrom.iter().collect();

    let merged = chroms
        .par_iter()
        .map(|&(chrom, regions)| {
            Ok::<_, anyhow::Error>((chrom.as_str(), coverage(chrom, regions)?))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(merged.into_iter().collect())
}

/// Subtract the coverage of `cuts` from the coverage of `data`, per chromosome.
///
/// Chromosomes only present in `cuts` are ignored.
pub fn subtract_by_chrom<'a>(
    data: &'a BedData,
    cuts: &BedData,
) -> Result<IndexMap<&'a str, Vec<(i64, i64)>>> {
    let merged = merge_by_chrom(data)?;
    let mut cut_sets = merge_by_chrom(cuts)?;

    let mut pieces = IndexMap::with_capacity(merged.len());
    for (chrom, set) in merged {
        let remaining = match cut_sets.swap_remove(chrom) {
            Some(cut) => set.split(&cut),
            None => set.ranges().to_vec(),
        };
        pieces.insert(chrom, remaining);
    }

    Ok(pieces)
}
