use crate::error::{ChainGraphError, Result};

/// Upper bound on how many blocks one spec may expand to.
pub const MAX_BLOCKS: u64 = 100_000;

/// Expand a block spec such as `3529374-3529377,25,55-57` into block numbers.
///
/// Entries are comma-separated single numbers or inclusive `start-end` ranges.
/// Order is preserved exactly as listed; ranges expand low to high. A spec that
/// expands past [`MAX_BLOCKS`] is rejected before anything is allocated.
pub fn parse_block_spec(spec: &str) -> Result<Vec<u64>> {
    let mut numbers = Vec::new();

    for entry in spec.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(ChainGraphError::InvalidBlockSpec(format!(
                "empty entry in {spec:?}"
            )));
        }

        match entry.split_once('-') {
            Some((start, end)) => {
                let start = parse_number(start, entry)?;
                let end = parse_number(end, entry)?;
                if start > end {
                    return Err(ChainGraphError::Range { start, end });
                }
                check_budget(numbers.len() as u64, end - start, spec)?;
                numbers.extend(start..=end);
            }
            None => {
                check_budget(numbers.len() as u64, 0, spec)?;
                numbers.push(parse_number(entry, entry)?);
            }
        }
    }

    Ok(numbers)
}

/// `span` is `end - start`, so a range adds `span + 1` blocks.
fn check_budget(listed: u64, span: u64, spec: &str) -> Result<()> {
    if span >= MAX_BLOCKS || listed + span >= MAX_BLOCKS {
        return Err(ChainGraphError::InvalidBlockSpec(format!(
            "{spec:?} expands to more than {MAX_BLOCKS} blocks"
        )));
    }
    Ok(())
}

fn parse_number(raw: &str, entry: &str) -> Result<u64> {
    raw.trim().parse().map_err(|_| {
        ChainGraphError::InvalidBlockSpec(format!("{raw:?} in {entry:?} is not a block number"))
    })
}
