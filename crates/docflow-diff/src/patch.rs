//! Edit script replay.

use docflow_core::error::AppError;
use docflow_core::result::AppResult;
use docflow_entity::Difference;

/// Rebuilds the new revision from `old`, taking each hunk's replacement
/// lines from `new` and copying every untouched line of `old` as-is.
///
/// Fails if the hunks are out of order, overlap, point outside either
/// sequence, or leave untouched runs of different lengths on the two sides.
pub fn apply<S: Clone>(old: &[S], new: &[S], differences: &[Difference]) -> AppResult<Vec<S>> {
    let mut output = Vec::with_capacity(new.len());
    let (mut old_pos, mut new_pos) = (0usize, 0usize);

    for (index, difference) in differences.iter().enumerate() {
        difference.validate()?;
        let previous = difference.previous_range();
        let replacement = difference.new_range();

        if previous.start < old_pos || replacement.start < new_pos {
            return Err(AppError::validation(format!(
                "Difference #{index} overlaps or precedes the previous one"
            )));
        }
        if previous.end > old.len() || replacement.end > new.len() {
            return Err(AppError::validation(format!(
                "Difference #{index} points outside the line sequences"
            )));
        }
        if previous.start - old_pos != replacement.start - new_pos {
            return Err(AppError::validation(format!(
                "Difference #{index} leaves unequal unchanged runs before it"
            )));
        }

        output.extend_from_slice(&old[old_pos..previous.start]);
        output.extend_from_slice(&new[replacement.clone()]);
        old_pos = previous.end;
        new_pos = replacement.end;
    }

    if old.len() - old_pos != new.len() - new_pos {
        return Err(AppError::validation(
            "Unchanged tail has different lengths on the two sides",
        ));
    }
    output.extend_from_slice(&old[old_pos..]);
    Ok(output)
}
