//! Token-agreement scoring

use thiserror::Error;

/// Errors that can occur while scoring a prediction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("ground-truth sequence is empty; agreement ratio is undefined")]
    EmptyGroundTruth,
}

/// Fraction of position-aligned identical ids between prediction and ground
/// truth
///
/// Positions are compared up to the shorter of the two sequences; the count
/// of matches is divided by the ground-truth length. Positions beyond the
/// shorter sequence count neither as matches nor mismatches, so a
/// truncated prediction scores lower than a same-length one with the same
/// matches.
///
/// # Errors
/// [`ScoreError::EmptyGroundTruth`] when the ground truth is empty: the
/// ratio is undefined (division by zero) and the caller should record the
/// example with no ratio rather than abort the batch.
pub fn agreement_ratio(pred: &[u32], gt: &[u32]) -> Result<f64, ScoreError> {
    if gt.is_empty() {
        return Err(ScoreError::EmptyGroundTruth);
    }

    let matches = pred.iter().zip(gt.iter()).filter(|(p, g)| p == g).count();
    Ok(matches as f64 / gt.len() as f64)
}
