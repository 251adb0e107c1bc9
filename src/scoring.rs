//! Row-wise scoring boundary for exported classifier models.
//!
//! A scoring model maps one input row of `input_dim` values to one output row
//! of `output_dim` values. Models are registered by name so that several
//! backends can coexist and be selected at call time. The projector does not
//! depend on this module; it describes where projected rows can be sent.

use std::collections::HashMap;

use crate::error::ScoringError;

/// A model with fixed input and output dimensionality.
pub trait ScoringModel: Send + Sync {
    fn input_dim(&self) -> usize;

    fn output_dim(&self) -> usize;

    /// Score one row. `input.len() == input_dim()` and
    /// `output.len() == output_dim()` are guaranteed by the caller.
    fn score(&self, input: &[f64], output: &mut [f64]);
}

/// Adapts a closure into a [`ScoringModel`].
pub struct FnModel<F> {
    input_dim: usize,
    output_dim: usize,
    func: F,
}

impl<F> FnModel<F>
where
    F: Fn(&[f64], &mut [f64]) + Send + Sync,
{
    pub fn new(input_dim: usize, output_dim: usize, func: F) -> Self {
        Self {
            input_dim,
            output_dim,
            func,
        }
    }
}

impl<F> ScoringModel for FnModel<F>
where
    F: Fn(&[f64], &mut [f64]) + Send + Sync,
{
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn score(&self, input: &[f64], output: &mut [f64]) {
        (self.func)(input, output)
    }
}

/// Dense row-major 2-D array.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, ScoringError> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(ScoringError::InvalidArgument(format!(
                "{} values cannot fill a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from nested rows, which must all have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ScoringError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(ScoringError::InvalidArgument(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i >= self.rows {
            return None;
        }
        Some(&self.data[i * self.cols..(i + 1) * self.cols])
    }

    fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }
}

/// Score every row of `input` with `model`.
///
/// `input_dim` and `output_dim` are the caller's expectation of the model's
/// shape. A mismatch with the input's column count or with the model itself is
/// an invalid argument. Row `i` of the result is the score of input row `i`.
pub fn predict(
    model: &dyn ScoringModel,
    input: &Matrix,
    input_dim: usize,
    output_dim: usize,
) -> Result<Matrix, ScoringError> {
    if input.cols() != input_dim {
        return Err(ScoringError::InvalidArgument(format!(
            "input column count mismatch: got {}, expected {}",
            input.cols(),
            input_dim
        )));
    }
    if model.input_dim() != input_dim || model.output_dim() != output_dim {
        return Err(ScoringError::InvalidArgument(format!(
            "model shape is {}x{}, caller expected {}x{}",
            model.input_dim(),
            model.output_dim(),
            input_dim,
            output_dim
        )));
    }

    let mut output = Matrix::zeros(input.rows(), output_dim);
    for i in 0..input.rows() {
        let row = &input.data[i * input.cols..(i + 1) * input.cols];
        model.score(row, output.row_mut(i));
    }
    Ok(output)
}

/// Map each output row to the label of its highest-scoring column.
///
/// Ties resolve to the first column. `classes` must have one label per column.
pub fn argmax_labels<'a>(
    scores: &Matrix,
    classes: &'a [String],
) -> Result<Vec<&'a str>, ScoringError> {
    if classes.len() != scores.cols() {
        return Err(ScoringError::InvalidArgument(format!(
            "{} class labels for {} output columns",
            classes.len(),
            scores.cols()
        )));
    }
    if scores.cols() == 0 {
        return Err(ScoringError::InvalidArgument(
            "cannot pick a label from zero output columns".to_string(),
        ));
    }

    let labels = (0..scores.rows())
        .filter_map(|i| scores.row(i))
        .map(|row| {
            let best = row
                .iter()
                .enumerate()
                .fold(0, |best, (j, v)| if *v > row[best] { j } else { best });
            classes[best].as_str()
        })
        .collect();
    Ok(labels)
}

/// Named scoring models.
pub struct ModelRegistry {
    models: HashMap<String, Box<dyn ScoringModel>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Register a model, replacing any previous model of the same name.
    pub fn register(&mut self, name: impl Into<String>, model: Box<dyn ScoringModel>) {
        let name = name.into();
        tracing::debug!(
            "Registered scoring model '{}' ({} -> {})",
            name,
            model.input_dim(),
            model.output_dim()
        );
        self.models.insert(name, model);
    }

    pub fn has_model(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn model_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn count(&self) -> usize {
        self.models.len()
    }

    /// Score `input` with the model registered as `name`.
    pub fn predict(
        &self,
        name: &str,
        input: &Matrix,
        input_dim: usize,
        output_dim: usize,
    ) -> Result<Matrix, ScoringError> {
        let model = self
            .models
            .get(name)
            .ok_or_else(|| ScoringError::UnknownModel(name.to_string()))?;

        predict(model.as_ref(), input, input_dim, output_dim)
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
