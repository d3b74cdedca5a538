use crate::domain::ports::ForecastEngine;
use anyhow::{Context, Result, bail};
use ndarray::{Array2, ArrayD, IxDyn};
use ort::session::Session;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// Longest context the model was exported for; older prices are dropped
pub const DEFAULT_CONTEXT_LENGTH: usize = 512;

/// Forecasting engine backed by an exported ONNX time-series model.
///
/// Expected graph signature:
/// - input 0: `context`, f32 `[batch, context_length]`
/// - input 1: `prediction_length`, i64 `[1]`
/// - output 0: f32 `[batch, num_samples, prediction_length]`
pub struct OnnxForecastEngine {
    session: Mutex<Session>,
    model_path: PathBuf,
    name: String,
    context_length: usize,
}

impl OnnxForecastEngine {
    /// Load the model once; callers keep the engine for the process lifetime
    pub fn load(model_path: &Path, name: &str, context_length: usize) -> Result<Self> {
        if !model_path.exists() {
            bail!("ONNX model file not found at {:?}", model_path);
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {:?}", model_path))?;

        info!(
            "Successfully loaded ONNX model {} from {:?}",
            name, model_path
        );

        Ok(Self {
            session: Mutex::new(session),
            model_path: model_path.to_path_buf(),
            name: name.to_string(),
            context_length: context_length.max(1),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Keep at most `context_length` most recent prices per batch row
    fn context_window(&self, context: &Array2<f32>) -> (Vec<usize>, Vec<f32>) {
        let (batch, len) = context.dim();
        let start = len.saturating_sub(self.context_length);
        let window = context.slice(ndarray::s![.., start..]);
        let flat: Vec<f32> = window.iter().copied().collect();
        (vec![batch, len - start], flat)
    }
}

impl ForecastEngine for OnnxForecastEngine {
    fn predict(&self, context: &Array2<f32>, horizon: usize) -> Result<ArrayD<f32>, String> {
        let (shape, data) = self.context_window(context);

        let context_value = ort::value::Value::from_array((shape.as_slice(), data))
            .map_err(|e| format!("Input value creation failed: {}", e))?;
        let horizon_shape = vec![1usize];
        let horizon_value =
            ort::value::Value::from_array((horizon_shape.as_slice(), vec![horizon as i64]))
                .map_err(|e| format!("Horizon value creation failed: {}", e))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Mutex lock failed: {}", e))?;

        let outputs = session
            .run(ort::inputs![context_value, horizon_value])
            .map_err(|e| e.to_string())?;

        let output_value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or("No output found")?;
        let (out_shape, out_data) = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| e.to_string())?;

        let dims = out_shape
            .iter()
            .map(|d| usize::try_from(*d).map_err(|_| format!("Invalid output dimension {}", d)))
            .collect::<Result<Vec<_>, _>>()?;

        ArrayD::from_shape_vec(IxDyn(&dims), out_data.to_vec()).map_err(|e| e.to_string())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
