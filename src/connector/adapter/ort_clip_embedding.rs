use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::imageops::FilterType;
use ndarray::Array4;
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::application::EmbeddingService;
use crate::domain::{DomainError, EmbeddingConfig, EMBEDDING_DIMENSIONS};

const DEFAULT_MODEL_ID: &str = "Xenova/clip-vit-base-patch32";
const IMAGE_SIZE: u32 = 224;
const MAX_TEXT_TOKENS: usize = 77;

// CLIP preprocessing constants, per channel.
const PIXEL_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];
const PIXEL_STD: [f32; 3] = [0.268_629_54, 0.261_302_6, 0.275_777_1];

/// CLIP embedding service backed by ONNX Runtime: one session for the vision
/// tower, one for the text tower, sharing the output space.
pub struct OrtClipEmbedding {
    vision_session: Arc<Mutex<Session>>,
    text_session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    config: EmbeddingConfig,
}

impl OrtClipEmbedding {
    pub fn new(model_id: Option<&str>) -> Result<Self, DomainError> {
        let model_id = model_id.unwrap_or(DEFAULT_MODEL_ID);
        info!("Initializing CLIP embedding service with model: {}", model_id);

        let api = hf_hub::api::sync::ApiBuilder::new()
            .with_progress(true)
            .build()
            .map_err(|e| DomainError::embedding(format!("Failed to create HF API: {}", e)))?;

        let repo = api.model(model_id.to_string());

        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| DomainError::embedding(format!("Failed to download tokenizer: {}", e)))?;

        let vision_path = repo
            .get("onnx/vision_model.onnx")
            .map_err(|e| DomainError::embedding(format!("Failed to download vision model: {}", e)))?;

        let text_path = repo
            .get("onnx/text_model.onnx")
            .map_err(|e| DomainError::embedding(format!("Failed to download text model: {}", e)))?;

        Self::from_paths(vision_path, text_path, tokenizer_path, model_id)
    }

    pub fn from_paths(
        vision_path: PathBuf,
        text_path: PathBuf,
        tokenizer_path: PathBuf,
        model_name: &str,
    ) -> Result<Self, DomainError> {
        info!("Loading CLIP ONNX models from {:?}", vision_path.parent());

        let vision_session = build_session(&vision_path)?;
        let text_session = build_session(&text_path)?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| DomainError::embedding(format!("Failed to load tokenizer: {}", e)))?;

        let config = EmbeddingConfig::new(
            model_name.to_string(),
            EMBEDDING_DIMENSIONS,
            IMAGE_SIZE,
        );

        Ok(Self {
            vision_session: Arc::new(Mutex::new(vision_session)),
            text_session: Arc::new(Mutex::new(text_session)),
            tokenizer: Arc::new(tokenizer),
            config,
        })
    }

    /// Decode, resize to 224x224, normalize per channel, NCHW layout.
    fn preprocess(&self, bytes: &[u8]) -> Result<Array4<f32>, DomainError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| DomainError::embedding(format!("Failed to decode image: {}", e)))?;

        let resized = decoded
            .resize_exact(IMAGE_SIZE, IMAGE_SIZE, FilterType::CatmullRom)
            .to_rgb8();

        let mut pixel_values =
            Array4::<f32>::zeros((1, 3, IMAGE_SIZE as usize, IMAGE_SIZE as usize));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for channel in 0..3 {
                pixel_values[[0, channel, y as usize, x as usize]] =
                    (pixel.0[channel] as f32 / 255.0 - PIXEL_MEAN[channel]) / PIXEL_STD[channel];
            }
        }

        Ok(pixel_values)
    }

    fn run_vision(&self, pixel_values: Array4<f32>) -> Result<Vec<f32>, DomainError> {
        let tensor = Tensor::from_array(pixel_values).map_err(|e| {
            DomainError::embedding(format!("Failed to create pixel_values tensor: {}", e))
        })?;

        let mut session = self
            .vision_session
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to lock vision session: {}", e)))?;

        let outputs = session
            .run(ort::inputs!["pixel_values" => tensor])
            .map_err(|e| DomainError::embedding(format!("Vision inference failed: {}", e)))?;

        extract_single_embedding(&outputs)
    }

    fn run_text(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| DomainError::embedding(format!("Tokenization failed: {}", e)))?;

        let len = encoding.get_ids().len().min(MAX_TEXT_TOKENS);
        let input_ids: Vec<i64> = encoding.get_ids()[..len].iter().map(|&x| x as i64).collect();
        let attention_mask: Vec<i64> = encoding.get_attention_mask()[..len]
            .iter()
            .map(|&x| x as i64)
            .collect();

        let shape = [1usize, len];
        let input_ids_tensor = Tensor::from_array((shape, input_ids)).map_err(|e| {
            DomainError::embedding(format!("Failed to create input_ids tensor: {}", e))
        })?;
        let attention_mask_tensor = Tensor::from_array((shape, attention_mask)).map_err(|e| {
            DomainError::embedding(format!("Failed to create attention_mask tensor: {}", e))
        })?;

        let mut session = self
            .text_session
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to lock text session: {}", e)))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
            ])
            .map_err(|e| DomainError::embedding(format!("Text inference failed: {}", e)))?;

        extract_single_embedding(&outputs)
    }
}

fn build_session(path: &PathBuf) -> Result<Session, DomainError> {
    Session::builder()
        .map_err(|e| DomainError::embedding(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| DomainError::embedding(format!("Failed to set optimization level: {}", e)))?
        .commit_from_file(path)
        .map_err(|e| DomainError::embedding(format!("Failed to load ONNX model: {}", e)))
}

/// Pulls the pooled embedding out of the session outputs. CLIP towers expose
/// `image_embeds`/`text_embeds` as a [1, dim] tensor; some exports also emit
/// the last hidden state first, so prefer the named output when present.
fn extract_single_embedding(outputs: &ort::session::SessionOutputs) -> Result<Vec<f32>, DomainError> {
    let output_value = outputs
        .iter()
        .find(|(name, _)| name.ends_with("_embeds"))
        .or_else(|| outputs.iter().next())
        .map(|(_, v)| v)
        .ok_or_else(|| DomainError::embedding("No output tensor found"))?;

    let (shape, data) = output_value
        .try_extract_tensor::<f32>()
        .map_err(|e| DomainError::embedding(format!("Failed to extract output tensor: {}", e)))?;

    let shape: Vec<usize> = shape.iter().map(|&x| x as usize).collect();
    debug!("Output tensor shape: {:?}", shape);

    if shape.len() != 2 || shape[0] != 1 {
        return Err(DomainError::embedding(format!(
            "Unexpected output tensor shape: {:?}",
            shape
        )));
    }

    let mut embedding: Vec<f32> = data[..shape[1]].to_vec();
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut embedding {
            *v /= norm;
        }
    }

    Ok(embedding)
}

#[async_trait]
impl EmbeddingService for OrtClipEmbedding {
    async fn embed_image(&self, bytes: &[u8]) -> Result<Vec<f32>, DomainError> {
        let pixel_values = self.preprocess(bytes)?;
        self.run_vision(pixel_values)
    }

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        self.run_text(text)
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}

/// Once-initialized handle around [`OrtClipEmbedding`].
///
/// Model download and session construction happen on the first embedding call,
/// guarded by a `OnceCell` so concurrent first requests initialize exactly once.
pub struct LazyClipEmbedding {
    cell: tokio::sync::OnceCell<OrtClipEmbedding>,
    model_id: Option<String>,
    config: EmbeddingConfig,
}

impl LazyClipEmbedding {
    pub fn new(model_id: Option<String>) -> Self {
        let model_name = model_id.as_deref().unwrap_or(DEFAULT_MODEL_ID).to_string();
        Self {
            cell: tokio::sync::OnceCell::new(),
            model_id,
            config: EmbeddingConfig::new(model_name, EMBEDDING_DIMENSIONS, IMAGE_SIZE),
        }
    }

    async fn inner(&self) -> Result<&OrtClipEmbedding, DomainError> {
        self.cell
            .get_or_try_init(|| async {
                let model_id = self.model_id.clone();
                tokio::task::spawn_blocking(move || OrtClipEmbedding::new(model_id.as_deref()))
                    .await
                    .map_err(|e| {
                        DomainError::internal(format!("Embedding init task failed: {}", e))
                    })?
            })
            .await
    }
}

#[async_trait]
impl EmbeddingService for LazyClipEmbedding {
    async fn embed_image(&self, bytes: &[u8]) -> Result<Vec<f32>, DomainError> {
        self.inner().await?.embed_image(bytes).await
    }

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        self.inner().await?.embed_text(text).await
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}
