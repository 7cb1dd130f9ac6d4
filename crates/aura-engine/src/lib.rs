use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use aura_contracts::catalog::{Catalog, Product};
use aura_contracts::chat::{respond, Conversation, Message};
use aura_contracts::events::{EventPayload, EventWriter};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::blocking::{Client as HttpClient, Response as HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

/// Scripted progress sequence shown while the try-on "processes". Each
/// checkpoint is held for [`CHECKPOINT_HOLD`] purely for perceived latency.
pub const PROGRESS_CHECKPOINTS: &[(u8, &str)] = &[
    (10, "Analyzing uploaded photo..."),
    (25, "Detecting body pose and measurements..."),
    (40, "Processing clothing items..."),
    (60, "Applying computer vision algorithms..."),
    (80, "Generating realistic try-on images..."),
    (95, "Finalizing results..."),
    (100, "Complete!"),
];

const CHECKPOINT_HOLD: Duration = Duration::from_millis(1000);
const THINKING_DELAY: Duration = Duration::from_millis(1500);
const STUDIO_DELAY: Duration = Duration::from_millis(2000);

/// Substituted whenever the generation call fails; the wizard still reaches
/// the results stage.
pub const FALLBACK_RESULTS: &[&str] = &[
    "/person-wearing-linen-maxi-dress-summer-style.png",
    "/person-wearing-cotton-tshirt-casual-look.png",
];

const STUDIO_RESULTS: &[&str] = &[
    "/person-wearing-linen-maxi-dress-summer-style.png",
    "/person-wearing-cotton-tshirt-casual-look.png",
    "/person-wearing-high-waist-jeans-trendy-style.png",
];
const STUDIO_PROCESSING_TIME: &str = "3.2s";
const STUDIO_MODEL: &str = "AURA-TryOn-v2.1";

const DEFAULT_API_BASE: &str = "http://localhost:3000/api";

/// Injectable clock. Every simulated delay in the engine goes through this,
/// so tests substitute a recording fake instead of waiting on wall time.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSleeper;

impl Sleeper for SystemSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub id: String,
    pub name: String,
    pub image: String,
}

impl SelectedItem {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TryOnRequest {
    pub original_image: String,
    pub selected_products: Vec<SelectedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TryOnResponse {
    pub success: bool,
    pub generated_images: Vec<String>,
    pub processing_time: String,
    pub ai_model: String,
}

pub trait TryOnProvider: Send + Sync {
    fn name(&self) -> &str;
    fn generate(&self, request: &TryOnRequest) -> Result<TryOnResponse>;
}

/// Canned local provider. Waits the fixed studio delay and returns the demo
/// result set; there is no image synthesis behind it.
pub struct StudioProvider {
    sleeper: Arc<dyn Sleeper>,
}

impl StudioProvider {
    pub fn new(sleeper: Arc<dyn Sleeper>) -> Self {
        Self { sleeper }
    }
}

impl TryOnProvider for StudioProvider {
    fn name(&self) -> &str {
        "studio"
    }

    fn generate(&self, _request: &TryOnRequest) -> Result<TryOnResponse> {
        self.sleeper.sleep(STUDIO_DELAY);
        Ok(TryOnResponse {
            success: true,
            generated_images: STUDIO_RESULTS
                .iter()
                .map(|item| (*item).to_string())
                .collect(),
            processing_time: STUDIO_PROCESSING_TIME.to_string(),
            ai_model: STUDIO_MODEL.to_string(),
        })
    }
}

/// Remote generation endpoint speaking the camelCase JSON wire contract.
pub struct RemoteProvider {
    api_base: String,
    http: HttpClient,
}

impl RemoteProvider {
    pub fn new(api_base: Option<String>) -> Self {
        Self {
            api_base: api_base
                .or_else(|| non_empty_env("AURA_API_BASE"))
                .map(|value| value.trim().trim_end_matches('/').to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            http: HttpClient::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/virtual-tryon", self.api_base)
    }
}

impl TryOnProvider for RemoteProvider {
    fn name(&self) -> &str {
        "remote"
    }

    fn generate(&self, request: &TryOnRequest) -> Result<TryOnResponse> {
        let endpoint = self.endpoint();
        let response = self
            .http
            .post(&endpoint)
            .json(request)
            .send()
            .with_context(|| format!("try-on request failed ({endpoint})"))?;
        let payload = response_json_or_error("try-on", response)?;
        serde_json::from_value(payload).context("failed parsing try-on response payload")
    }
}

/// A validated uploaded photo: data-URI reference plus fingerprint and
/// pixel dimensions. The wizard never holds an undecodable photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub data_uri: String,
    pub fingerprint: String,
    pub width: u32,
    pub height: u32,
}

pub fn load_photo(path: &Path) -> Result<Photo> {
    let bytes = fs::read(path).with_context(|| format!("failed reading {}", path.display()))?;
    if bytes.is_empty() {
        bail!("photo file is empty ({})", path.display());
    }
    let decoded = image::load_from_memory(&bytes)
        .with_context(|| format!("{} is not a decodable image", path.display()))?;
    let mime = mime_for_path(path).unwrap_or("image/png");
    let mut hasher = Sha256::new();
    hasher.update(&bytes);

    Ok(Photo {
        data_uri: format!("data:{mime};base64,{}", BASE64.encode(&bytes)),
        fingerprint: hex::encode(hasher.finalize()),
        width: decoded.width(),
        height: decoded.height(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStage {
    AwaitingUpload,
    SelectingProducts,
    Processing,
    ShowingResults,
}

impl WizardStage {
    pub fn step(&self) -> u8 {
        match self {
            Self::AwaitingUpload => 1,
            Self::SelectingProducts => 2,
            Self::Processing => 3,
            Self::ShowingResults => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AwaitingUpload => "awaiting_upload",
            Self::SelectingProducts => "selecting_products",
            Self::Processing => "processing",
            Self::ShowingResults => "showing_results",
        }
    }
}

/// Four-stage try-on flow: upload, select, simulated processing, results.
/// The stage only moves forward; `reset` is the one way back. Refused
/// transitions are no-ops, and a failing generation call degrades to the
/// fixed fallback list instead of surfacing an error.
pub struct TryOnWizard {
    stage: WizardStage,
    photo: Option<Photo>,
    selected: Vec<Product>,
    progress: u8,
    results: Vec<String>,
    result_index: usize,
    fallback_used: bool,
    provider: Box<dyn TryOnProvider>,
    sleeper: Arc<dyn Sleeper>,
    events: EventWriter,
}

impl TryOnWizard {
    pub fn new(
        provider: Box<dyn TryOnProvider>,
        sleeper: Arc<dyn Sleeper>,
        events: EventWriter,
    ) -> Result<Self> {
        events.emit(
            "wizard_started",
            map_object(json!({ "provider": provider.name() })),
        )?;
        Ok(Self {
            stage: WizardStage::AwaitingUpload,
            photo: None,
            selected: Vec::new(),
            progress: 0,
            results: Vec::new(),
            result_index: 0,
            fallback_used: false,
            provider,
            sleeper,
            events,
        })
    }

    pub fn stage(&self) -> WizardStage {
        self.stage
    }

    pub fn photo(&self) -> Option<&Photo> {
        self.photo.as_ref()
    }

    pub fn selected_products(&self) -> &[Product] {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|product| product.id == id)
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn result_index(&self) -> usize {
        self.result_index
    }

    pub fn current_result(&self) -> Option<&str> {
        self.results.get(self.result_index).map(String::as_str)
    }

    pub fn fallback_used(&self) -> bool {
        self.fallback_used
    }

    /// Accepts a validated photo and advances to product selection. A no-op
    /// outside the upload stage.
    pub fn upload_photo(&mut self, photo: Photo) -> Result<bool> {
        if self.stage != WizardStage::AwaitingUpload {
            return Ok(false);
        }
        self.events.emit(
            "photo_uploaded",
            map_object(json!({
                "fingerprint": photo.fingerprint,
                "width": photo.width,
                "height": photo.height,
            })),
        )?;
        self.photo = Some(photo);
        self.stage = WizardStage::SelectingProducts;
        Ok(true)
    }

    /// Toggles selection membership and returns whether the product is
    /// selected afterwards. Outside the selection stage nothing changes.
    pub fn toggle_product(&mut self, product: &Product) -> Result<bool> {
        if self.stage != WizardStage::SelectingProducts {
            return Ok(self.is_selected(&product.id));
        }
        let selected = if let Some(position) = self
            .selected
            .iter()
            .position(|item| item.id == product.id)
        {
            self.selected.remove(position);
            false
        } else {
            self.selected.push(product.clone());
            true
        };
        self.events.emit(
            "product_toggled",
            map_object(json!({ "id": product.id, "selected": selected })),
        )?;
        Ok(selected)
    }

    /// Runs the whole processing stage: the checkpoint sequence, then the
    /// generation call. Returns `Ok(false)` without side effects when the
    /// preconditions (selection stage, photo, at least one item) are not
    /// met. Always ends in the results stage otherwise; provider failures
    /// substitute [`FALLBACK_RESULTS`].
    pub fn start_try_on(&mut self) -> Result<bool> {
        if self.stage != WizardStage::SelectingProducts || self.selected.is_empty() {
            return Ok(false);
        }
        let Some(photo) = self.photo.clone() else {
            return Ok(false);
        };

        self.stage = WizardStage::Processing;
        self.progress = 0;
        self.fallback_used = false;
        self.events.emit(
            "processing_started",
            map_object(json!({
                "provider": self.provider.name(),
                "items": self
                    .selected
                    .iter()
                    .map(|product| product.id.clone())
                    .collect::<Vec<String>>(),
            })),
        )?;

        // The full checkpoint sequence runs before the provider response is
        // applied, even if the call would have finished earlier.
        for (pct, message) in PROGRESS_CHECKPOINTS {
            self.sleeper.sleep(CHECKPOINT_HOLD);
            self.progress = *pct;
            self.events.emit(
                "processing_progress",
                map_object(json!({ "pct": pct, "message": message })),
            )?;
        }

        let request = TryOnRequest {
            original_image: photo.data_uri,
            selected_products: self
                .selected
                .iter()
                .map(SelectedItem::from_product)
                .collect(),
        };

        match self.provider.generate(&request) {
            Ok(response) if response.success && !response.generated_images.is_empty() => {
                self.events.emit(
                    "results_ready",
                    map_object(json!({
                        "count": response.generated_images.len(),
                        "processing_time": response.processing_time,
                        "ai_model": response.ai_model,
                    })),
                )?;
                self.results = response.generated_images;
            }
            Ok(response) => {
                self.apply_fallback(format!(
                    "provider returned no usable results (success: {})",
                    response.success
                ))?;
            }
            Err(err) => {
                self.apply_fallback(format!("{err:#}"))?;
            }
        }

        self.result_index = 0;
        self.stage = WizardStage::ShowingResults;
        Ok(true)
    }

    /// Moves the result index forward by one, clamped to the last result.
    pub fn next_result(&mut self) -> usize {
        if self.stage == WizardStage::ShowingResults && !self.results.is_empty() {
            self.result_index = (self.result_index + 1).min(self.results.len() - 1);
        }
        self.result_index
    }

    /// Moves the result index backward by one, clamped to zero.
    pub fn prev_result(&mut self) -> usize {
        if self.stage == WizardStage::ShowingResults {
            self.result_index = self.result_index.saturating_sub(1);
        }
        self.result_index
    }

    /// Returns to the upload stage from anywhere, discarding the photo,
    /// selections, progress, and results.
    pub fn reset(&mut self) -> Result<()> {
        self.stage = WizardStage::AwaitingUpload;
        self.photo = None;
        self.selected.clear();
        self.progress = 0;
        self.results.clear();
        self.result_index = 0;
        self.fallback_used = false;
        self.events.emit("wizard_reset", EventPayload::new())?;
        Ok(())
    }

    fn apply_fallback(&mut self, reason: String) -> Result<()> {
        self.fallback_used = true;
        self.results = FALLBACK_RESULTS
            .iter()
            .map(|item| (*item).to_string())
            .collect();
        self.events
            .emit("tryon_fallback", map_object(json!({ "reason": reason })))?;
        Ok(())
    }
}

/// One stylist conversation. Turns are strictly sequential: the user
/// message is appended, the thinking delay elapses, then the assistant
/// response is appended.
pub struct StylistSession {
    catalog: Catalog,
    conversation: Conversation,
    sleeper: Arc<dyn Sleeper>,
    events: EventWriter,
}

impl StylistSession {
    pub fn new(catalog: Catalog, sleeper: Arc<dyn Sleeper>, events: EventWriter) -> Self {
        Self {
            catalog,
            conversation: Conversation::new(),
            sleeper,
            events,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Discards the log and starts over from the greeting.
    pub fn reset(&mut self) {
        self.conversation = Conversation::new();
    }

    /// Runs one turn. Blank input is a no-op and returns `None`.
    pub fn send(&mut self, text: &str) -> Result<Option<&Message>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        self.conversation.push(Message::user(trimmed));
        self.sleeper.sleep(THINKING_DELAY);

        let response = respond(trimmed, &self.catalog);
        self.events.emit(
            "stylist_turn",
            map_object(json!({
                "utterance": trimmed,
                "products": response
                    .products
                    .iter()
                    .map(|product| product.id.clone())
                    .collect::<Vec<String>>(),
                "suggestions": response.suggestions.len(),
            })),
        )?;

        let message = Message::assistant(response.reply, response.products, response.suggestions);
        Ok(Some(self.conversation.push(message)))
    }
}

fn response_json_or_error(label: &str, response: HttpResponse) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let code = status.as_u16();
        let body = response.text().unwrap_or_default();
        bail!(
            "{label} request failed ({code}): {}",
            truncate_text(&body, 512)
        );
    }
    response
        .json()
        .with_context(|| format!("failed parsing {label} JSON response"))
}

fn truncate_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect()
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn map_object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}
