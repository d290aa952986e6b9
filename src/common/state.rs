// Application state shared across all modules

use std::path::PathBuf;
use std::sync::Arc;

use crate::services::{OpenRouterService, PdfService};

/// Application state containing services and configuration
#[derive(Clone)]
pub struct AppState {
    pub openrouter_service: Arc<OpenRouterService>,
    pub pdf_service: Arc<PdfService>,
    pub scratch_dir: PathBuf,
    pub static_dir: PathBuf,
}
