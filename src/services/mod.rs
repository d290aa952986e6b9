// Services module - clients and helpers shared by the handlers

pub mod openrouter;
pub mod pdf;

pub use openrouter::{OpenRouterConfig, OpenRouterService};
pub use pdf::PdfService;
