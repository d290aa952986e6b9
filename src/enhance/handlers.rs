// src/enhance/handlers.rs

use axum::{
    extract::{Extension, Multipart},
    response::Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::common::{ApiError, AppState, ScratchFile};
use crate::enhance::models::{EnhanceOptions, EnhancedSections, GenerateResponse, Preview};
use crate::enhance::prompt;

/// POST /generate - Enhance an uploaded résumé PDF
///
/// Multipart fields: `resume` (PDF, required), `linkedinUrl` (accepted,
/// unused), `enhanceSummary` / `enhanceExperience` / `enhanceSkills`
/// (booleans, default false).
pub async fn generate(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>, ApiError> {
    let mut resume_bytes: Option<Vec<u8>> = None;
    let mut opts = EnhanceOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::BadRequest("Invalid file".to_string()))?;
                resume_bytes = Some(data.to_vec());
            }
            Some("enhanceSummary") => opts.summary = parse_bool_field(&text_field(field).await?),
            Some("enhanceExperience") => {
                opts.experience = parse_bool_field(&text_field(field).await?)
            }
            Some("enhanceSkills") => opts.skills = parse_bool_field(&text_field(field).await?),
            Some("linkedinUrl") => {
                // Accepted for frontend compatibility, not used by the pipeline
                let url = text_field(field).await?;
                debug!(linkedin_url = %url, "Ignoring linkedinUrl field");
            }
            _ => {}
        }
    }

    let resume_bytes = resume_bytes
        .ok_or_else(|| ApiError::BadRequest("No resume file provided".to_string()))?;

    let state = state_lock.read().await;
    let response = run_enhancement(&state, &resume_bytes, opts).await?;
    Ok(Json(response))
}

/// The enhancement pipeline, strictly sequential: persist upload, extract
/// text, normalize, prompt the model, parse its JSON, overlay the sections
/// onto the original, encode the result. Any failure aborts the whole
/// request; both scratch files are cleaned up on every exit path.
async fn run_enhancement(
    state: &AppState,
    resume_bytes: &[u8],
    opts: EnhanceOptions,
) -> Result<GenerateResponse, ApiError> {
    let input = ScratchFile::create(&state.scratch_dir, "resume", resume_bytes)
        .await
        .map_err(|e| ApiError::UploadError(e.to_string()))?;

    let original = input
        .read()
        .await
        .map_err(|e| ApiError::UploadError(e.to_string()))?;

    let text = state
        .pdf_service
        .extract_text(&original)
        .map_err(|e| ApiError::ExtractionError(e.to_string()))?;
    let text = prompt::normalize(&text);

    info!(
        chars = text.len(),
        summary = opts.summary,
        experience = opts.experience,
        skills = opts.skills,
        "Requesting resume enhancement"
    );

    let content = state
        .openrouter_service
        .complete(&prompt::build_prompt(&text, &opts))
        .await
        .map_err(|e| ApiError::CompletionError(e.to_string()))?;

    // Strict parse of the assistant's message: no repair, no retry
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| ApiError::ModelJsonError(format!("Invalid JSON response: {}", e)))?;
    let sections = EnhancedSections::from_value(&value).requested(&opts);

    let overlaid = state
        .pdf_service
        .overlay_sections(&original, &sections)
        .map_err(|e| ApiError::PdfWriteError(e.to_string()))?;

    let output = ScratchFile::create(&state.scratch_dir, "updated", &overlaid)
        .await
        .map_err(|e| ApiError::PdfWriteError(e.to_string()))?;
    let encoded = BASE64.encode(
        output
            .read()
            .await
            .map_err(|e| ApiError::PdfWriteError(e.to_string()))?,
    );

    info!(pdf_bytes = overlaid.len(), "Resume enhancement completed");

    Ok(GenerateResponse {
        pdf: encoded,
        preview: Preview::from(&sections),
    })
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid form field: {}", e)))
}

/// Common form spellings of a true flag; anything else is false
fn parse_bool_field(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use crate::services::pdf::test_fixtures::build_pdf;
    use crate::services::{OpenRouterConfig, OpenRouterService, PdfService};
    use axum::{http::StatusCode, routing::post, Router};
    use serde_json::json;

    /// Completion endpoint stub returning a fixed body and status
    async fn spawn_completion_stub(body: serde_json::Value, status: StatusCode) -> String {
        let app = Router::new().route(
            "/chat/completions",
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn state_for(base_url: String) -> AppState {
        let scratch_dir =
            std::env::temp_dir().join(format!("enhancer-test-{}", crate::common::generate_raw_id(8)));
        std::fs::create_dir_all(&scratch_dir).unwrap();

        let mut config = OpenRouterConfig::new("test-key".to_string());
        config.base_url = base_url;

        AppState {
            openrouter_service: Arc::new(OpenRouterService::new(config)),
            pdf_service: Arc::new(PdfService::new()),
            scratch_dir,
            static_dir: std::path::PathBuf::from("static"),
        }
    }

    fn scratch_is_empty(state: &AppState) -> bool {
        std::fs::read_dir(&state.scratch_dir).unwrap().next().is_none()
    }

    fn completion_reply(content: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
    }

    #[tokio::test]
    async fn test_summary_enhancement_round_trip() {
        let base = spawn_completion_stub(
            completion_reply(r#"{"summary": "Senior engineer with 5 years experience."}"#),
            StatusCode::OK,
        )
        .await;
        let state = state_for(base);
        let pdf = build_pdf(&["Original resume content"]);

        let opts = EnhanceOptions {
            summary: true,
            ..Default::default()
        };
        let response = run_enhancement(&state, &pdf, opts).await.unwrap();

        assert_eq!(
            response.preview,
            Preview {
                summary: "Senior engineer with 5 years experience.".to_string(),
                experience: vec![],
                skills: vec![],
            }
        );

        let decoded = BASE64.decode(&response.pdf).unwrap();
        let text = state.pdf_service.extract_text(&decoded).unwrap();
        assert!(text.contains("Updated SUMMARY:"));
        assert!(text.contains("Senior engineer with 5 years experience."));

        assert!(scratch_is_empty(&state), "scratch files left behind");
    }

    #[tokio::test]
    async fn test_completion_failure_is_surfaced_and_cleaned_up() {
        let base =
            spawn_completion_stub(json!({"error": "upstream down"}), StatusCode::BAD_GATEWAY).await;
        let state = state_for(base);
        let pdf = build_pdf(&["Resume"]);

        let err = run_enhancement(&state, &pdf, EnhanceOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("502"), "got: {}", err);
        assert!(scratch_is_empty(&state), "scratch files left behind");
    }

    #[tokio::test]
    async fn test_prose_reply_is_invalid_json_error() {
        let base = spawn_completion_stub(
            completion_reply("Here is your improved resume: ..."),
            StatusCode::OK,
        )
        .await;
        let state = state_for(base);
        let pdf = build_pdf(&["Resume"]);

        let opts = EnhanceOptions {
            summary: true,
            ..Default::default()
        };
        let err = run_enhancement(&state, &pdf, opts).await.unwrap_err();
        assert!(
            err.to_string().contains("Invalid JSON response"),
            "got: {}",
            err
        );
        assert!(scratch_is_empty(&state), "scratch files left behind");
    }

    #[tokio::test]
    async fn test_unrequested_sections_never_reach_the_preview() {
        // All flags false: even a model that volunteers values gets ignored
        let base = spawn_completion_stub(
            completion_reply(r#"{"summary": "volunteered", "skills": ["Rust"]}"#),
            StatusCode::OK,
        )
        .await;
        let state = state_for(base);
        let pdf = build_pdf(&["Resume"]);

        let response = run_enhancement(&state, &pdf, EnhanceOptions::default())
            .await
            .unwrap();
        assert_eq!(response.preview.summary, "");
        assert!(response.preview.skills.is_empty());
    }

    #[test]
    fn test_parse_bool_field() {
        assert!(parse_bool_field("true"));
        assert!(parse_bool_field("True"));
        assert!(parse_bool_field("1"));
        assert!(parse_bool_field("on"));
        assert!(parse_bool_field("yes"));
        assert!(!parse_bool_field("false"));
        assert!(!parse_bool_field("0"));
        assert!(!parse_bool_field(""));
        assert!(!parse_bool_field("maybe"));
    }
}
