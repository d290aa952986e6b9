// src/enhance/prompt.rs
//! Text normalization and prompt assembly for the enhancement call

use crate::enhance::models::EnhanceOptions;

/// The job description every résumé is rewritten against.
/// TODO: accept this per request once the frontend sends one.
pub const JOB_DESCRIPTION: &str =
    "Collaborate on backend and data pipelines using Python, SQL, and APIs";

const SUMMARY_INSTRUCTION: &str =
    "- \"SUMMARY\": highlight the candidate’s technical scope and domain impact";
const EXPERIENCE_INSTRUCTION: &str =
    "- \"EXPERIENCE\": rewrite bullets using STAR format and quantify outcomes";
const SKILLS_INSTRUCTION: &str = "- \"TECHNICAL SKILLS\": emphasize job-relevant technologies";

/// Literal, order-sensitive substitutions applied to the extracted text
/// before prompting. No word-boundary check, so unrelated words containing
/// these substrings are rewritten too ("coder" becomes "pythonr").
pub fn normalize(text: &str) -> String {
    text.replace("project", "python").replace("code", "python")
}

/// Build the single-message prompt sent to the completion endpoint.
///
/// One instruction bullet and one requested JSON field per set flag; with no
/// flags set the model is still asked to reply with an empty JSON object.
pub fn build_prompt(text: &str, opts: &EnhanceOptions) -> String {
    let mut instructions = Vec::new();
    if opts.summary {
        instructions.push(SUMMARY_INSTRUCTION);
    }
    if opts.experience {
        instructions.push(EXPERIENCE_INSTRUCTION);
    }
    if opts.skills {
        instructions.push(SKILLS_INSTRUCTION);
    }

    let mut sample_fields = Vec::new();
    if opts.summary {
        sample_fields.push(r#""summary": "...""#);
    }
    if opts.experience {
        sample_fields.push(r#""experience": ["...", "..."]"#);
    }
    if opts.skills {
        sample_fields.push(r#""skills": ["..."]"#);
    }

    format!(
        "\nImprove this resume using the job description below.\n\n\
         {}\n\n\
         Resume:\n{}\n\n\
         Job Description:\n{}\n\n\
         Respond with a JSON:\n{{\n    {}\n}}\n",
        instructions.join("\n"),
        text,
        JOB_DESCRIPTION,
        sample_fields.join(", ")
    )
}
