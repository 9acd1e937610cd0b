//! Prompt construction for email generation.
//!
//! Pure functions: form input plus the current store contents in, system
//! instruction and user prompt out. Writing styles take precedence over
//! saved emails as style examples; saved emails demote to reference
//! examples when both are present.

use crate::models::{EmailFormData, SavedEmail, WritingStyle};

const SYSTEM_HEADER: &str = r#"You are an expert assistant at crafting professional academic cold emails to university professors.

CRITICAL INSTRUCTION: Your primary and most important goal is to generate an email that STRICTLY adheres to the writing style, tone, and structure of the WRITING STYLE EXAMPLES provided below. These writing style examples represent the user's actual writing style and should be your primary reference.

REQUIREMENTS:
1. **Style Matching**: The generated email MUST match the tone, vocabulary, sentence structure, and writing patterns from the provided examples.
2. **Professional Academic Tone**: Maintain a formal, respectful, and scholarly tone appropriate for academic communication.
3. **Logical Structure**: Follow a clear, logical flow: introduction, background, specific request, and conclusion.
4. **Personalization**: Incorporate specific details about the professor's research, university, and department.
5. **Conciseness**: Keep the email concise but comprehensive (typically 150-250 words).
6. **Grammar and Formatting**: Ensure perfect grammar, spelling, and professional formatting.

FORMAT REQUIREMENTS:
- Start with a proper greeting: "Dear Professor [Last Name],"
- Use formal academic language throughout
- Include specific references to the professor's work when possible
- End with a professional closing: "Best regards," or "Sincerely,"
- Include your name at the end"#;

const SYSTEM_FOOTER: &str = "IMPORTANT: If writing style examples are provided, you MUST follow their exact tone, structure, and writing patterns. If no examples are provided, create a professional academic email following standard conventions.";

const USER_PREAMBLE: &str =
    "Please generate a professional cold email with the following details:\n\n";

const USER_CLOSING: &str = "\nGenerate a professional, personalized email that incorporates all relevant information and follows the writing style examples provided.";

/// Assemble the system instruction from the fixed template and the current
/// example collections.
pub fn build_system_instruction(
    saved_emails: &[SavedEmail],
    writing_styles: &[WritingStyle],
) -> String {
    let style_examples: Vec<&str> = writing_styles
        .iter()
        .map(|s| s.content.as_str())
        .filter(|c| !c.trim().is_empty())
        .collect();

    let email_examples: Vec<&str> = saved_emails
        .iter()
        .map(|e| e.content.as_str())
        .filter(|c| !c.trim().is_empty())
        .collect();

    // Writing styles win; saved emails only serve as reference material
    // when styles exist, and as the primary examples otherwise.
    let (primary, secondary) = if style_examples.is_empty() {
        (email_examples, Vec::new())
    } else {
        (style_examples, email_examples)
    };

    let examples_text = if primary.is_empty() {
        String::new()
    } else {
        format!(
            "\nWRITING STYLE EXAMPLES (CRITICAL - FOLLOW THESE EXACTLY):\n{}",
            numbered(&primary, "Example")
        )
    };

    let secondary_text = if secondary.is_empty() {
        String::new()
    } else {
        format!(
            "\nADDITIONAL REFERENCE EXAMPLES:\n{}",
            numbered(&secondary, "Reference")
        )
    };

    format!("{SYSTEM_HEADER}\n\n{examples_text}{secondary_text}\n\n{SYSTEM_FOOTER}")
}

fn numbered(examples: &[&str], label: &str) -> String {
    examples
        .iter()
        .enumerate()
        .map(|(i, example)| format!("{} {}:\n{}", label, i + 1, example))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Assemble the user prompt: one labeled line per non-empty form field, in
/// fixed order. Empty fields produce no line at all.
pub fn build_user_prompt(form: &EmailFormData) -> String {
    let mut prompt = String::from(USER_PREAMBLE);

    let fields = [
        ("Professor's Name", &form.professor_name),
        ("University", &form.university_name),
        ("Department", &form.department_name),
        ("Laboratory/Research Group", &form.lab_name),
        ("Research Topic of Interest", &form.research_topic),
        ("Opportunity Type", &form.opportunity_type),
        ("Project Details", &form.project_details),
        ("Additional Context", &form.prompt),
    ];

    for (label, value) in fields {
        if !value.is_empty() {
            prompt.push_str(label);
            prompt.push_str(": ");
            prompt.push_str(value);
            prompt.push('\n');
        }
    }

    prompt.push_str(USER_CLOSING);
    prompt
}
