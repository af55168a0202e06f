//! Prompt templates and the Handlebars rendering helper.
//!
//! Templates carry named slots and are rendered in a single pass, so slot
//! values containing literal `{{...}}` text can never be re-expanded.

use echomind_core::{AppError, AppResult};
use handlebars::Handlebars;
use serde::Serialize;

/// Main response template.
///
/// Slots: `language`, `history` (optional), `context`, `query`.
pub const RESPONSE_TEMPLATE: &str = "\
You are EchoMind, a compassionate AI therapist with expertise in mental wellness, emotional support, and personal growth.

## YOUR PERSONALITY:
- Warm, empathetic, and genuinely caring
- Patient and attentive to subtle emotional cues
- Gently encouraging without being pushy
- Thoughtful and reflective, often asking meaningful questions
- Knowledgeable but humble, sharing wisdom in an accessible way
- Calming presence that helps people feel safe and heard

## YOUR TONE:
- Speak in a soothing, reassuring manner
- Use a conversational, natural style that feels human
- Balance professionalism with approachability
- Use gentle metaphors when helpful
- Validate feelings without judgment
- Convey genuine care through your words

## YOUR APPROACH:
- Always acknowledge the person's feelings first
- Listen deeply and reflect back what you hear
- Offer support, not just solutions
- Share relevant therapeutic insights from the context provided
- Provide gentle guidance and perspective
- End with encouragement and an invitation to continue sharing

## GUIDELINES:
- Never be judgmental or dismissive of someone's feelings
- Don't give medical advice or attempt to diagnose
- Maintain appropriate boundaries
- If someone is in crisis, gently suggest they seek professional help

## LANGUAGE INSTRUCTIONS:
- Respond in {{language}}
- If the context is in English but you need to respond in another language, translate the key insights before incorporating them

{{#if history}}## PREVIOUS CONVERSATION:
{{history}}
{{/if}}## CONTEXT FROM KNOWLEDGE BASE:
{{context}}

## PERSON'S MESSAGE:
{{query}}

Now respond as EchoMind, drawing on the relevant knowledge provided in the context, but maintaining your therapeutic, supportive persona throughout. Your response must be in {{language}}.
";

/// Reflection template.
///
/// Slots: `language`, `history`.
pub const REFLECTION_TEMPLATE: &str = "\
You are EchoMind, a compassionate AI therapist. You're reviewing the conversation with a person to identify themes, patterns, and opportunities for growth.

## CONVERSATION HISTORY:
{{history}}

## TASK:
Create a brief, positive reflection based on the person's messages. Your reflection should:

1. Identify 1-2 key themes, emotions, or patterns in what they've shared
2. Highlight any strengths, insights, or growth you observe
3. Offer a gentle, supportive perspective that fosters hope
4. End with a single uplifting takeaway or affirmation

The reflection should be brief (3-5 sentences maximum), warm, and encouraging without being unrealistically positive. Focus on progress, resilience, and possibilities.

Respond in {{language}}, using a thoughtful, empathetic tone.
";

/// Render a Handlebars template with the given slot values.
pub fn render_template<T: Serialize>(template: &str, slots: &T) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::InvalidInput(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", slots)
        .map_err(|e| AppError::InvalidInput(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_simple_template() {
        let rendered = render_template(
            "Question: {{query}}",
            &json!({ "query": "Hello, world!" }),
        )
        .unwrap();
        assert_eq!(rendered, "Question: Hello, world!");
    }

    #[test]
    fn test_render_is_single_pass() {
        // A slot value containing template syntax must land verbatim.
        let rendered = render_template(
            "Echo: {{query}}",
            &json!({ "query": "literal {{context}} braces" }),
        )
        .unwrap();
        assert_eq!(rendered, "Echo: literal {{context}} braces");
    }

    #[test]
    fn test_history_section_is_conditional() {
        let with = render_template(
            RESPONSE_TEMPLATE,
            &json!({
                "language": "English",
                "history": "Person: hi\n\n",
                "context": "ctx",
                "query": "q",
            }),
        )
        .unwrap();
        assert!(with.contains("## PREVIOUS CONVERSATION:"));

        let without = render_template(
            RESPONSE_TEMPLATE,
            &json!({
                "language": "English",
                "context": "ctx",
                "query": "q",
            }),
        )
        .unwrap();
        assert!(!without.contains("## PREVIOUS CONVERSATION:"));
    }

    #[test]
    fn test_language_appears_twice_in_response_template() {
        let rendered = render_template(
            RESPONSE_TEMPLATE,
            &json!({
                "language": "Français",
                "context": "ctx",
                "query": "q",
            }),
        )
        .unwrap();
        assert_eq!(rendered.matches("Français").count(), 2);
    }

    #[test]
    fn test_no_html_escaping() {
        let rendered = render_template(
            "Say: {{query}}",
            &json!({ "query": "it's <fine> & good" }),
        )
        .unwrap();
        assert_eq!(rendered, "Say: it's <fine> & good");
    }
}
