//! Per-category prompting and refusal text

use crate::domain::Category;

/// Fixed refusal returned when no usable knowledge exists
pub fn refusal_template(category: Category, query: &str) -> String {
    match category {
        Category::Engineering => format!(
            "I don't have any relevant engineering documentation to answer your question about \"{}\". Please upload engineering PDFs (technical docs, programming guides, etc.) so I can provide specific answers based on your documents.",
            query
        ),
        Category::Medical => format!(
            "I don't have any relevant medical documentation to answer your question about '{}'. Please upload medical PDFs (research papers, clinical guides, etc.) so I can provide specific answers based on your medical documents.",
            query
        ),
        Category::Legal => format!(
            "I don't have any relevant legal documentation to answer your question about '{}'. Please upload legal PDFs (contracts, legal guides, court documents, etc.) so I can provide specific answers based on your legal documents.",
            query
        ),
    }
}

struct Persona {
    role: &'static str,
    documentation: &'static str,
    guidance: [&'static str; 2],
}

fn persona(category: Category) -> Persona {
    match category {
        Category::Engineering => Persona {
            role: "You are a senior software engineer with expertise in programming, system design, DevOps, and technical solutions. Answer the question based ONLY on the following uploaded documentation:",
            documentation: "Engineering Documentation",
            guidance: [
                "Provide practical, actionable advice when possible",
                "Include relevant code examples or technical details from the documentation",
            ],
        },
        Category::Medical => Persona {
            role: "You are a medical expert with knowledge in health, medical procedures, anatomy, diseases, and treatments. Answer the question based ONLY on the following uploaded medical documentation:",
            documentation: "Medical Documentation",
            guidance: [
                "Provide educational information while emphasizing the need for professional medical consultation",
                "Include relevant details from the medical literature when available",
            ],
        },
        Category::Legal => Persona {
            role: "You are a legal expert with knowledge in law, contracts, legal procedures, regulations, and legal advice. Answer the question based ONLY on the following uploaded legal documentation:",
            documentation: "Legal Documentation",
            guidance: [
                "Provide general guidance while emphasizing the need for professional legal consultation",
                "Include relevant legal precedents or regulations from the documentation when available",
            ],
        },
    }
}

/// Generation prompt restricting the answer to `context`
pub fn grounded_prompt(category: Category, query: &str, context: &str) -> String {
    let persona = persona(category);
    let source = match category {
        Category::Engineering => "the provided documentation",
        Category::Medical => "the provided medical documentation",
        Category::Legal => "the provided legal documentation",
    };

    format!(
        "{role}\n\n{doc}: {context}\n\nQuestion: {query}\n\nImportant:\n- Only use information from {source}\n- If the documentation doesn't contain enough information to answer the question completely, say so\n- {g0}\n- {g1}\n\nReturn your response in JSON format with this exact structure:\n{{\"response\": \"Your detailed answer here\"}}",
        role = persona.role,
        doc = persona.documentation,
        context = context,
        query = query,
        source = source,
        g0 = persona.guidance[0],
        g1 = persona.guidance[1],
    )
}

/// Read the `response` field of a generated JSON answer, falling back to the raw text
pub fn parse_generated_answer(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|value| {
            value
                .get("response")
                .and_then(|r| r.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusal_templates_quote_query() {
        let engineering = refusal_template(Category::Engineering, "What is Rust?");
        assert!(engineering.contains("about \"What is Rust?\""));

        let medical = refusal_template(Category::Medical, "How do I treat a sprained ankle?");
        assert!(medical.starts_with("I don't have any relevant medical documentation"));
        assert!(medical.contains("'How do I treat a sprained ankle?'"));

        let legal = refusal_template(Category::Legal, "Can I break my lease?");
        assert!(legal.contains("court documents"));
    }

    #[test]
    fn test_grounded_prompt_restricts_to_context() {
        let prompt = grounded_prompt(Category::Legal, "Is notice required?", "From lease.pdf: 30 days");

        assert!(prompt.contains("ONLY"));
        assert!(prompt.contains("Legal Documentation: From lease.pdf: 30 days"));
        assert!(prompt.contains("Question: Is notice required?"));
        assert!(prompt.contains(r#"{"response": "Your detailed answer here"}"#));
    }

    #[test]
    fn test_parse_generated_answer() {
        assert_eq!(parse_generated_answer(r#"{"response": "Use docker"}"#), "Use docker");
        assert_eq!(parse_generated_answer("plain text"), "plain text");
        assert_eq!(parse_generated_answer(r#"{"answer": "x"}"#), r#"{"answer": "x"}"#);
    }
}
