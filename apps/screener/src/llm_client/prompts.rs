// Shared prompt fragments.
// Each collaborator that calls the LLM keeps its own prompts.rs alongside it.

/// Instruction appended to prompts that read candidate-supplied text.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    CRITICAL: Only report facts that appear in the provided text. \
    Do NOT infer, interpolate, or invent details. \
    If a field is not present, use null.";

/// Substitutes `{name}` placeholders in one left-to-right pass. Inserted
/// values are never rescanned, so a placeholder inside candidate text stays
/// literal. Unknown `{...}` sequences are copied through.
pub fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    'scan: while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        for (name, value) in values {
            if let Some(after) = tail.strip_prefix(name).and_then(|t| t.strip_prefix('}')) {
                out.push_str(value);
                rest = after;
                continue 'scan;
            }
        }
        out.push('{');
        rest = tail;
    }
    out.push_str(rest);
    out
}
