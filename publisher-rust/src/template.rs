use crate::{formatter::COMPLETION_MARKER, GenerationRequest};

/// Deterministic article used when no language model is configured or the
/// configured one failed. Shaped like model output: title line, blank line,
/// body markup, completion marker.
#[must_use]
pub fn fallback_article(request: &GenerationRequest) -> String {
    let GenerationRequest {
        keyword,
        affiliate_link,
    } = request;

    let title = format!("{keyword} — A practical guide");
    let mut body = format!(
        "<h2>Introduction</h2><p>This article provides a concise overview for '{keyword}'.</p>"
    );
    body.push_str(
        "<h2>Top picks</h2><ul><li>Tool A — Good for small teams</li><li>Tool B — Good for \
         enterprise</li></ul>",
    );
    body.push_str(&format!(
        "<p>For more details and an affiliate offer, visit {affiliate_link}</p>"
    ));

    format!("{title}\n\n{body}\n\n{COMPLETION_MARKER}")
}
