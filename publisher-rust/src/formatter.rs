/// Appended to every body before it is sent, so drafts written by this tool
/// can be told apart from hand-written ones.
pub const COMPLETION_MARKER: &str = "<!-- AUTO_GENERATED -->";

/// Hard upper bound on the excerpt, counted in characters.
pub const EXCERPT_CHARS: usize = 140;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedPost {
    pub title: String,
    pub body: String,
    pub excerpt: String,
}

/// Turn raw model output into a post.
///
/// The first non-empty line becomes the title (or `keyword` when the text is
/// blank); the remaining lines become the body. Plain-text bodies get
/// paragraph markup. The excerpt is taken before the marker is appended.
#[must_use]
pub fn format_post(raw: &str, keyword: &str) -> FormattedPost {
    let mut lines = raw.lines().map(str::trim).filter(|line| !line.is_empty());

    let title = lines.next().unwrap_or(keyword).to_string();
    let mut body = lines.collect::<Vec<_>>().join("\n");

    if !has_block_markup(&body) {
        body = wrap_paragraphs(&body);
    }

    let excerpt = excerpt(&body);
    append_marker(&mut body);

    FormattedPost {
        title,
        body,
        excerpt,
    }
}

fn has_block_markup(body: &str) -> bool {
    body.contains("<p>") || body.contains("<h")
}

/// Wrap each blank-line separated block in `<p>` tags.
#[must_use]
pub fn wrap_paragraphs(body: &str) -> String {
    body.split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .map(|block| format!("<p>{block}</p>"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First [`EXCERPT_CHARS`] characters of `body`, cut without regard for words.
#[must_use]
pub fn excerpt(body: &str) -> String {
    body.chars().take(EXCERPT_CHARS).collect()
}

/// Append [`COMPLETION_MARKER`] unless `body` already carries it.
pub fn append_marker(body: &mut String) {
    if !body.contains(COMPLETION_MARKER) {
        body.push_str("\n\n");
        body.push_str(COMPLETION_MARKER);
    }
}
