/// Hard limit on a post body, in characters.
pub const MAX_BODY_CHARS: usize = 280;

/// A binary file selected for upload alongside a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Create an attachment, guessing the content type from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

/// Unsaved compose state, held only in client memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    text: String,
    attachment: Option<Attachment>,
    preview: Option<String>,
    in_flight: bool,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Local reference to the selected file, shown before upload.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Replace the text. Values longer than `MAX_BODY_CHARS` are rejected
    /// whole and the previous text is kept.
    pub fn set_text(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.chars().count() > MAX_BODY_CHARS {
            return false;
        }
        self.text = value;
        true
    }

    /// Append one keystroke, subject to the same limit as `set_text`.
    pub fn push_char(&mut self, c: char) -> bool {
        if self.text.chars().count() >= MAX_BODY_CHARS {
            return false;
        }
        self.text.push(c);
        true
    }

    pub fn remaining(&self) -> usize {
        MAX_BODY_CHARS.saturating_sub(self.text.chars().count())
    }

    pub fn select_attachment(&mut self, attachment: Attachment, preview: Option<String>) {
        self.attachment = Some(attachment);
        self.preview = preview;
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
        self.preview = None;
    }

    /// True when there is something to publish: non-blank text or an attachment.
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty() || self.attachment.is_some()
    }

    /// Reset text, attachment and preview. The in-flight flag is left alone.
    pub fn clear(&mut self) {
        self.text.clear();
        self.clear_attachment();
    }

    pub(crate) fn set_in_flight(&mut self, in_flight: bool) {
        self.in_flight = in_flight;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text_accepts_up_to_limit() {
        let mut draft = Draft::new();
        assert!(draft.set_text("a".repeat(MAX_BODY_CHARS)));
        assert_eq!(draft.remaining(), 0);

        assert!(!draft.set_text("b".repeat(MAX_BODY_CHARS + 1)));
        assert_eq!(draft.text(), "a".repeat(MAX_BODY_CHARS));
    }

    #[test]
    fn test_typing_past_limit_is_rejected() {
        let mut draft = Draft::new();
        let accepted = "a"
            .repeat(MAX_BODY_CHARS + 1)
            .chars()
            .map(|c| draft.push_char(c))
            .collect::<Vec<_>>();

        assert!(accepted[..MAX_BODY_CHARS].iter().all(|ok| *ok));
        assert!(!accepted[MAX_BODY_CHARS]);
        assert_eq!(draft.text().chars().count(), MAX_BODY_CHARS);
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        let mut draft = Draft::new();
        assert!(draft.set_text("é".repeat(MAX_BODY_CHARS)));
        assert_eq!(draft.remaining(), 0);
    }

    #[test]
    fn test_has_content() {
        let mut draft = Draft::new();
        assert!(!draft.has_content());

        draft.set_text("  \n ");
        assert!(!draft.has_content());

        draft.select_attachment(Attachment::new("photo.png", vec![1, 2, 3]), None);
        assert!(draft.has_content());
    }

    #[test]
    fn test_clear_resets_everything_but_flight() {
        let mut draft = Draft::new();
        draft.set_text("hello");
        draft.select_attachment(
            Attachment::new("photo.PNG", vec![0]),
            Some("/tmp/photo.PNG".into()),
        );
        draft.set_in_flight(true);

        draft.clear();

        assert_eq!(draft.text(), "");
        assert!(draft.attachment().is_none());
        assert!(draft.preview().is_none());
        assert!(draft.is_in_flight());
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(Attachment::new("a.PNG", vec![]).content_type, "image/png");
        assert_eq!(Attachment::new("a.jpeg", vec![]).content_type, "image/jpeg");
        assert_eq!(
            Attachment::new("README", vec![]).content_type,
            "application/octet-stream"
        );
    }
}
