//! Plain-text rendering of the page model.

use std::fmt::Write;

use wall_core::wall::Page;

use crate::command::HELP;

const RULE: &str = "----------------------------------------";

pub fn render(page: &Page) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_page(&mut out, page);
    out
}

fn write_page(out: &mut String, page: &Page) -> std::fmt::Result {
    let profile = &page.profile;
    writeln!(out, "== {} ==", page.title)?;
    writeln!(out, "{}  [{}]", profile.name, profile.avatar)?;
    writeln!(out, "{}", profile.section)?;
    writeln!(out, "Networks: {}", profile.networks)?;
    writeln!(out, "Current City: {}", profile.current_city)?;
    writeln!(out, "{RULE}")?;

    let compose = &page.compose;
    if compose.text.is_empty() {
        writeln!(out, "> ({})", compose.placeholder)?;
    } else {
        writeln!(out, "> {}", compose.text)?;
    }
    writeln!(out, "{}", compose.remaining_label())?;
    if let Some(preview) = &compose.preview {
        writeln!(out, "Attached: {preview}")?;
    }
    let state = if compose.submit.enabled { "" } else { " (disabled)" };
    writeln!(out, "[{}]{state}", compose.submit.label)?;
    writeln!(out, "{RULE}")?;

    for entry in &page.entries {
        writeln!(out, "{} - {}", entry.author, entry.when)?;
        writeln!(out, "  {}", entry.body)?;
        if let Some(url) = &entry.image_url {
            writeln!(out, "  [image] {url}")?;
        }
    }

    writeln!(out, "{RULE}")?;
    writeln!(out, "{HELP}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use wall_core::Wall;
    use wall_core::domain::{Attachment, Identity, NewPost};
    use wall_core::ports::PostRepository;
    use wall_infra::InMemoryPostRepository;

    use crate::state::in_memory_backend;

    #[tokio::test]
    async fn test_render_lists_posts_then_samples() {
        let mut backend = in_memory_backend();
        let posts = Arc::new(InMemoryPostRepository::new());
        posts
            .insert(NewPost::new("first!", Some("memory://post-images/1-a.png".into())).unwrap())
            .await
            .unwrap();
        backend.posts = posts;

        let mut wall = Wall::new(backend, Identity::default());
        wall.load_feed().await.unwrap();
        wall.select_attachment(Attachment::new("b.png", vec![1]), Some("./b.png".into()));

        let text = render(&wall.page(Utc::now()));

        assert!(text.starts_with("== wall ==\nJames Pascua"));
        assert!(text.contains("280 characters remaining"));
        assert!(text.contains("Attached: ./b.png"));
        assert!(text.contains("[Share]\n"));
        assert!(text.contains("James Pascua - less than a minute ago\n  first!\n  [image] memory://post-images/1-a.png"));

        let first = text.find("first!").unwrap();
        let sheryl = text.find("Sheryl - 3h ago").unwrap();
        assert!(first < sheryl);
    }
}
