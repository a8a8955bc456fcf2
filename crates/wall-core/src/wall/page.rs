//! Presentation model of the wall page.
//!
//! Built from the view state on every render. The real feed and the
//! placeholder entries only meet here.

use chrono::{DateTime, Utc};

use super::compose::ComposeState;
use super::relative_time::distance_in_words;
use crate::domain::{Draft, Feed, Identity, PlaceholderFeed, PostId};

pub const PAGE_TITLE: &str = "wall";
pub const COMPOSE_PLACEHOLDER: &str = "What's on your mind?";

/// Everything needed to draw the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub title: &'static str,
    pub profile: ProfilePanel,
    pub compose: ComposeForm,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePanel {
    pub name: String,
    pub avatar: String,
    pub section: String,
    pub networks: String,
    pub current_city: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposeForm {
    pub text: String,
    pub placeholder: &'static str,
    pub remaining: usize,
    pub preview: Option<String>,
    pub submit: SubmitButton,
}

impl ComposeForm {
    pub fn remaining_label(&self) -> String {
        format!("{} characters remaining", self.remaining)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    pub label: &'static str,
    pub enabled: bool,
}

/// Where an entry came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKey {
    Post(PostId),
    Sample(usize),
}

/// One read-only block of the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: EntryKey,
    pub author: String,
    pub when: String,
    pub body: String,
    pub image_url: Option<String>,
}

pub(crate) struct PageInputs<'a> {
    pub identity: &'a Identity,
    pub draft: &'a Draft,
    pub state: ComposeState,
    pub feed: &'a Feed,
    pub placeholders: &'a PlaceholderFeed,
}

pub(crate) fn build(inputs: PageInputs<'_>, now: DateTime<Utc>) -> Page {
    let PageInputs {
        identity,
        draft,
        state,
        feed,
        placeholders,
    } = inputs;

    let busy = state == ComposeState::Busy;
    let submit = SubmitButton {
        label: if busy { "Posting..." } else { "Share" },
        enabled: !busy && draft.has_content(),
    };

    let live = feed.iter().map(|post| Entry {
        key: EntryKey::Post(post.id.clone()),
        author: identity.name.clone(),
        when: distance_in_words(post.created_at, now),
        body: post.body.clone(),
        image_url: post.image_url.clone(),
    });
    let samples = placeholders.iter().enumerate().map(|(i, sample)| Entry {
        key: EntryKey::Sample(i),
        author: sample.name.to_string(),
        when: sample.time.to_string(),
        body: sample.message.to_string(),
        image_url: None,
    });

    Page {
        title: PAGE_TITLE,
        profile: ProfilePanel {
            name: identity.name.clone(),
            avatar: identity.avatar.clone(),
            section: identity.section.clone(),
            networks: identity.networks.clone(),
            current_city: identity.current_city.clone(),
        },
        compose: ComposeForm {
            text: draft.text().to_string(),
            placeholder: COMPOSE_PLACEHOLDER,
            remaining: draft.remaining(),
            preview: draft.preview().map(str::to_string),
            submit,
        },
        entries: live.chain(samples).collect(),
    }
}
