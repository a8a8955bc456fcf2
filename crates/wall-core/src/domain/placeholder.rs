/// A fixed, non-persisted sample entry shown beneath the real posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePost {
    pub name: &'static str,
    pub time: &'static str,
    pub message: &'static str,
}

const BUILTIN: &[SamplePost] = &[
    SamplePost {
        name: "Sheryl",
        time: "3h ago",
        message: "Hello James! You're doing well. It is soon to be done.",
    },
    SamplePost {
        name: "Carlos",
        time: "2h ago",
        message: "Congrats on your progress! Keep pushing.",
    },
    SamplePost {
        name: "Mika",
        time: "1h ago",
        message: "Just saw your post. Nice work!",
    },
    SamplePost {
        name: "Ryan",
        time: "30m ago",
        message: "Can't wait to see the final result!",
    },
    SamplePost {
        name: "Alyssa",
        time: "15m ago",
        message: "Wow this looks amazing already \u{1F60D}",
    },
    SamplePost {
        name: "Ken",
        time: "10m ago",
        message: "Let me know if you need help testing it!",
    },
    SamplePost {
        name: "Julia",
        time: "5m ago",
        message: "This is shaping up nicely.",
    },
    SamplePost {
        name: "Dave",
        time: "5h ago",
        message: "Proud of you, James!",
    },
];

/// Read-only list of sample entries. Kept apart from the real feed and
/// only merged with it when the page is built.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderFeed {
    entries: &'static [SamplePost],
}

impl PlaceholderFeed {
    pub fn builtin() -> Self {
        Self { entries: BUILTIN }
    }

    pub fn empty() -> Self {
        Self { entries: &[] }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SamplePost> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PlaceholderFeed {
    fn default() -> Self {
        Self::builtin()
    }
}
