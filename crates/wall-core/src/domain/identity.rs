/// The static profile shown beside the wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub avatar: String,
    pub section: String,
    pub networks: String,
    pub current_city: String,
}

impl Identity {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: "James Pascua".to_string(),
            avatar: "/my-profile.JPG".to_string(),
            section: "Wall".to_string(),
            networks: "UCU Alumni".to_string(),
            current_city: "Tarlac, PH".to_string(),
        }
    }
}
