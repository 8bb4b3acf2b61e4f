use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrls {
    pub small: String,
    #[serde(default)]
    pub regular: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photographer {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLinks {
    #[serde(default)]
    pub html: Option<String>,
}

/// A single photo as returned by both the search and the random endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub urls: ImageUrls,
    #[serde(default)]
    pub alt_description: Option<String>,
    #[serde(default)]
    pub user: Option<Photographer>,
    #[serde(default)]
    pub links: Option<ImageLinks>,
}

impl Image {
    pub fn thumbnail_url(&self) -> &str {
        &self.urls.small
    }

    pub fn alt_text(&self) -> &str {
        self.alt_description.as_deref().unwrap_or("")
    }

    pub fn photographer(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.name.as_deref())
    }

    pub fn page_url(&self) -> Option<&str> {
        self.links.as_ref().and_then(|l| l.html.as_deref())
    }
}

/// One page of `/search/photos` results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<Image>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total: Option<u64>,
}
