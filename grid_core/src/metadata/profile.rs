use serde::{Deserialize, Serialize};

/// A profile document as the registry serves it (LSP3 layout).
///
/// ```json
/// { "LSP3Profile": { "name": "alice",
///                    "profileImage": [{ "url": "ipfs://Qm…", "width": 640 }],
///                    "backgroundImage": [] } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(rename = "LSP3Profile", default)]
    pub profile: ProfileMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile_image: Vec<ImageEntry>,
    #[serde(default)]
    pub background_image: Vec<ImageEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageEntry {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// What the UI renders for a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub display_name: String,
    pub avatar_url: String,
    pub background_url: String,
}

/// Values used for any field a document leaves out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileDefaults {
    pub display_name: String,
    pub avatar_url: String,
    pub background_url: String,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            display_name: "Anonymous".to_string(),
            avatar_url: String::new(),
            background_url: String::new(),
        }
    }
}

impl From<&ProfileDefaults> for ProfileRecord {
    fn from(defaults: &ProfileDefaults) -> Self {
        Self {
            display_name: defaults.display_name.clone(),
            avatar_url: defaults.avatar_url.clone(),
            background_url: defaults.background_url.clone(),
        }
    }
}

/// Rewrite an `ipfs://` reference to `<gateway><cid/path>`. Anything else is
/// returned untouched.
pub fn resolve_ipfs_url(url: &str, gateway: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("ipfs") => {
            format!("{}{}", gateway, rest)
        }
        _ => url.to_string(),
    }
}

fn first_url(images: &[ImageEntry]) -> Option<&str> {
    images
        .iter()
        .filter_map(|image| image.url.as_deref())
        .find(|url| !url.trim().is_empty())
}

impl ProfileRecord {
    /// Build a record from a fetched document, rewriting image references
    /// through `gateway` and filling gaps from `defaults`.
    pub fn from_document(doc: &ProfileDocument, gateway: &str, defaults: &ProfileDefaults) -> Self {
        let meta = &doc.profile;
        let display_name = meta
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| defaults.display_name.clone(), str::to_string);
        let avatar_url = first_url(&meta.profile_image)
            .map_or_else(|| defaults.avatar_url.clone(), |u| resolve_ipfs_url(u, gateway));
        let background_url = first_url(&meta.background_image)
            .map_or_else(|| defaults.background_url.clone(), |u| resolve_ipfs_url(u, gateway));
        Self {
            display_name,
            avatar_url,
            background_url,
        }
    }
}
