//! Listings ("stays") and the payloads used to create and edit them.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;
use super::validation::FieldError;

/// Stable listing identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(Uuid);

impl ListingId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for ListingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A lodging listing.
///
/// ## Invariants
/// - `name`, `description`, and `location` are trimmed and non-empty.
/// - `tags` hold no blanks and no duplicates.
/// - `id`, `slug`, `author`, and `created` never change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    id: ListingId,
    name: String,
    slug: String,
    author: UserId,
    description: String,
    tags: Vec<String>,
    location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    photo: Option<String>,
    created: DateTime<Utc>,
}

/// Values fixed when a listing is first stored.
#[derive(Debug, Clone)]
pub struct ListingIdentity {
    pub id: ListingId,
    pub slug: String,
    pub author: UserId,
    pub created: DateTime<Utc>,
}

impl Listing {
    /// Build a listing from a draft that already passed
    /// [`validate_listing_draft`]. Text fields are trimmed and tags
    /// normalised here.
    pub fn from_draft(identity: ListingIdentity, draft: &ListingDraft) -> Self {
        Self {
            id: identity.id,
            name: draft.name.trim().to_owned(),
            slug: identity.slug,
            author: identity.author,
            description: draft.description.trim().to_owned(),
            tags: normalize_tags(&draft.tags),
            location: draft.location.trim().to_owned(),
            photo: normalize_photo(draft.photo.as_deref()),
            created: identity.created,
        }
    }

    /// Rehydrate a listing loaded from storage.
    #[expect(clippy::too_many_arguments, reason = "mirrors the stored row")]
    pub fn from_parts(
        id: ListingId,
        name: String,
        slug: String,
        author: UserId,
        description: String,
        tags: Vec<String>,
        location: String,
        photo: Option<String>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            slug,
            author,
            description,
            tags,
            location,
            photo,
            created,
        }
    }

    pub fn id(&self) -> ListingId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn slug(&self) -> &str {
        self.slug.as_str()
    }

    pub fn author(&self) -> UserId {
        self.author
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn location(&self) -> &str {
        self.location.as_str()
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Whether any tag equals `tag` exactly.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }

    /// Apply a validated patch in place. Identity fields are untouched.
    pub fn apply(&mut self, patch: &ListingPatch) {
        if let Some(name) = patch.name.as_deref() {
            self.name = name.trim().to_owned();
        }
        if let Some(description) = patch.description.as_deref() {
            self.description = description.trim().to_owned();
        }
        if let Some(tags) = patch.tags.as_deref() {
            self.tags = normalize_tags(tags);
        }
        if let Some(location) = patch.location.as_deref() {
            self.location = location.trim().to_owned();
        }
        if let Some(photo) = patch.photo.as_deref() {
            self.photo = normalize_photo(Some(photo));
        }
    }
}

/// Raw form submitted to create a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingDraft {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub location: String,
    pub photo: Option<String>,
}

/// Raw form submitted to edit a listing. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub location: Option<String>,
    pub photo: Option<String>,
}

impl ListingPatch {
    /// Copy with text trimmed and tags normalised, ready for storage.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.as_deref().map(|v| v.trim().to_owned()),
            description: self.description.as_deref().map(|v| v.trim().to_owned()),
            tags: self.tags.as_deref().map(normalize_tags),
            location: self.location.as_deref().map(|v| v.trim().to_owned()),
            photo: self.photo.clone(),
        }
    }
}

const NAME_REQUIRED: &str = "Please enter a stay name!";
const DESCRIPTION_REQUIRED: &str = "Please enter a description!";
const LOCATION_REQUIRED: &str = "You must supply an address!";

/// Field errors for a create form; empty when the draft is acceptable.
pub fn validate_listing_draft(draft: &ListingDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();
    require("name", &draft.name, NAME_REQUIRED, &mut errors);
    require("description", &draft.description, DESCRIPTION_REQUIRED, &mut errors);
    require("location", &draft.location, LOCATION_REQUIRED, &mut errors);
    errors
}

/// Field errors for an edit form. Only supplied fields are checked.
pub fn validate_listing_patch(patch: &ListingPatch) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if let Some(name) = patch.name.as_deref() {
        require("name", name, NAME_REQUIRED, &mut errors);
    }
    if let Some(description) = patch.description.as_deref() {
        require("description", description, DESCRIPTION_REQUIRED, &mut errors);
    }
    if let Some(location) = patch.location.as_deref() {
        require("location", location, LOCATION_REQUIRED, &mut errors);
    }
    errors
}

fn require(field: &str, value: &str, message: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::required(field, message));
    }
}

/// Trim tags, drop blanks, and remove duplicates keeping the first
/// occurrence.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(|tag| tag.as_ref().trim())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.to_string()))
        .map(str::to_owned)
        .collect()
}

fn normalize_photo(photo: Option<&str>) -> Option<String> {
    photo
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
