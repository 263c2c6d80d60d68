//! Content item types delivered by the host content store.
//!
//! A content item is a closed tagged union over posts, taxonomy terms and
//! sites. Posts and terms are indexable; sites only describe the tenants of a
//! multi-tenant deployment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a site (blog) in a multi-tenant deployment.
pub type SiteId = u64;

/// Site id used by single-tenant deployments.
pub const DEFAULT_SITE_ID: SiteId = 1;

/// Status of a published post.
pub const STATUS_PUBLISH: &str = "publish";

/// Status of a post that is only visible to authorized readers.
pub const STATUS_PRIVATE: &str = "private";

/// Post statuses that are kept in the search index. Posts in any other
/// status are removed from it.
pub const INDEX_POST_STATUSES: [&str; 2] = [STATUS_PUBLISH, STATUS_PRIVATE];

fn default_site_id() -> SiteId {
    DEFAULT_SITE_ID
}

/// A unit of content from the host system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum ContentItem {
    /// Article-like content (posts, pages, custom post types).
    Post(Post),
    /// A taxonomy term.
    Term(Term),
    /// A site record of a multi-tenant deployment.
    Site(Site),
}

impl ContentItem {
    /// The site this item belongs to.
    pub fn site_id(&self) -> SiteId {
        match self {
            ContentItem::Post(post) => post.site_id,
            ContentItem::Term(term) => term.site_id,
            ContentItem::Site(site) => site.site_id,
        }
    }

    /// The content-kind identifier: post type for posts, taxonomy for terms.
    pub fn kind(&self) -> &str {
        match self {
            ContentItem::Post(post) => &post.post_type,
            ContentItem::Term(term) => &term.taxonomy,
            ContentItem::Site(_) => "site",
        }
    }
}

impl From<Post> for ContentItem {
    fn from(post: Post) -> Self {
        ContentItem::Post(post)
    }
}

impl From<Term> for ContentItem {
    fn from(term: Term) -> Self {
        ContentItem::Term(term)
    }
}

impl From<Site> for ContentItem {
    fn from(site: Site) -> Self {
        ContentItem::Site(site)
    }
}

/// Article-like content.
///
/// # Fields
///
/// - `id`: Identifier of the post within its site
/// - `site_id`: The site the post belongs to
/// - `post_type`: Content-kind identifier (e.g. `post`, `page`, `article`)
/// - `status`: Lifecycle status (`publish`, `draft`, `private`, ...)
/// - `custom_fields`: Raw custom-field values keyed by field name
/// - `terms`: Assigned taxonomy terms keyed by taxonomy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: String,
    #[serde(default = "default_site_id")]
    pub site_id: SiteId,
    pub post_type: String,
    pub status: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub custom_fields: Map<String, Value>,
    #[serde(default)]
    pub terms: BTreeMap<String, Vec<TermRef>>,
}

impl Post {
    /// Create a post on the default site with empty title, content and fields.
    ///
    /// # Example
    ///
    /// ```
    /// use content_index_shared::Post;
    ///
    /// let post = Post::new("42", "article", "publish").with_title("Hello");
    /// assert!(post.is_publishable());
    /// ```
    pub fn new(
        id: impl Into<String>,
        post_type: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            site_id: DEFAULT_SITE_ID,
            post_type: post_type.into(),
            status: status.into(),
            title: String::new(),
            content: String::new(),
            date: None,
            link: None,
            custom_fields: Map::new(),
            terms: BTreeMap::new(),
        }
    }

    pub fn on_site(mut self, site_id: SiteId) -> Self {
        self.site_id = site_id;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Set a raw custom-field value.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.custom_fields.insert(name.into(), value);
        self
    }

    /// Assign a term of the given taxonomy.
    pub fn with_term(mut self, taxonomy: impl Into<String>, term: TermRef) -> Self {
        self.terms.entry(taxonomy.into()).or_default().push(term);
        self
    }

    /// Whether the post's status keeps it in the search index.
    pub fn is_publishable(&self) -> bool {
        INDEX_POST_STATUSES.contains(&self.status.as_str())
    }
}

/// A term assigned to a post, as denormalized into the post's document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermRef {
    pub slug: String,
    pub name: String,
}

impl TermRef {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
        }
    }
}

/// A taxonomy term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Term {
    pub term_id: String,
    #[serde(default = "default_site_id")]
    pub site_id: SiteId,
    pub taxonomy: String,
    pub name: String,
    pub slug: String,
}

impl Term {
    pub fn new(
        term_id: impl Into<String>,
        taxonomy: impl Into<String>,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            term_id: term_id.into(),
            site_id: DEFAULT_SITE_ID,
            taxonomy: taxonomy.into(),
            name: name.into(),
            slug: slug.into(),
        }
    }
}

/// A site of a multi-tenant deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Site {
    pub site_id: SiteId,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub path: String,
}

impl Site {
    pub fn new(site_id: SiteId) -> Self {
        Self {
            site_id,
            domain: String::new(),
            path: "/".to_string(),
        }
    }
}
