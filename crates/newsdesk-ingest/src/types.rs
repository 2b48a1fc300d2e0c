//! Raw response types for the upstream news APIs.
//!
//! Each source keeps its own field names here; `normalize` maps both onto the
//! canonical [`newsdesk_core::Article`] shape. Author fields are kept as raw
//! JSON values because sources deliver them inconsistently: a list, a single
//! free-text string, a stringified list, or nothing at all.

use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Newsdata.io
// ---------------------------------------------------------------------------

/// Envelope of the Newsdata `latest` endpoint.
#[derive(Debug, Deserialize)]
pub struct NewsdataResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<NewsdataArticle>,
    /// Token for the next page, absent on the last page.
    #[serde(rename = "nextPage")]
    pub next_page: Option<String>,
}

/// One raw article from Newsdata.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsdataArticle {
    pub title: Option<String>,
    /// Article URL, the identity key after normalization.
    pub link: Option<String>,
    pub description: Option<String>,
    pub source_id: Option<String>,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
    pub image_url: Option<String>,
    /// List, string, or absent.
    pub creator: Option<Value>,
}

// ---------------------------------------------------------------------------
// World News API
// ---------------------------------------------------------------------------

/// Envelope of the World News `search-news` endpoint.
#[derive(Debug, Deserialize)]
pub struct WorldNewsResponse {
    #[serde(default)]
    pub news: Vec<WorldNewsArticle>,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub available: i64,
}

/// One raw article from the World News API.
#[derive(Debug, Clone, Deserialize)]
pub struct WorldNewsArticle {
    pub title: Option<String>,
    /// Full article body; doubles as the summary when none is given.
    pub text: Option<String>,
    pub summary: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub publish_date: Option<String>,
    /// List, string, or absent.
    pub authors: Option<Value>,
    pub source_country: Option<String>,
}
