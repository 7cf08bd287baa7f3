//! `reviews list` and `reviews get` against the Google Play Developer API.

use super::validate_package;
use crate::client::ApiClient;
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::pagination::{accumulate, Deadline, Page, PageRequest, PageSource, PaginationOptions};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

pub const SERVICE: &str = "androidpublisher";

/// Upstream ceiling for `maxResults` on reviews.list.
pub const REVIEWS_MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct ReviewsList {
    pub package: String,
    pub translation_language: Option<String>,
}

impl ReviewsList {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_package(&self.package)
    }

    pub async fn run(
        &self,
        client: &ApiClient,
        pagination: &PaginationOptions,
        deadline: &Deadline,
    ) -> Result<Envelope, ApiError> {
        let mut warnings = Vec::new();
        let mut options = pagination.clone();
        if let Some(size) = options.page_size {
            if size > REVIEWS_MAX_PAGE_SIZE {
                warnings.push(format!(
                    "page size {} exceeds the reviews maximum of {}; using {}",
                    size, REVIEWS_MAX_PAGE_SIZE, REVIEWS_MAX_PAGE_SIZE
                ));
                options.page_size = Some(REVIEWS_MAX_PAGE_SIZE);
            }
        }

        let source = ReviewPages {
            client,
            package: self.package.trim(),
            translation_language: self.translation_language.as_deref(),
        };
        let mut accumulated = accumulate(&source, &options, deadline).await?;
        info!(
            package = %self.package,
            reviews = accumulated.items.len(),
            pages = accumulated.pages,
            "Listed reviews"
        );

        let items = std::mem::take(&mut accumulated.items);
        let envelope = Envelope::new(Value::Array(items))
            .with_services([SERVICE])
            .with_warnings(warnings);
        Ok(accumulated.annotate(envelope))
    }
}

struct ReviewPages<'a> {
    client: &'a ApiClient,
    package: &'a str,
    translation_language: Option<&'a str>,
}

#[async_trait]
impl<'a> PageSource for ReviewPages<'a> {
    type Item = Value;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Value>, ApiError> {
        let url = self
            .client
            .publisher_url(&format!("applications/{}/reviews", self.package));
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(size) = request.page_size {
            query.push(("maxResults", size.to_string()));
        }
        if !request.page_token.is_empty() {
            query.push(("token", request.page_token.clone()));
        }
        if let Some(language) = self.translation_language {
            query.push(("translationLanguage", language.to_string()));
        }

        let body = self.client.get_json(&url, &query).await?;
        Ok(parse_reviews_page(body))
    }
}

fn parse_reviews_page(mut body: Value) -> Page<Value> {
    let next_token = body
        .pointer("/tokenPagination/nextPageToken")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let items = match body.get_mut("reviews").map(Value::take) {
        Some(Value::Array(reviews)) => reviews,
        _ => Vec::new(),
    };
    Page::new(items, next_token)
}

#[derive(Debug, Clone)]
pub struct ReviewsGet {
    pub package: String,
    pub review_id: String,
    pub translation_language: Option<String>,
}

impl ReviewsGet {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_package(&self.package)?;
        let review_id = self.review_id.trim();
        if review_id.is_empty() {
            return Err(ApiError::Validation("--review-id is required".to_string()));
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.');
        if !review_id.chars().all(allowed) || review_id.chars().all(|c| c == '.') {
            return Err(ApiError::Validation(format!(
                "invalid review id '{}': expected letters, digits, '-', '_', ':' or '.'",
                review_id
            )));
        }
        Ok(())
    }

    pub async fn run(&self, client: &ApiClient, deadline: &Deadline) -> Result<Envelope, ApiError> {
        let url = client.publisher_url(&format!(
            "applications/{}/reviews/{}",
            self.package.trim(),
            self.review_id.trim()
        ));
        let query: Vec<(&str, String)> = self
            .translation_language
            .iter()
            .map(|language| ("translationLanguage", language.clone()))
            .collect();
        let review = deadline.run(client.get_json(&url, &query)).await?;
        Ok(Envelope::new(review).with_services([SERVICE]))
    }
}
