//! Public home page content: read with defaults, upsert on update.

use serde_json::Value;

use crate::{
    db::HomePageRepository,
    models::{home_page::default_content, HomePageContent, UpdateHomePageContentDto},
    Result,
};

#[derive(Clone)]
pub struct HomePageService {
    content: HomePageRepository,
}

impl HomePageService {
    pub fn new(content: HomePageRepository) -> Self {
        Self { content }
    }

    /// The stored content, or the built-in default document when nothing has
    /// been saved yet.
    pub async fn get_content(&self) -> Result<Value> {
        match self.content.find_latest().await? {
            Some(content) => Ok(serde_json::to_value(content)
                .map_err(|e| crate::Error::Internal(e.to_string()))?),
            None => Ok(default_content()),
        }
    }

    pub async fn update_content(&self, dto: UpdateHomePageContentDto) -> Result<HomePageContent> {
        match self.content.find_latest().await? {
            Some(existing) => {
                let updated = self.content.update(existing.id, &dto).await?;
                // The row was just read; a concurrent delete is the only way
                // this can be None.
                updated.ok_or_else(|| {
                    crate::Error::Internal("home page content row disappeared".to_string())
                })
            }
            None => self.content.insert(&dto).await,
        }
    }
}
