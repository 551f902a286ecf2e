//! Category and moderation orchestration

use crate::backend::Backends;
use crate::domain::{Category, CreateCategoryInput, NewCategory, Report};
use crate::error::Result;
use crate::policy;
use validator::Validate;

pub struct CategoryService {
    backends: Backends,
}

impl CategoryService {
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }

    pub async fn list(&self, page: u32, size: u32) -> Result<Vec<Category>> {
        Ok(self.backends.categories.list_categories(page, size).await?)
    }

    pub async fn get(&self, uid: &str) -> Result<Category> {
        Ok(self.backends.categories.get_category_info(uid).await?)
    }

    /// The creator becomes the category administrator
    pub async fn create(&self, actor_uid: &str, input: CreateCategoryInput) -> Result<Category> {
        input.validate()?;
        let category = self
            .backends
            .categories
            .create_category(&NewCategory {
                name: input.name,
                description: input.description,
                user_uid: actor_uid.to_string(),
            })
            .await?;
        Ok(category)
    }

    pub async fn list_reports(
        &self,
        actor_uid: &str,
        category_uid: &str,
        page: u32,
        size: u32,
    ) -> Result<Vec<Report>> {
        policy::require_category_admin(&self.backends, actor_uid, category_uid).await?;
        Ok(self
            .backends
            .categories
            .list_reports(category_uid, page, size)
            .await?)
    }

    pub async fn delete_report(
        &self,
        actor_uid: &str,
        category_uid: &str,
        report_uid: &str,
    ) -> Result<()> {
        policy::require_category_admin(&self.backends, actor_uid, category_uid).await?;
        self.backends.categories.delete_report(report_uid).await?;
        Ok(())
    }
}
