use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{db_err, update_err, write_err};
use crate::domain::{ContentRepository, DomainResult, News, NewsCategory, NewsFilter};
use crate::infrastructure::database::entities::news;
use crate::shared::{PageRequest, PaginatedResult};

pub struct SeaOrmNewsRepository {
    db: DatabaseConnection,
}

impl SeaOrmNewsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn category_to_domain(category: news::NewsCategory) -> NewsCategory {
    match category {
        news::NewsCategory::Announcement => NewsCategory::Announcement,
        news::NewsCategory::Event => NewsCategory::Event,
        news::NewsCategory::Performance => NewsCategory::Performance,
        news::NewsCategory::Other => NewsCategory::Other,
    }
}

fn category_to_entity(category: NewsCategory) -> news::NewsCategory {
    match category {
        NewsCategory::Announcement => news::NewsCategory::Announcement,
        NewsCategory::Event => news::NewsCategory::Event,
        NewsCategory::Performance => news::NewsCategory::Performance,
        NewsCategory::Other => news::NewsCategory::Other,
    }
}

fn news_model_to_domain(model: news::Model) -> News {
    News {
        id: model.id,
        title: model.title,
        content: model.content,
        summary: model.summary,
        image: model.image,
        publish_date: model.publish_date,
        is_published: model.is_published,
        category: category_to_domain(model.category),
        created_by: model.created_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn news_to_active(item: News) -> news::ActiveModel {
    news::ActiveModel {
        id: Set(item.id),
        title: Set(item.title),
        content: Set(item.content),
        summary: Set(item.summary),
        image: Set(item.image),
        publish_date: Set(item.publish_date),
        is_published: Set(item.is_published),
        category: Set(category_to_entity(item.category)),
        created_by: Set(item.created_by),
        created_at: Set(item.created_at),
        updated_at: Set(item.updated_at),
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl ContentRepository<News> for SeaOrmNewsRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<News>> {
        let model = news::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(news_model_to_domain))
    }

    async fn list(&self, filter: &NewsFilter, page: PageRequest) -> DomainResult<PaginatedResult<News>> {
        let mut query = news::Entity::find();

        if let Some(category) = filter.category {
            query = query.filter(news::Column::Category.eq(category_to_entity(category)));
        }
        if let Some(is_published) = filter.is_published {
            query = query.filter(news::Column::IsPublished.eq(is_published));
        }
        if let Some(ref path) = filter.references {
            query = query.filter(
                Condition::any()
                    .add(news::Column::Image.eq(path.as_str()))
                    .add(news::Column::Content.contains(path.as_str())),
            );
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_desc(news::Column::PublishDate)
            .order_by_asc(news::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models.into_iter().map(news_model_to_domain).collect();
        Ok(PaginatedResult::new(items, total, page))
    }

    async fn insert(&self, item: News) -> DomainResult<News> {
        let model = news_to_active(item)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, "News item already exists"))?;

        Ok(news_model_to_domain(model))
    }

    async fn update(&self, item: News) -> DomainResult<News> {
        let id = item.id.clone();
        let model = news_to_active(item)
            .update(&self.db)
            .await
            .map_err(|e| update_err(e, "News", &id))?;

        Ok(news_model_to_domain(model))
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let result = news::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> DomainResult<u64> {
        news::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
