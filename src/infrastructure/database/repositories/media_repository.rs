use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, update_err, write_err};
use crate::domain::{ContentRepository, DomainResult, MediaAsset, MediaFilter, MediaType};
use crate::infrastructure::database::entities::media;
use crate::shared::{PageRequest, PaginatedResult};

pub struct SeaOrmMediaRepository {
    db: DatabaseConnection,
}

impl SeaOrmMediaRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn type_to_domain(media_type: media::MediaType) -> MediaType {
    match media_type {
        media::MediaType::Image => MediaType::Image,
        media::MediaType::Document => MediaType::Document,
        media::MediaType::Video => MediaType::Video,
        media::MediaType::Other => MediaType::Other,
    }
}

fn type_to_entity(media_type: MediaType) -> media::MediaType {
    match media_type {
        MediaType::Image => media::MediaType::Image,
        MediaType::Document => media::MediaType::Document,
        MediaType::Video => media::MediaType::Video,
        MediaType::Other => media::MediaType::Other,
    }
}

fn media_model_to_domain(model: media::Model) -> MediaAsset {
    MediaAsset {
        id: model.id,
        filename: model.filename,
        original_name: model.original_name,
        path: model.path,
        mime_type: model.mime_type,
        size: u64::try_from(model.size).unwrap_or_default(),
        media_type: type_to_domain(model.media_type),
        description: model.description,
        uploaded_by: model.uploaded_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn media_to_active(asset: MediaAsset) -> media::ActiveModel {
    media::ActiveModel {
        id: Set(asset.id),
        filename: Set(asset.filename),
        original_name: Set(asset.original_name),
        path: Set(asset.path),
        mime_type: Set(asset.mime_type),
        size: Set(i64::try_from(asset.size).unwrap_or(i64::MAX)),
        media_type: Set(type_to_entity(asset.media_type)),
        description: Set(asset.description),
        uploaded_by: Set(asset.uploaded_by),
        created_at: Set(asset.created_at),
        updated_at: Set(asset.updated_at),
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl ContentRepository<MediaAsset> for SeaOrmMediaRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<MediaAsset>> {
        let model = media::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(media_model_to_domain))
    }

    async fn list(
        &self,
        filter: &MediaFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<MediaAsset>> {
        let mut query = media::Entity::find();

        if let Some(media_type) = filter.media_type {
            query = query.filter(media::Column::MediaType.eq(type_to_entity(media_type)));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        let models = query
            .order_by_desc(media::Column::CreatedAt)
            .order_by_asc(media::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models.into_iter().map(media_model_to_domain).collect();
        Ok(PaginatedResult::new(items, total, page))
    }

    async fn insert(&self, asset: MediaAsset) -> DomainResult<MediaAsset> {
        let model = media_to_active(asset)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, "A media record for this file already exists"))?;

        Ok(media_model_to_domain(model))
    }

    async fn update(&self, asset: MediaAsset) -> DomainResult<MediaAsset> {
        let id = asset.id.clone();
        let model = media_to_active(asset)
            .update(&self.db)
            .await
            .map_err(|e| update_err(e, "Media", &id))?;

        Ok(media_model_to_domain(model))
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let result = media::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> DomainResult<u64> {
        media::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
