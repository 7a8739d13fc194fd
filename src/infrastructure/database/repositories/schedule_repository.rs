use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, update_err, write_err};
use crate::domain::{ClassLevel, ContentRepository, DomainResult, ScheduleEntry, ScheduleFilter};
use crate::infrastructure::database::entities::schedule;
use crate::shared::{PageRequest, PaginatedResult};

pub struct SeaOrmScheduleRepository {
    db: DatabaseConnection,
}

impl SeaOrmScheduleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn level_to_domain(level: schedule::ClassLevel) -> ClassLevel {
    match level {
        schedule::ClassLevel::Beginner => ClassLevel::Beginner,
        schedule::ClassLevel::Intermediate => ClassLevel::Intermediate,
        schedule::ClassLevel::Advanced => ClassLevel::Advanced,
        schedule::ClassLevel::All => ClassLevel::All,
    }
}

fn level_to_entity(level: ClassLevel) -> schedule::ClassLevel {
    match level {
        ClassLevel::Beginner => schedule::ClassLevel::Beginner,
        ClassLevel::Intermediate => schedule::ClassLevel::Intermediate,
        ClassLevel::Advanced => schedule::ClassLevel::Advanced,
        ClassLevel::All => schedule::ClassLevel::All,
    }
}

fn schedule_model_to_domain(model: schedule::Model) -> ScheduleEntry {
    ScheduleEntry {
        id: model.id,
        title: model.title,
        description: model.description,
        instructor: model.instructor,
        studio: model.studio,
        level: level_to_domain(model.level),
        day_of_week: u8::try_from(model.day_of_week).unwrap_or_default(),
        start_time: model.start_time,
        end_time: model.end_time,
        capacity: u32::try_from(model.capacity).unwrap_or_default(),
        is_active: model.is_active,
        created_by: model.created_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn schedule_to_active(entry: ScheduleEntry) -> schedule::ActiveModel {
    schedule::ActiveModel {
        id: Set(entry.id),
        title: Set(entry.title),
        description: Set(entry.description),
        instructor: Set(entry.instructor),
        studio: Set(entry.studio),
        level: Set(level_to_entity(entry.level)),
        day_of_week: Set(i32::from(entry.day_of_week)),
        start_time: Set(entry.start_time),
        end_time: Set(entry.end_time),
        capacity: Set(i32::try_from(entry.capacity).unwrap_or(i32::MAX)),
        is_active: Set(entry.is_active),
        created_by: Set(entry.created_by),
        created_at: Set(entry.created_at),
        updated_at: Set(entry.updated_at),
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl ContentRepository<ScheduleEntry> for SeaOrmScheduleRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ScheduleEntry>> {
        let model = schedule::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(schedule_model_to_domain))
    }

    async fn list(
        &self,
        filter: &ScheduleFilter,
        page: PageRequest,
    ) -> DomainResult<PaginatedResult<ScheduleEntry>> {
        let mut query = schedule::Entity::find();

        if let Some(day) = filter.day_of_week {
            query = query.filter(schedule::Column::DayOfWeek.eq(i32::from(day)));
        }
        if let Some(ref studio) = filter.studio {
            query = query.filter(schedule::Column::Studio.eq(studio.as_str()));
        }
        if let Some(level) = filter.level {
            query = query.filter(schedule::Column::Level.eq(level_to_entity(level)));
        }
        if let Some(ref instructor) = filter.instructor {
            query = query.filter(schedule::Column::Instructor.eq(instructor.as_str()));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(schedule::Column::IsActive.eq(is_active));
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        // Zero-padded HH:MM sorts chronologically as text.
        let models = query
            .order_by_asc(schedule::Column::DayOfWeek)
            .order_by_asc(schedule::Column::StartTime)
            .order_by_asc(schedule::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models.into_iter().map(schedule_model_to_domain).collect();
        Ok(PaginatedResult::new(items, total, page))
    }

    async fn insert(&self, entry: ScheduleEntry) -> DomainResult<ScheduleEntry> {
        let model = schedule_to_active(entry)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, "Schedule entry already exists"))?;

        Ok(schedule_model_to_domain(model))
    }

    async fn update(&self, entry: ScheduleEntry) -> DomainResult<ScheduleEntry> {
        let id = entry.id.clone();
        let model = schedule_to_active(entry)
            .update(&self.db)
            .await
            .map_err(|e| update_err(e, "Schedule", &id))?;

        Ok(schedule_model_to_domain(model))
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let result = schedule::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> DomainResult<u64> {
        schedule::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
