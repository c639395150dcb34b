use sea_orm::*;
use uuid::Uuid;

use crate::models::media_files;

pub async fn list_for_dj(
    db: &DatabaseConnection,
    dj_id: Uuid,
) -> Result<Vec<media_files::Model>, DbErr> {
    media_files::Entity::find()
        .filter(media_files::Column::DjId.eq(dj_id))
        .order_by_desc(media_files::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn insert_media(
    db: &DatabaseConnection,
    dj_id: Uuid,
    file_name: String,
    file_url: String,
    file_type: String,
    file_size: i64,
) -> Result<media_files::Model, DbErr> {
    media_files::ActiveModel {
        id: Set(Uuid::new_v4()),
        dj_id: Set(dj_id),
        file_name: Set(file_name),
        file_url: Set(file_url),
        file_type: Set(file_type),
        file_size: Set(Some(file_size)),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(db)
    .await
}

pub async fn get_media_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<media_files::Model>, DbErr> {
    media_files::Entity::find_by_id(id).one(db).await
}

pub async fn delete_media(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    media_files::Entity::delete_by_id(id).exec(db).await
}
