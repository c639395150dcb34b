use sea_orm::*;
use uuid::Uuid;

use crate::models::contract_templates::{self, CreateTemplate, DJ_SERVICE_TEMPLATE, UpdateTemplate};

pub async fn list_templates(db: &DatabaseConnection) -> Result<Vec<contract_templates::Model>, DbErr> {
    contract_templates::Entity::find()
        .order_by_asc(contract_templates::Column::Name)
        .all(db)
        .await
}

/// The most recently edited template of a type, if one exists.
pub async fn latest_of_type<C: ConnectionTrait>(
    conn: &C,
    template_type: &str,
) -> Result<Option<contract_templates::Model>, DbErr> {
    contract_templates::Entity::find()
        .filter(contract_templates::Column::TemplateType.eq(template_type))
        .order_by_desc(contract_templates::Column::UpdatedAt)
        .order_by_desc(contract_templates::Column::CreatedAt)
        .one(conn)
        .await
}

pub async fn insert_template(
    db: &DatabaseConnection,
    input: CreateTemplate,
) -> Result<contract_templates::Model, DbErr> {
    let template = contract_templates::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        template_type: Set(input
            .template_type
            .unwrap_or_else(|| DJ_SERVICE_TEMPLATE.to_string())),
        content: Set(input.content),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    template.insert(db).await
}

pub async fn update_template(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateTemplate,
) -> Result<contract_templates::Model, DbErr> {
    let template = contract_templates::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Contract template not found".to_string()))?;

    let mut active: contract_templates::ActiveModel = template.into();
    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(template_type) = input.template_type {
        active.template_type = Set(template_type);
    }
    if let Some(content) = input.content {
        active.content = Set(content);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}
