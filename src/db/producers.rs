use std::collections::HashMap;

use sea_orm::*;
use uuid::Uuid;

use crate::db::profiles as profile_db;
use crate::models::producers::{self, CreateProducer, ProducerFields, ProducerView, UpdateProducer};
use crate::models::profiles::Roles;

/// All producers joined with their profiles, sorted by display label.
pub async fn list_producers(db: &DatabaseConnection) -> Result<Vec<ProducerView>, DbErr> {
    let rows = producers::Entity::find().all(db).await?;

    let profile_ids: Vec<Uuid> = rows.iter().map(|p| p.profile_id).collect();
    let profiles = profile_db::get_profiles_by_ids(db, &profile_ids).await?;

    let mut views: Vec<ProducerView> = rows
        .into_iter()
        .map(|p| {
            let profile = profiles.get(&p.profile_id);
            ProducerView::new(p, profile)
        })
        .collect();
    producers::sort_by_label(&mut views);

    Ok(views)
}

pub async fn get_producer<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<ProducerView>, DbErr> {
    let Some(producer) = producers::Entity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };
    let profile = profile_db::get_profile_by_id(conn, producer.profile_id).await?;

    Ok(Some(ProducerView::new(producer, profile.as_ref())))
}

/// The producer record owned by a profile, if any.
pub async fn get_producer_by_profile<C: ConnectionTrait>(
    conn: &C,
    profile_id: Uuid,
) -> Result<Option<producers::Model>, DbErr> {
    producers::Entity::find()
        .filter(producers::Column::ProfileId.eq(profile_id))
        .one(conn)
        .await
}

/// Create the producer's profile and company record in one transaction.
pub async fn create_producer(
    db: &DatabaseConnection,
    input: CreateProducer,
) -> Result<ProducerView, DbErr> {
    let txn = db.begin().await?;

    let profile = profile_db::insert_profile(
        &txn,
        input.id.unwrap_or_else(Uuid::new_v4),
        input.email.clone(),
        input.full_name,
        input.phone,
        Roles::Producer,
    )
    .await?;

    let mut active = producers::ActiveModel {
        id: Set(Uuid::new_v4()),
        profile_id: Set(profile.id),
        email: Set(Some(input.email)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    apply_producer_fields(&mut active, input.fields);
    let producer = active.insert(&txn).await?;

    txn.commit().await?;

    Ok(ProducerView::new(producer, Some(&profile)))
}

pub async fn update_producer(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateProducer,
) -> Result<ProducerView, DbErr> {
    let txn = db.begin().await?;

    let producer = producers::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(DbErr::RecordNotFound("Producer not found".to_string()))?;

    let profile =
        profile_db::update_contact(&txn, producer.profile_id, input.full_name, input.phone).await?;

    let mut active: producers::ActiveModel = producer.into();
    apply_producer_fields(&mut active, input.fields);
    active.updated_at = Set(Some(chrono::Utc::now()));
    let producer = active.update(&txn).await?;

    txn.commit().await?;

    Ok(ProducerView::new(producer, profile.as_ref()))
}

pub async fn set_avatar_url(
    db: &DatabaseConnection,
    id: Uuid,
    url: String,
) -> Result<producers::Model, DbErr> {
    let producer = producers::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Producer not found".to_string()))?;

    let mut active: producers::ActiveModel = producer.into();
    active.avatar_url = Set(Some(url));
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete the producer record and then its profile. Returns the removed profile id.
pub async fn delete_producer(db: &DatabaseConnection, id: Uuid) -> Result<Option<Uuid>, DbErr> {
    let txn = db.begin().await?;

    let Some(producer) = producers::Entity::find_by_id(id).one(&txn).await? else {
        return Ok(None);
    };

    producers::Entity::delete_by_id(producer.id).exec(&txn).await?;
    profile_db::delete_profile(&txn, producer.profile_id).await?;

    txn.commit().await?;

    Ok(Some(producer.profile_id))
}

/// Batch-load producers with their profiles, keyed by producer id.
pub async fn get_producers_by_ids<C: ConnectionTrait>(
    conn: &C,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, ProducerView>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = producers::Entity::find()
        .filter(producers::Column::Id.is_in(ids.to_vec()))
        .all(conn)
        .await?;

    let profile_ids: Vec<Uuid> = rows.iter().map(|p| p.profile_id).collect();
    let profiles = profile_db::get_profiles_by_ids(conn, &profile_ids).await?;

    Ok(rows
        .into_iter()
        .map(|p| {
            let profile = profiles.get(&p.profile_id);
            (p.id, ProducerView::new(p, profile))
        })
        .collect())
}

fn apply_producer_fields(active: &mut producers::ActiveModel, input: ProducerFields) {
    if let Some(v) = input.company_name {
        active.company_name = Set(Some(v));
    }
    if let Some(v) = input.fantasy_name {
        active.fantasy_name = Set(Some(v));
    }
    if let Some(v) = input.contact_person {
        active.contact_person = Set(Some(v));
    }
    if let Some(v) = input.contact_phone {
        active.contact_phone = Set(Some(v));
    }
    if let Some(v) = input.commercial_phone {
        active.commercial_phone = Set(Some(v));
    }
    if let Some(v) = input.cnpj {
        active.cnpj = Set(Some(v));
    }
    if let Some(v) = input.address {
        active.address = Set(Some(v));
    }
    if let Some(v) = input.city {
        active.city = Set(Some(v));
    }
    if let Some(v) = input.state {
        active.state = Set(Some(v));
    }
    if let Some(v) = input.cep {
        active.cep = Set(Some(v));
    }
    if let Some(v) = input.rating {
        active.rating = Set(Some(v.clamp(0.0, 5.0)));
    }
    if let Some(v) = input.admin_notes {
        active.admin_notes = Set(Some(v));
    }
}
