use std::collections::HashMap;

use sea_orm::*;
use uuid::Uuid;

use crate::models::profiles::{self, CreateDj, CreateProfileFromAuth, DjFields, Roles};

/// Find the caller's profile, creating it from Supabase Auth JWT claims on first sight.
pub async fn find_or_create_from_auth(
    db: &DatabaseConnection,
    input: CreateProfileFromAuth,
) -> Result<profiles::Model, DbErr> {
    if let Some(existing) = profiles::Entity::find_by_id(input.id).one(db).await? {
        return Ok(existing);
    }

    let new_profile = profiles::ActiveModel {
        id: Set(input.id),
        email: Set(input.email),
        full_name: Set(input.full_name),
        role: Set(input.role),
        avatar_url: Set(input.avatar_url),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_profile.insert(db).await
}

/// Insert a bare profile row. Used inside the producer-creation transaction.
pub async fn insert_profile<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    email: String,
    full_name: Option<String>,
    phone: Option<String>,
    role: Roles,
) -> Result<profiles::Model, DbErr> {
    profiles::ActiveModel {
        id: Set(id),
        email: Set(email),
        full_name: Set(full_name),
        phone: Set(phone),
        role: Set(role),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
}

pub async fn get_profile_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<profiles::Model>, DbErr> {
    profiles::Entity::find_by_id(id).one(conn).await
}

/// Batch-load profiles by id.
pub async fn get_profiles_by_ids<C: ConnectionTrait>(
    conn: &C,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, profiles::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(profiles::Entity::find()
        .filter(profiles::Column::Id.is_in(ids.to_vec()))
        .all(conn)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect())
}

/// All DJ profiles, ordered by artist name.
pub async fn list_djs(db: &DatabaseConnection) -> Result<Vec<profiles::Model>, DbErr> {
    profiles::Entity::find()
        .filter(profiles::Column::Role.eq(Roles::Dj))
        .order_by_asc(profiles::Column::ArtistName)
        .order_by_asc(profiles::Column::FullName)
        .all(db)
        .await
}

/// Fetch a profile only if it belongs to a DJ.
pub async fn get_dj(db: &DatabaseConnection, id: Uuid) -> Result<Option<profiles::Model>, DbErr> {
    profiles::Entity::find_by_id(id)
        .filter(profiles::Column::Role.eq(Roles::Dj))
        .one(db)
        .await
}

pub async fn insert_dj(db: &DatabaseConnection, input: CreateDj) -> Result<profiles::Model, DbErr> {
    let mut active = profiles::ActiveModel {
        id: Set(input.id.unwrap_or_else(Uuid::new_v4)),
        email: Set(input.email),
        role: Set(Roles::Dj),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    apply_dj_fields(&mut active, input.fields);

    active.insert(db).await
}

/// Update a DJ's artist data. Absent fields are left untouched.
pub async fn update_dj(
    db: &DatabaseConnection,
    id: Uuid,
    input: DjFields,
) -> Result<profiles::Model, DbErr> {
    let dj = get_dj(db, id)
        .await?
        .ok_or(DbErr::RecordNotFound("DJ not found".to_string()))?;

    let mut active: profiles::ActiveModel = dj.into();
    apply_dj_fields(&mut active, input);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Update name and phone on any profile. Used by producer updates.
pub async fn update_contact<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    full_name: Option<String>,
    phone: Option<String>,
) -> Result<Option<profiles::Model>, DbErr> {
    let Some(profile) = profiles::Entity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };
    if full_name.is_none() && phone.is_none() {
        return Ok(Some(profile));
    }

    let mut active: profiles::ActiveModel = profile.into();
    if let Some(full_name) = full_name {
        active.full_name = Set(Some(full_name));
    }
    if let Some(phone) = phone {
        active.phone = Set(Some(phone));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(conn).await.map(Some)
}

pub async fn set_avatar_url(
    db: &DatabaseConnection,
    id: Uuid,
    url: String,
) -> Result<profiles::Model, DbErr> {
    let profile = profiles::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Profile not found".to_string()))?;

    let mut active: profiles::ActiveModel = profile.into();
    active.avatar_url = Set(Some(url));
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

pub async fn delete_profile<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<DeleteResult, DbErr> {
    profiles::Entity::delete_by_id(id).exec(conn).await
}

pub async fn count_by_role(db: &DatabaseConnection, role: Roles) -> Result<u64, DbErr> {
    profiles::Entity::find()
        .filter(profiles::Column::Role.eq(role))
        .count(db)
        .await
}

fn apply_dj_fields(active: &mut profiles::ActiveModel, input: DjFields) {
    if let Some(v) = input.full_name {
        active.full_name = Set(Some(v));
    }
    if let Some(v) = input.artist_name {
        active.artist_name = Set(Some(v));
    }
    if let Some(v) = input.real_name {
        active.real_name = Set(Some(v));
    }
    if let Some(v) = input.phone {
        active.phone = Set(Some(v));
    }
    if let Some(v) = input.genre {
        active.genre = Set(Some(v));
    }
    if let Some(v) = input.bio {
        active.bio = Set(Some(v));
    }
    if let Some(v) = input.base_price {
        active.base_price = Set(Some(v.max(0.0)));
    }
    if let Some(v) = input.instagram_url {
        active.instagram_url = Set(Some(v));
    }
    if let Some(v) = input.soundcloud_url {
        active.soundcloud_url = Set(Some(v));
    }
    if let Some(v) = input.youtube_url {
        active.youtube_url = Set(Some(v));
    }
    if let Some(v) = input.tiktok_url {
        active.tiktok_url = Set(Some(v));
    }
    if let Some(v) = input.location {
        active.location = Set(Some(v));
    }
    if let Some(v) = input.pix_key {
        active.pix_key = Set(Some(v));
    }
    if let Some(v) = input.cpf {
        active.cpf = Set(Some(v));
    }
    if let Some(v) = input.birth_date {
        active.birth_date = Set(Some(v));
    }
    if let Some(v) = input.status {
        active.status = Set(Some(v));
    }
}
