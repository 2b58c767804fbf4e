use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub name: String,
    pub price: f64,
    pub link: String,
    pub year: Option<String>,
    pub gama_de_produse: Option<String>,
    pub volume: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Field set accepted for a new row; identifier and timestamps are assigned here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub name: String,
    pub price: f64,
    pub link: String,
    pub year: Option<String>,
    pub gama_de_produse: Option<String>,
    pub volume: Option<String>,
}

pub fn validate_title(s: &str) -> Result<(), errors::ModelError> {
    if s.trim().is_empty() {
        return Err(errors::ModelError::Validation("title required".into()));
    }
    Ok(())
}

pub fn validate_name(s: &str) -> Result<(), errors::ModelError> {
    if s.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    Ok(())
}

pub fn validate_link(s: &str) -> Result<(), errors::ModelError> {
    if s.trim().is_empty() {
        return Err(errors::ModelError::Validation("link required".into()));
    }
    Ok(())
}

pub fn validate(new: &NewProduct) -> Result<(), errors::ModelError> {
    validate_title(&new.title)?;
    validate_name(&new.name)?;
    validate_link(&new.link)?;
    Ok(())
}

/// Build an insertable row with both timestamps set to `now`.
/// Caller is responsible for prior validation; used by single create and bulk import.
pub fn active_model(new: NewProduct, now: DateTimeWithTimeZone) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        title: Set(new.title),
        name: Set(new.name),
        price: Set(new.price),
        link: Set(new.link),
        year: Set(new.year),
        gama_de_produse: Set(new.gama_de_produse),
        volume: Set(new.volume),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

pub async fn create(db: &DatabaseConnection, new: NewProduct) -> Result<Model, errors::ModelError> {
    validate(&new)?;
    let now = Utc::now().into();
    let am = active_model(new, now);
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn hard_delete(db: &DatabaseConnection, id: i32) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}
