use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};

use models::product::{self, Entity as ProductEntity, NewProduct};

use crate::domain::UpdateProductInput;
use crate::errors::ServiceError;
use crate::pagination::PageParams;

/// List one page of products in primary-key order.
pub async fn list_products(
    db: &DatabaseConnection,
    page: PageParams,
) -> Result<Vec<product::Model>, ServiceError> {
    let (offset, limit) = page.normalize();
    let rows = ProductEntity::find()
        .order_by_asc(product::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows)
}

/// Create a product after validation.
pub async fn create_product(
    db: &DatabaseConnection,
    new: NewProduct,
) -> Result<product::Model, ServiceError> {
    // field validations are in models::product
    let created = product::create(db, new).await?;
    Ok(created)
}

/// Get a product by id.
pub async fn get_product(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<product::Model>, ServiceError> {
    let found = ProductEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

/// Apply a sparse update: only supplied fields change, absent keys are left
/// untouched. `updated_at` is refreshed regardless of which fields changed.
pub async fn update_product(
    db: &DatabaseConnection,
    id: i32,
    input: UpdateProductInput,
) -> Result<product::Model, ServiceError> {
    let current = ProductEntity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    let Some(existing) = current else { return Err(ServiceError::not_found("product")); };
    let mut am: product::ActiveModel = existing.into();
    if let Some(t) = input.title {
        product::validate_title(&t)?;
        am.title = Set(t);
    }
    if let Some(n) = input.name {
        product::validate_name(&n)?;
        am.name = Set(n);
    }
    if let Some(p) = input.price {
        am.price = Set(p);
    }
    if let Some(l) = input.link {
        product::validate_link(&l)?;
        am.link = Set(l);
    }
    if let Some(y) = input.year {
        am.year = Set(Some(y));
    }
    if let Some(g) = input.gama_de_produse {
        am.gama_de_produse = Set(Some(g));
    }
    if let Some(v) = input.volume {
        am.volume = Set(Some(v));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Delete a product; returns true if a row was removed.
pub async fn delete_product(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let deleted = product::hard_delete(db, id).await?;
    Ok(deleted)
}
