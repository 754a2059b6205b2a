use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::menu::{CategoryCreateRequest, ItemCreateRequest},
    models::menu::{MenuCategory, MenuItem},
};

pub async fn get_categories<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
) -> Res<Vec<MenuCategory>> {
    sqlx::query_as::<_, MenuCategory>(
        "SELECT * FROM menu_categories WHERE restaurant_id = $1 ORDER BY position, created_at",
    )
    .bind(restaurant_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

/// All items of the restaurant's menu, ordered by position inside their
/// category.
pub async fn get_items_by_restaurant<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
) -> Res<Vec<MenuItem>> {
    sqlx::query_as::<_, MenuItem>(
        r#"
        SELECT i.*
        FROM menu_items i
        JOIN menu_categories c ON c.id = i.category_id
        WHERE c.restaurant_id = $1
        ORDER BY i.category_id, i.position, i.created_at
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn exists_category<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
    category_id: Uuid,
) -> Res<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM menu_categories WHERE id = $1 AND restaurant_id = $2)",
    )
    .bind(category_id)
    .bind(restaurant_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// New categories go to the end of the list.
pub async fn insert_category<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: CategoryCreateRequest,
) -> Res<MenuCategory> {
    sqlx::query_as::<_, MenuCategory>(
        r#"
        INSERT INTO menu_categories (restaurant_id, name, description, position)
        VALUES ($1, $2, $3, (SELECT COUNT(*) FROM menu_categories WHERE restaurant_id = $1))
        RETURNING *
        "#,
    )
    .bind(data.restaurant_id)
    .bind(data.name)
    .bind(data.description)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_category<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
    category_id: Uuid,
    name: &str,
    description: &str,
) -> Res<Option<MenuCategory>> {
    sqlx::query_as::<_, MenuCategory>(
        r#"
        UPDATE menu_categories SET name = $3, description = $4
        WHERE id = $1 AND restaurant_id = $2
        RETURNING *
        "#,
    )
    .bind(category_id)
    .bind(restaurant_id)
    .bind(name)
    .bind(description)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_category<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
    category_id: Uuid,
) -> Res<u64> {
    sqlx::query("DELETE FROM menu_categories WHERE id = $1 AND restaurant_id = $2")
        .bind(category_id)
        .bind(restaurant_id)
        .execute(executor)
        .await
        .map(|res| res.rows_affected())
        .map_err(AppError::from)
}

/// Writes `positions[i]` to the category `ids[i]`. Only rows owned by the
/// restaurant are touched; the caller compares the returned count.
pub async fn set_category_positions<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
    ids: &[Uuid],
    positions: &[i32],
) -> Res<u64> {
    sqlx::query(
        r#"
        UPDATE menu_categories AS c
        SET position = v.position
        FROM UNNEST($2::uuid[], $3::int4[]) AS v(id, position)
        WHERE c.id = v.id AND c.restaurant_id = $1
        "#,
    )
    .bind(restaurant_id)
    .bind(ids)
    .bind(positions)
    .execute(executor)
    .await
    .map(|res| res.rows_affected())
    .map_err(AppError::from)
}

pub async fn insert_item<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: ItemCreateRequest,
) -> Res<MenuItem> {
    sqlx::query_as::<_, MenuItem>(
        r#"
        INSERT INTO menu_items (category_id, name, description, price, position)
        VALUES ($1, $2, $3, $4, (SELECT COUNT(*) FROM menu_items WHERE category_id = $1))
        RETURNING *
        "#,
    )
    .bind(data.category_id)
    .bind(data.name)
    .bind(data.description)
    .bind(data.price)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_item<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    restaurant_id: Uuid,
    item_id: Uuid,
) -> Res<u64> {
    sqlx::query(
        r#"
        DELETE FROM menu_items i
        USING menu_categories c
        WHERE i.id = $1 AND i.category_id = c.id AND c.restaurant_id = $2
        "#,
    )
    .bind(item_id)
    .bind(restaurant_id)
    .execute(executor)
    .await
    .map(|res| res.rows_affected())
    .map_err(AppError::from)
}

/// Same contract as [`set_category_positions`], scoped to one category.
pub async fn set_item_positions<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    category_id: Uuid,
    ids: &[Uuid],
    positions: &[i32],
) -> Res<u64> {
    sqlx::query(
        r#"
        UPDATE menu_items AS i
        SET position = v.position
        FROM UNNEST($2::uuid[], $3::int4[]) AS v(id, position)
        WHERE i.id = v.id AND i.category_id = $1
        "#,
    )
    .bind(category_id)
    .bind(ids)
    .bind(positions)
    .execute(executor)
    .await
    .map(|res| res.rows_affected())
    .map_err(AppError::from)
}
