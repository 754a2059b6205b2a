use std::collections::HashSet;

use common::error::{AppError, Res};
use db::{
    dtos::menu::{CategoryCreateRequest, ItemCreateRequest},
    models::menu::{MenuCategory, MenuItem},
};
use sqlx::{PgPool, types::BigDecimal};
use uuid::Uuid;

use crate::{
    dtos::menu::{CategoryRequest, CategoryWithItems, ItemRequest},
    ledger::Ledger,
};

/// Positions for a drag-and-drop result: each id gets its index in the
/// submitted list.
pub(crate) fn reindex(ids: &[Uuid]) -> Res<Vec<i32>> {
    let mut seen = HashSet::with_capacity(ids.len());
    if let Some(duplicate) = ids.iter().find(|id| !seen.insert(**id)) {
        return Err(AppError::InvalidArgument(format!(
            "Duplicate id in order: {}",
            duplicate
        )));
    }
    let positions = (0..ids.len())
        .map(i32::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| AppError::InvalidArgument("Too many entries to reorder".to_string()))?;
    Ok(positions)
}

/// Nests items under their categories, keeping the query order of both.
pub(crate) fn group_menu(categories: Vec<MenuCategory>, items: Vec<MenuItem>) -> Vec<CategoryWithItems> {
    let mut menu: Vec<CategoryWithItems> = categories
        .into_iter()
        .map(|category| CategoryWithItems {
            category,
            items: Vec::new(),
        })
        .collect();
    for item in items {
        if let Some(entry) = menu.iter_mut().find(|entry| entry.category.id == item.category_id) {
            entry.items.push(item);
        }
    }
    menu
}

fn required_name(name: &str, what: &str) -> Res<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidArgument(format!("{} name is required", what)));
    }
    Ok(name.to_string())
}

pub(crate) async fn get_menu(pool: &PgPool, restaurant_id: Uuid) -> Res<Vec<CategoryWithItems>> {
    let categories = db::menu::get_categories(pool, restaurant_id).await?;
    let items = db::menu::get_items_by_restaurant(pool, restaurant_id).await?;
    Ok(group_menu(categories, items))
}

pub(crate) async fn create_category(
    pool: &PgPool,
    restaurant_id: Uuid,
    req: CategoryRequest,
) -> Res<MenuCategory> {
    db::menu::insert_category(
        pool,
        CategoryCreateRequest {
            restaurant_id,
            name: required_name(&req.name, "Category")?,
            description: req.description.trim().to_string(),
        },
    )
    .await
}

pub(crate) async fn update_category(
    pool: &PgPool,
    restaurant_id: Uuid,
    category_id: Uuid,
    req: CategoryRequest,
) -> Res<MenuCategory> {
    let name = required_name(&req.name, "Category")?;
    db::menu::update_category(pool, restaurant_id, category_id, &name, req.description.trim())
        .await?
        .ok_or_else(category_not_found)
}

pub(crate) async fn delete_category(pool: &PgPool, restaurant_id: Uuid, category_id: Uuid) -> Res<()> {
    match db::menu::delete_category(pool, restaurant_id, category_id).await? {
        0 => Err(category_not_found()),
        _ => Ok(()),
    }
}

pub(crate) async fn reorder_categories(
    ledger: &dyn Ledger,
    restaurant_id: Uuid,
    ids: &[Uuid],
) -> Res<()> {
    let positions = reindex(ids)?;
    if !ledger
        .set_category_positions(restaurant_id, ids.to_vec(), positions)
        .await?
    {
        return Err(AppError::InvalidArgument(
            "Order contains unknown categories".to_string(),
        ));
    }
    Ok(())
}

pub(crate) async fn create_item(
    pool: &PgPool,
    restaurant_id: Uuid,
    category_id: Uuid,
    req: ItemRequest,
) -> Res<MenuItem> {
    let name = required_name(&req.name, "Item")?;
    if req.price < BigDecimal::from(0) {
        return Err(AppError::InvalidArgument("Price cannot be negative".to_string()));
    }
    if !db::menu::exists_category(pool, restaurant_id, category_id).await? {
        return Err(category_not_found());
    }

    db::menu::insert_item(
        pool,
        ItemCreateRequest {
            category_id,
            name,
            description: req.description.trim().to_string(),
            price: req.price,
        },
    )
    .await
}

pub(crate) async fn delete_item(pool: &PgPool, restaurant_id: Uuid, item_id: Uuid) -> Res<()> {
    match db::menu::delete_item(pool, restaurant_id, item_id).await? {
        0 => Err(AppError::NotFound("Menu item not found".to_string())),
        _ => Ok(()),
    }
}

pub(crate) async fn reorder_items(
    ledger: &dyn Ledger,
    restaurant_id: Uuid,
    category_id: Uuid,
    ids: &[Uuid],
) -> Res<()> {
    let positions = reindex(ids)?;
    if !ledger.category_exists(restaurant_id, category_id).await? {
        return Err(category_not_found());
    }
    if !ledger
        .set_item_positions(category_id, ids.to_vec(), positions)
        .await?
    {
        return Err(AppError::InvalidArgument(
            "Order contains items from another category".to_string(),
        ));
    }
    Ok(())
}

fn category_not_found() -> AppError {
    AppError::NotFound("Category not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MockLedger;
    use chrono::NaiveDate;

    fn category(restaurant_id: Uuid, name: &str, position: i32) -> MenuCategory {
        MenuCategory {
            id: Uuid::new_v4(),
            restaurant_id,
            name: name.to_string(),
            description: String::new(),
            position,
            created_at: NaiveDate::from_ymd_opt(2025, 5, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    fn item(category_id: Uuid, name: &str, position: i32) -> MenuItem {
        MenuItem {
            id: Uuid::new_v4(),
            category_id,
            name: name.to_string(),
            description: String::new(),
            price: BigDecimal::from(12),
            position,
            created_at: NaiveDate::from_ymd_opt(2025, 5, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn reindex_uses_list_position() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        assert_eq!(reindex(&ids).unwrap(), vec![0, 1, 2]);
        assert_eq!(reindex(&[]).unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn reindex_rejects_duplicates() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(matches!(
            reindex(&[a, b, a]),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn menu_groups_items_under_categories() {
        let restaurant_id = Uuid::new_v4();
        let starters = category(restaurant_id, "Starters", 0);
        let mains = category(restaurant_id, "Mains", 1);
        let items = vec![
            item(mains.id, "Lasagne", 0),
            item(starters.id, "Bruschetta", 0),
            item(mains.id, "Risotto", 1),
            item(Uuid::new_v4(), "Orphan", 0),
        ];

        let menu = group_menu(vec![starters.clone(), mains.clone()], items);

        assert_eq!(menu.len(), 2);
        assert_eq!(menu[0].category.name, "Starters");
        assert_eq!(menu[0].items.len(), 1);
        let mains_items: Vec<_> = menu[1].items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(mains_items, ["Lasagne", "Risotto"]);
    }

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(required_name("  Desserts ", "Category").unwrap(), "Desserts");
        assert!(matches!(
            required_name(" ", "Item"),
            Err(AppError::InvalidArgument(message)) if message == "Item name is required"
        ));
    }

    #[actix_web::test]
    async fn reorder_writes_list_positions() {
        let restaurant_id = Uuid::new_v4();
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let expected = ids.clone();
        let mut ledger = MockLedger::new();
        ledger
            .expect_set_category_positions()
            .withf(move |r, ids, positions| {
                *r == restaurant_id && *ids == expected && *positions == vec![0, 1]
            })
            .times(1)
            .returning(|_, _, _| Ok(true));

        reorder_categories(&ledger, restaurant_id, &ids).await.unwrap();
    }

    #[actix_web::test]
    async fn reorder_with_unknown_ids_is_rejected() {
        let mut ledger = MockLedger::new();
        // the ledger rolled the partial update back
        ledger
            .expect_set_category_positions()
            .times(1)
            .returning(|_, _, _| Ok(false));

        assert!(matches!(
            reorder_categories(&ledger, Uuid::new_v4(), &[Uuid::new_v4()]).await,
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[actix_web::test]
    async fn duplicate_ids_never_reach_the_ledger() {
        let ledger = MockLedger::new();
        let id = Uuid::new_v4();

        assert!(matches!(
            reorder_categories(&ledger, Uuid::new_v4(), &[id, id]).await,
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[actix_web::test]
    async fn item_reorder_checks_category_ownership() {
        let mut ledger = MockLedger::new();
        ledger
            .expect_category_exists()
            .times(1)
            .returning(|_, _| Ok(false));

        assert!(matches!(
            reorder_items(&ledger, Uuid::new_v4(), Uuid::new_v4(), &[Uuid::new_v4()]).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn item_reorder_with_foreign_items_is_rejected() {
        let mut ledger = MockLedger::new();
        ledger
            .expect_category_exists()
            .times(1)
            .returning(|_, _| Ok(true));
        ledger
            .expect_set_item_positions()
            .times(1)
            .returning(|_, _, _| Ok(false));

        assert!(matches!(
            reorder_items(&ledger, Uuid::new_v4(), Uuid::new_v4(), &[Uuid::new_v4()]).await,
            Err(AppError::InvalidArgument(_))
        ));
    }
}
