// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog queries: categories, fungible types, serialized types and units.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gearbook_domain::{
    Category, CategoryId, EquipmentType, EquipmentTypeId, ItemId, KitComponent, StockItem,
    StockType, StockTypeId,
};
use tracing::debug;

use crate::data_models::{
    CategoryRow, EquipmentTypeRow, KitComponentRow, StockItemRow, StockTypeRow,
};
use crate::diesel_schema::{
    categories, equipment_types, kit_components, stock_items, stock_types,
};
use crate::error::PersistenceError;

/// Retrieves a category by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_category(
    conn: &mut SqliteConnection,
    category_id: CategoryId,
) -> Result<Option<Category>, PersistenceError> {
    let row: Option<CategoryRow> = categories::table
        .find(category_id.value())
        .select(CategoryRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(Category::from))
}

/// Lists all categories ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_categories(conn: &mut SqliteConnection) -> Result<Vec<Category>, PersistenceError> {
    let rows: Vec<CategoryRow> = categories::table
        .order((categories::name.asc(), categories::category_id.asc()))
        .select(CategoryRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(Category::from).collect())
}

/// Retrieves a fungible equipment type by id.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is invalid.
pub fn get_equipment_type(
    conn: &mut SqliteConnection,
    equipment_type_id: EquipmentTypeId,
) -> Result<Option<EquipmentType>, PersistenceError> {
    debug!(equipment_type_id = %equipment_type_id, "Looking up equipment type");

    equipment_types::table
        .find(equipment_type_id.value())
        .select(EquipmentTypeRow::as_select())
        .first(conn)
        .optional()?
        .map(EquipmentType::try_from)
        .transpose()
}

/// Lists all fungible equipment types.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_equipment_types(
    conn: &mut SqliteConnection,
) -> Result<Vec<EquipmentType>, PersistenceError> {
    equipment_types::table
        .order(equipment_types::name.asc())
        .select(EquipmentTypeRow::as_select())
        .load(conn)?
        .into_iter()
        .map(EquipmentType::try_from)
        .collect()
}

/// Retrieves a serialized stock type by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_stock_type(
    conn: &mut SqliteConnection,
    stock_type_id: StockTypeId,
) -> Result<Option<StockType>, PersistenceError> {
    let row: Option<StockTypeRow> = stock_types::table
        .find(stock_type_id.value())
        .select(StockTypeRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(StockType::from))
}

/// Lists serialized stock types, optionally only active ones.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_stock_types(
    conn: &mut SqliteConnection,
    active_only: bool,
) -> Result<Vec<StockType>, PersistenceError> {
    let mut query = stock_types::table
        .order(stock_types::name.asc())
        .select(StockTypeRow::as_select())
        .into_boxed();
    if active_only {
        query = query.filter(stock_types::is_active.eq(1));
    }
    let rows: Vec<StockTypeRow> = query.load(conn)?;
    Ok(rows.into_iter().map(StockType::from).collect())
}

/// Retrieves a serialized unit by id.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is invalid.
pub fn get_item(
    conn: &mut SqliteConnection,
    item_id: ItemId,
) -> Result<Option<StockItem>, PersistenceError> {
    stock_items::table
        .find(item_id.value())
        .select(StockItemRow::as_select())
        .first(conn)
        .optional()?
        .map(StockItem::try_from)
        .transpose()
}

/// Retrieves a serialized unit by its inventory number.
///
/// The lookup trims surrounding whitespace, as inventory numbers are stored
/// trimmed.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is invalid.
pub fn get_item_by_inventory_number(
    conn: &mut SqliteConnection,
    inventory_number: &str,
) -> Result<Option<StockItem>, PersistenceError> {
    debug!(inventory_number, "Looking up item by inventory number");

    stock_items::table
        .filter(stock_items::inventory_number.eq(inventory_number.trim()))
        .select(StockItemRow::as_select())
        .first(conn)
        .optional()?
        .map(StockItem::try_from)
        .transpose()
}

/// Lists the units of a stock type ordered by inventory number.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_items(
    conn: &mut SqliteConnection,
    stock_type_id: StockTypeId,
) -> Result<Vec<StockItem>, PersistenceError> {
    stock_items::table
        .filter(stock_items::stock_type_id.eq(stock_type_id.value()))
        .order(stock_items::inventory_number.asc())
        .select(StockItemRow::as_select())
        .load(conn)?
        .into_iter()
        .map(StockItem::try_from)
        .collect()
}

/// Counts the units of a stock type.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_items_of_type(
    conn: &mut SqliteConnection,
    stock_type_id: StockTypeId,
) -> Result<i64, PersistenceError> {
    Ok(stock_items::table
        .filter(stock_items::stock_type_id.eq(stock_type_id.value()))
        .count()
        .get_result(conn)?)
}

/// Lists the components of a kit in position order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_kit_components(
    conn: &mut SqliteConnection,
    parent_id: ItemId,
) -> Result<Vec<KitComponent>, PersistenceError> {
    kit_components::table
        .filter(kit_components::parent_id.eq(parent_id.value()))
        .order((kit_components::position.asc(), kit_components::component_id.asc()))
        .select(KitComponentRow::as_select())
        .load(conn)?
        .into_iter()
        .map(KitComponent::try_from)
        .collect()
}
