// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use gearbook_domain::{
    Category, CategoryId, EquipmentType, EquipmentTypeId, InventoryNumber, ItemId, ItemStatus,
    KitComponent, StockItem, StockType, StockTypeId, validate_kit_component, validate_name,
};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewStockItem, NewStockType};
use crate::diesel_schema::{categories, equipment_types, kit_components, stock_items, stock_types};
use crate::error::PersistenceError;
use crate::queries::bookings::count_type_references;
use crate::queries::catalog::{
    count_items_of_type, get_category, get_equipment_type, get_item, get_stock_type,
    list_kit_components,
};

fn require_category(
    conn: &mut SqliteConnection,
    category_id: CategoryId,
) -> Result<Category, PersistenceError> {
    get_category(conn, category_id)?
        .ok_or_else(|| PersistenceError::not_found("category", category_id.value()))
}

/// Creates a category, optionally nested under a parent.
///
/// # Errors
///
/// Returns an error if the name is empty or the parent does not exist.
pub fn create_category(
    conn: &mut SqliteConnection,
    name: &str,
    parent_id: Option<CategoryId>,
) -> Result<Category, PersistenceError> {
    let name: String = validate_name(name, "category name")?;
    if let Some(parent_id) = parent_id {
        require_category(conn, parent_id)?;
    }

    diesel::insert_into(categories::table)
        .values((
            categories::name.eq(&name),
            categories::parent_id.eq(parent_id.map(CategoryId::value)),
        ))
        .execute(conn)?;
    let category_id: i64 = get_last_insert_rowid(conn)?;

    info!(category_id, name = %name, "Category created");
    Ok(Category {
        category_id: CategoryId::new(category_id),
        name,
        parent_id,
    })
}

/// Creates a fungible equipment type.
///
/// # Errors
///
/// Returns an error if the name is empty or the category does not exist.
pub fn create_equipment_type(
    conn: &mut SqliteConnection,
    category_id: CategoryId,
    name: &str,
    quantity_total: u32,
) -> Result<EquipmentType, PersistenceError> {
    let name: String = validate_name(name, "equipment type name")?;
    require_category(conn, category_id)?;

    diesel::insert_into(equipment_types::table)
        .values((
            equipment_types::category_id.eq(category_id.value()),
            equipment_types::name.eq(&name),
            equipment_types::quantity_total.eq(i64::from(quantity_total)),
        ))
        .execute(conn)?;
    let equipment_type_id: i64 = get_last_insert_rowid(conn)?;

    info!(equipment_type_id, quantity_total, "Equipment type created");
    Ok(EquipmentType {
        equipment_type_id: EquipmentTypeId::new(equipment_type_id),
        category_id,
        name,
        quantity_total,
    })
}

/// Changes the owned quantity of a fungible type.
///
/// Existing bookings are not re-checked; availability simply reflects the
/// new total.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the type does not exist.
pub fn set_equipment_quantity(
    conn: &mut SqliteConnection,
    equipment_type_id: EquipmentTypeId,
    quantity_total: u32,
) -> Result<EquipmentType, PersistenceError> {
    let mut equipment_type: EquipmentType = get_equipment_type(conn, equipment_type_id)?
        .ok_or_else(|| PersistenceError::not_found("equipment type", equipment_type_id.value()))?;

    diesel::update(equipment_types::table.find(equipment_type_id.value()))
        .set(equipment_types::quantity_total.eq(i64::from(quantity_total)))
        .execute(conn)?;

    info!(
        equipment_type_id = %equipment_type_id,
        from = equipment_type.quantity_total,
        to = quantity_total,
        "Equipment quantity changed"
    );
    equipment_type.quantity_total = quantity_total;
    Ok(equipment_type)
}

/// Deletes a fungible type that nothing references.
///
/// # Errors
///
/// Returns `PersistenceError::EntityInUse` if bookings or repair holds still
/// reference the type.
pub fn delete_equipment_type(
    conn: &mut SqliteConnection,
    equipment_type_id: EquipmentTypeId,
) -> Result<(), PersistenceError> {
    if get_equipment_type(conn, equipment_type_id)?.is_none() {
        return Err(PersistenceError::not_found("equipment type", equipment_type_id.value()));
    }

    let (booking_count, hold_count) = count_type_references(conn, equipment_type_id)?;
    if booking_count > 0 || hold_count > 0 {
        return Err(PersistenceError::EntityInUse {
            entity: "equipment type",
            id: equipment_type_id.value(),
            detail: format!("{booking_count} bookings and {hold_count} repair holds"),
        });
    }

    diesel::delete(equipment_types::table.find(equipment_type_id.value())).execute(conn)?;
    info!(equipment_type_id = %equipment_type_id, "Equipment type deleted");
    Ok(())
}

/// Creates a serialized stock type.
///
/// # Errors
///
/// Returns an error if the name is empty or a category does not exist.
pub fn create_stock_type(
    conn: &mut SqliteConnection,
    new_type: &NewStockType,
) -> Result<StockType, PersistenceError> {
    let name: String = validate_name(&new_type.name, "stock type name")?;
    require_category(conn, new_type.category_id)?;
    if let Some(subcategory_id) = new_type.subcategory_id {
        require_category(conn, subcategory_id)?;
    }

    let attributes = &new_type.attributes;
    diesel::insert_into(stock_types::table)
        .values((
            stock_types::category_id.eq(new_type.category_id.value()),
            stock_types::subcategory_id.eq(new_type.subcategory_id.map(CategoryId::value)),
            stock_types::name.eq(&name),
            stock_types::weight_kg.eq(attributes.weight_kg),
            stock_types::width_cm.eq(attributes.width_cm),
            stock_types::height_cm.eq(attributes.height_cm),
            stock_types::depth_cm.eq(attributes.depth_cm),
            stock_types::power_w.eq(attributes.power_w),
            stock_types::is_active.eq(1),
        ))
        .execute(conn)?;
    let stock_type_id: i64 = get_last_insert_rowid(conn)?;

    info!(stock_type_id, name = %name, "Stock type created");
    Ok(StockType {
        stock_type_id: StockTypeId::new(stock_type_id),
        category_id: new_type.category_id,
        subcategory_id: new_type.subcategory_id,
        name,
        attributes: attributes.clone(),
        is_active: true,
    })
}

/// Activates or retires a stock type.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the type does not exist.
pub fn set_stock_type_active(
    conn: &mut SqliteConnection,
    stock_type_id: StockTypeId,
    is_active: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(stock_types::table.find(stock_type_id.value()))
        .set(stock_types::is_active.eq(i32::from(is_active)))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::not_found("stock type", stock_type_id.value()));
    }
    Ok(())
}

/// Deletes a stock type that has no units.
///
/// # Errors
///
/// Returns `PersistenceError::EntityInUse` if units of the type exist.
pub fn delete_stock_type(
    conn: &mut SqliteConnection,
    stock_type_id: StockTypeId,
) -> Result<(), PersistenceError> {
    if get_stock_type(conn, stock_type_id)?.is_none() {
        return Err(PersistenceError::not_found("stock type", stock_type_id.value()));
    }

    let item_count: i64 = count_items_of_type(conn, stock_type_id)?;
    if item_count > 0 {
        return Err(PersistenceError::EntityInUse {
            entity: "stock type",
            id: stock_type_id.value(),
            detail: format!("{item_count} items"),
        });
    }

    diesel::delete(stock_types::table.find(stock_type_id.value())).execute(conn)?;
    info!(stock_type_id = %stock_type_id, "Stock type deleted");
    Ok(())
}

/// Creates a serialized unit in storage.
///
/// # Errors
///
/// Returns an error if the inventory number is empty, the type does not
/// exist, or the inventory number is taken (`PersistenceError::Conflict`).
pub fn create_item(
    conn: &mut SqliteConnection,
    new_item: &NewStockItem,
) -> Result<StockItem, PersistenceError> {
    let inventory_number: InventoryNumber = InventoryNumber::new(&new_item.inventory_number)?;
    if get_stock_type(conn, new_item.stock_type_id)?.is_none() {
        return Err(PersistenceError::not_found("stock type", new_item.stock_type_id.value()));
    }

    diesel::insert_into(stock_items::table)
        .values((
            stock_items::stock_type_id.eq(new_item.stock_type_id.value()),
            stock_items::inventory_number.eq(inventory_number.as_str()),
            stock_items::status.eq(ItemStatus::Storage.as_str()),
            stock_items::is_lost.eq(0),
            stock_items::comment.eq(new_item.comment.clone()),
            stock_items::photo.eq(new_item.photo.clone()),
        ))
        .execute(conn)?;
    let item_id: i64 = get_last_insert_rowid(conn)?;

    info!(item_id, inventory_number = %inventory_number, "Item created");
    Ok(StockItem {
        item_id: ItemId::new(item_id),
        stock_type_id: new_item.stock_type_id,
        inventory_number,
        status: ItemStatus::Storage,
        is_lost: false,
        comment: new_item.comment.clone(),
        photo: new_item.photo.clone(),
    })
}

/// Appends a component to a kit.
///
/// # Errors
///
/// Returns an error if either unit does not exist or the kit rules are broken.
pub fn add_kit_component(
    conn: &mut SqliteConnection,
    parent_id: ItemId,
    component_id: ItemId,
) -> Result<KitComponent, PersistenceError> {
    for item_id in [parent_id, component_id] {
        if get_item(conn, item_id)?.is_none() {
            return Err(PersistenceError::not_found("item", item_id.value()));
        }
    }

    let parent_components: Vec<KitComponent> = list_kit_components(conn, parent_id)?;
    let component_components: Vec<KitComponent> = list_kit_components(conn, component_id)?;
    validate_kit_component(
        parent_id,
        component_id,
        &parent_components,
        &component_components,
    )?;

    let position: u32 = parent_components
        .iter()
        .map(|c| c.position + 1)
        .max()
        .unwrap_or(0);

    diesel::insert_into(kit_components::table)
        .values((
            kit_components::parent_id.eq(parent_id.value()),
            kit_components::component_id.eq(component_id.value()),
            kit_components::position.eq(i64::from(position)),
        ))
        .execute(conn)?;

    info!(parent_id = %parent_id, component_id = %component_id, position, "Kit component added");
    Ok(KitComponent {
        parent_id,
        component_id,
        position,
    })
}

/// Removes a component from a kit, leaving the other positions untouched.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the component is not in the kit.
pub fn remove_kit_component(
    conn: &mut SqliteConnection,
    parent_id: ItemId,
    component_id: ItemId,
) -> Result<(), PersistenceError> {
    let removed: usize = diesel::delete(
        kit_components::table.find((parent_id.value(), component_id.value())),
    )
    .execute(conn)?;
    if removed == 0 {
        return Err(PersistenceError::not_found("kit component", component_id.value()));
    }

    info!(parent_id = %parent_id, component_id = %component_id, "Kit component removed");
    Ok(())
}
