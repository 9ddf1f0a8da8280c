// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator subcommands and their dispatch onto the API layer.

use clap::{Args, Subcommand};
use gearbook_api::{
    AddKitComponentRequest, ApiError, AvailabilityRequest, CloseRepairRequest, Collaborators,
    CreateCategoryRequest, CreateEquipmentTypeRequest, CreateEventRequest, CreateItemRequest,
    CreateStockTypeRequest, IssueRequest, ItemRef, MarkLostRequest, OpenRepairHoldRequest,
    OpenRepairRequest, ReturnRequest, SetBookingRequest, SetReservationRequest, TransferRequest,
};
use gearbook_audit::Actor;
use gearbook_domain::PhysicalAttributes;
use gearbook_persistence::Persistence;
use serde::Serialize;
use time::Date;
use time::macros::format_description;

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<Date, String> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

/// Parses an item reference: `id:<n>` for an item id, anything else is an
/// inventory number.
pub fn parse_item_ref(value: &str) -> Result<ItemRef, String> {
    match value.strip_prefix("id:") {
        Some(id) => id
            .parse::<i64>()
            .map(ItemRef::Id)
            .map_err(|e| format!("invalid item id '{id}': {e}")),
        None if value.trim().is_empty() => Err(String::from("item reference cannot be empty")),
        None => Ok(ItemRef::InventoryNumber(value.to_string())),
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Manage fungible equipment types, bookings and repair holds
    #[command(subcommand)]
    Equipment(EquipmentCommand),
    /// Manage serialized stock types
    #[command(subcommand)]
    StockType(StockTypeCommand),
    /// Manage serialized units
    #[command(subcommand)]
    Item(ItemCommand),
    /// Manage events, reservations and their lifecycle
    #[command(subcommand)]
    Event(EventCommand),
    /// Issue a unit to an event
    Issue {
        event_id: i64,
        /// Inventory number, or `id:<n>`
        #[arg(value_parser = parse_item_ref)]
        item: ItemRef,
    },
    /// Return a unit from an event
    Return {
        event_id: i64,
        /// Inventory number, or `id:<n>`
        #[arg(value_parser = parse_item_ref)]
        item: ItemRef,
    },
    /// Move a unit from one event to another
    Transfer {
        source_event_id: i64,
        target_event_id: i64,
        /// Inventory number, or `id:<n>`
        #[arg(value_parser = parse_item_ref)]
        item: ItemRef,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// Create a category or subcategory
    Create {
        name: String,
        #[arg(long)]
        parent: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum EquipmentCommand {
    /// Create a fungible equipment type
    Create {
        #[arg(long)]
        category: i64,
        name: String,
        quantity: u32,
    },
    /// Change the owned quantity of a type
    SetQuantity {
        equipment_type_id: i64,
        quantity: u32,
    },
    /// Show availability over an inclusive date range
    Availability {
        equipment_type_id: i64,
        #[arg(value_parser = parse_date)]
        start: Date,
        #[arg(value_parser = parse_date)]
        end: Date,
    },
    /// Book units for an event; over-booking is reported, not refused
    Book {
        event_id: i64,
        equipment_type_id: i64,
        quantity: u32,
        #[arg(value_parser = parse_date)]
        start: Date,
        #[arg(value_parser = parse_date)]
        end: Date,
    },
    /// Withdraw units for repair
    Hold {
        equipment_type_id: i64,
        quantity: u32,
        #[arg(value_parser = parse_date)]
        start: Date,
        /// Expected return date; open-ended when omitted
        #[arg(long, value_parser = parse_date)]
        until: Option<Date>,
    },
    /// Mark a repair hold returned
    Release {
        repair_hold_id: i64,
        #[arg(value_parser = parse_date)]
        end: Date,
    },
}

#[derive(Args, Debug)]
pub struct AttributeArgs {
    #[arg(long)]
    weight_kg: Option<f64>,
    #[arg(long)]
    width_cm: Option<f64>,
    #[arg(long)]
    height_cm: Option<f64>,
    #[arg(long)]
    depth_cm: Option<f64>,
    #[arg(long)]
    power_w: Option<f64>,
}

impl From<&AttributeArgs> for PhysicalAttributes {
    fn from(args: &AttributeArgs) -> Self {
        Self {
            weight_kg: args.weight_kg,
            width_cm: args.width_cm,
            height_cm: args.height_cm,
            depth_cm: args.depth_cm,
            power_w: args.power_w,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum StockTypeCommand {
    /// Create a serialized stock type
    Create {
        #[arg(long)]
        category: i64,
        #[arg(long)]
        subcategory: Option<i64>,
        name: String,
        #[command(flatten)]
        attributes: AttributeArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    /// Register a unit in storage
    Create {
        #[arg(long = "type")]
        stock_type_id: i64,
        inventory_number: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Show a unit and where it is
    Show {
        #[arg(value_parser = parse_item_ref)]
        item: ItemRef,
    },
    /// Open a repair ticket
    Repair {
        #[arg(value_parser = parse_item_ref)]
        item: ItemRef,
        reason: String,
    },
    /// Close the open repair ticket
    Repaired {
        #[arg(value_parser = parse_item_ref)]
        item: ItemRef,
        #[arg(long)]
        note: Option<String>,
    },
    /// Report a unit lost
    Lost {
        #[arg(value_parser = parse_item_ref)]
        item: ItemRef,
        reason: String,
    },
    /// Report a lost unit found
    Found {
        #[arg(value_parser = parse_item_ref)]
        item: ItemRef,
        reason: String,
    },
    /// Add a unit to a kit
    KitAdd {
        #[arg(value_parser = parse_item_ref)]
        parent: ItemRef,
        #[arg(value_parser = parse_item_ref)]
        component: ItemRef,
    },
    /// List the components of a kit
    Kit {
        #[arg(value_parser = parse_item_ref)]
        parent: ItemRef,
    },
}

#[derive(Subcommand, Debug)]
pub enum EventCommand {
    /// Create a planned event
    Create {
        name: String,
        #[arg(value_parser = parse_date)]
        start: Date,
        #[arg(value_parser = parse_date)]
        end: Date,
        /// User notified about issuance at this event
        #[arg(long)]
        responsible: Option<i64>,
    },
    /// Show reservations and unreturned units
    Show { event_id: i64 },
    /// Set how many units of a stock type may be issued
    Reserve {
        event_id: i64,
        stock_type_id: i64,
        quantity: u32,
    },
    /// Check whether the event could be cancelled
    CanCancel { event_id: i64 },
    /// Check whether the event could be closed
    CanClose { event_id: i64 },
    /// Cancel the event
    Cancel { event_id: i64 },
    /// Close the event
    Close { event_id: i64 },
}

fn render<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::Internal {
        message: format!("Failed to render response: {e}"),
    })
}

/// Runs one command and renders its response as JSON.
///
/// # Errors
///
/// Returns the API error of the failed operation.
pub fn run(
    command: Command,
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    actor: &Actor,
) -> Result<String, ApiError> {
    match command {
        Command::Category(command) => run_category(command, persistence, collaborators, actor),
        Command::Equipment(command) => run_equipment(command, persistence, collaborators, actor),
        Command::StockType(command) => run_stock_type(command, persistence, collaborators, actor),
        Command::Item(command) => run_item(command, persistence, collaborators, actor),
        Command::Event(command) => run_event(command, persistence, collaborators, actor),
        Command::Issue { event_id, item } => render(&gearbook_api::issue_item(
            persistence,
            collaborators,
            &IssueRequest { event_id, item },
            actor,
        )?),
        Command::Return { event_id, item } => render(&gearbook_api::return_item(
            persistence,
            collaborators,
            &ReturnRequest { event_id, item },
            actor,
        )?),
        Command::Transfer {
            source_event_id,
            target_event_id,
            item,
        } => render(&gearbook_api::transfer_item(
            persistence,
            collaborators,
            &TransferRequest {
                source_event_id,
                target_event_id,
                item,
            },
            actor,
        )?),
    }
}

fn run_category(
    command: CategoryCommand,
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    actor: &Actor,
) -> Result<String, ApiError> {
    match command {
        CategoryCommand::Create { name, parent } => render(&gearbook_api::create_category(
            persistence,
            collaborators,
            &CreateCategoryRequest {
                name,
                parent_id: parent,
            },
            actor,
        )?),
    }
}

fn run_equipment(
    command: EquipmentCommand,
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    actor: &Actor,
) -> Result<String, ApiError> {
    match command {
        EquipmentCommand::Create {
            category,
            name,
            quantity,
        } => render(&gearbook_api::create_equipment_type(
            persistence,
            collaborators,
            &CreateEquipmentTypeRequest {
                category_id: category,
                name,
                quantity_total: quantity,
            },
            actor,
        )?),
        EquipmentCommand::SetQuantity {
            equipment_type_id,
            quantity,
        } => render(&gearbook_api::set_equipment_quantity(
            persistence,
            collaborators,
            equipment_type_id,
            quantity,
            actor,
        )?),
        EquipmentCommand::Availability {
            equipment_type_id,
            start,
            end,
        } => render(&gearbook_api::get_availability(
            persistence,
            &AvailabilityRequest {
                equipment_type_id,
                start_date: start,
                end_date: end,
            },
        )?),
        EquipmentCommand::Book {
            event_id,
            equipment_type_id,
            quantity,
            start,
            end,
        } => render(&gearbook_api::set_booking(
            persistence,
            collaborators,
            &SetBookingRequest {
                event_id,
                equipment_type_id,
                quantity,
                start_date: start,
                end_date: end,
            },
            actor,
        )?),
        EquipmentCommand::Hold {
            equipment_type_id,
            quantity,
            start,
            until,
        } => render(&gearbook_api::open_repair_hold(
            persistence,
            collaborators,
            &OpenRepairHoldRequest {
                equipment_type_id,
                quantity,
                start_date: start,
                end_date: until,
            },
            actor,
        )?),
        EquipmentCommand::Release {
            repair_hold_id,
            end,
        } => render(&gearbook_api::close_repair_hold(
            persistence,
            collaborators,
            repair_hold_id,
            end,
            actor,
        )?),
    }
}

fn run_stock_type(
    command: StockTypeCommand,
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    actor: &Actor,
) -> Result<String, ApiError> {
    match command {
        StockTypeCommand::Create {
            category,
            subcategory,
            name,
            attributes,
        } => render(&gearbook_api::create_stock_type(
            persistence,
            collaborators,
            &CreateStockTypeRequest {
                category_id: category,
                subcategory_id: subcategory,
                name,
                attributes: PhysicalAttributes::from(&attributes),
            },
            actor,
        )?),
    }
}

fn run_item(
    command: ItemCommand,
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    actor: &Actor,
) -> Result<String, ApiError> {
    match command {
        ItemCommand::Create {
            stock_type_id,
            inventory_number,
            comment,
        } => render(&gearbook_api::create_item(
            persistence,
            collaborators,
            &CreateItemRequest {
                stock_type_id,
                inventory_number,
                comment,
                photo: None,
            },
            actor,
        )?),
        ItemCommand::Show { item } => render(&gearbook_api::get_item(persistence, &item)?),
        ItemCommand::Repair { item, reason } => render(&gearbook_api::open_repair(
            persistence,
            collaborators,
            &OpenRepairRequest { item, reason },
            actor,
        )?),
        ItemCommand::Repaired { item, note } => render(&gearbook_api::close_repair(
            persistence,
            collaborators,
            &CloseRepairRequest { item, note },
            actor,
        )?),
        ItemCommand::Lost { item, reason } => render(&gearbook_api::mark_lost(
            persistence,
            collaborators,
            &MarkLostRequest {
                item,
                lost: true,
                reason,
            },
            actor,
        )?),
        ItemCommand::Found { item, reason } => render(&gearbook_api::mark_lost(
            persistence,
            collaborators,
            &MarkLostRequest {
                item,
                lost: false,
                reason,
            },
            actor,
        )?),
        ItemCommand::KitAdd { parent, component } => render(&gearbook_api::add_kit_component(
            persistence,
            collaborators,
            &AddKitComponentRequest { parent, component },
            actor,
        )?),
        ItemCommand::Kit { parent } => render(&gearbook_api::get_kit(persistence, &parent)?),
    }
}

fn run_event(
    command: EventCommand,
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    actor: &Actor,
) -> Result<String, ApiError> {
    match command {
        EventCommand::Create {
            name,
            start,
            end,
            responsible,
        } => render(&gearbook_api::create_event(
            persistence,
            collaborators,
            &CreateEventRequest {
                name,
                start_date: start,
                end_date: end,
                responsible_user_id: responsible,
            },
            actor,
        )?),
        EventCommand::Show { event_id } => {
            render(&gearbook_api::get_event_summary(persistence, event_id)?)
        }
        EventCommand::Reserve {
            event_id,
            stock_type_id,
            quantity,
        } => render(&gearbook_api::set_reservation(
            persistence,
            collaborators,
            &SetReservationRequest {
                event_id,
                stock_type_id,
                quantity,
            },
            actor,
        )?),
        EventCommand::CanCancel { event_id } => {
            render(&gearbook_api::check_cancel(persistence, event_id)?)
        }
        EventCommand::CanClose { event_id } => {
            render(&gearbook_api::check_close(persistence, event_id)?)
        }
        EventCommand::Cancel { event_id } => render(&gearbook_api::cancel_event(
            persistence,
            collaborators,
            event_id,
            actor,
        )?),
        EventCommand::Close { event_id } => render(&gearbook_api::close_event(
            persistence,
            collaborators,
            event_id,
            actor,
        )?),
    }
}
