// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Each handler validates its request, performs one store operation, and
//! only then emits audit records and notifications. Store writes that lose
//! a race are retried once.

use gearbook::{Command, IssuanceOutcome};
use gearbook_audit::{Actor, AuditAction, AuditEvent};
use gearbook_domain::{
    AvailabilityReport, Category, CategoryId, DateRange, EquipmentType, EquipmentTypeId, Event,
    EventId, EventStockIssue, GuardDecision, ItemId, KitComponent, RepairHold, RepairHoldId,
    ReservationTally, StockItem, StockRepair, StockType, StockTypeId, UserId,
};
use gearbook_persistence::{
    BookingReport, IssuanceRecord, NewStockItem, NewStockType, Persistence,
};
use time::Date;
use tracing::info;

use crate::collaborators::{Collaborators, retry_on_conflict};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    AddKitComponentRequest, AvailabilityRequest, AvailabilityResponse, BlockerInfo,
    BookingResponse, CategoryResponse, CloseRepairRequest, CreateCategoryRequest,
    CreateEquipmentTypeRequest, CreateEventRequest, CreateItemRequest, CreateStockTypeRequest,
    EquipmentTypeResponse, EventResponse, EventSummaryResponse, IssuanceResponse, IssueRequest,
    ItemRef, ItemResponse, KitResponse, LifecycleCheckResponse, MarkLostRequest,
    OpenRepairHoldRequest, OpenRepairRequest, RepairHoldResponse, RepairResponse,
    ReservationInfo, ReservationResponse, ReturnRequest, SetBookingRequest,
    SetReservationRequest, StockTypeResponse, TransferRequest,
};

// ============================================================================
// Shared helpers
// ============================================================================

/// Resolves an item reference to the stored unit.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if no unit matches.
pub fn resolve_item(persistence: &mut Persistence, item: &ItemRef) -> Result<StockItem, ApiError> {
    match item {
        ItemRef::Id(id) => persistence
            .get_item(ItemId::new(*id))
            .map_err(translate_persistence_error),
        ItemRef::InventoryNumber(number) => persistence
            .find_item_by_inventory_number(number)
            .map_err(translate_persistence_error)?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Item"),
                message: format!("No item with inventory number '{}'", number.trim()),
            }),
    }
}

fn date_range(start: Date, end: Date) -> Result<DateRange, ApiError> {
    DateRange::new(start, end).map_err(translate_domain_error)
}

fn event_response(event: &Event, message: String) -> EventResponse {
    EventResponse {
        event_id: event.event_id.value(),
        name: event.name.clone(),
        start_date: event.range.start(),
        end_date: event.range.end(),
        status: event.status.to_string(),
        responsible_user_id: event.responsible_user.map(UserId::value),
        message,
    }
}

fn lifecycle_response(event_id: EventId, decision: &GuardDecision) -> LifecycleCheckResponse {
    LifecycleCheckResponse {
        event_id: event_id.value(),
        allowed: decision.allowed(),
        blockers: decision
            .blockers
            .iter()
            .map(|blocker| BlockerInfo {
                code: blocker.code().to_string(),
                message: blocker.to_string(),
            })
            .collect(),
    }
}

fn item_response(
    persistence: &mut Persistence,
    item: &StockItem,
    message: String,
) -> Result<ItemResponse, ApiError> {
    let open_issue: Option<EventStockIssue> = persistence
        .open_issue_for_item(item.item_id)
        .map_err(translate_persistence_error)?;
    Ok(ItemResponse {
        item_id: item.item_id.value(),
        stock_type_id: item.stock_type_id.value(),
        inventory_number: item.inventory_number.to_string(),
        status: item.status.to_string(),
        is_lost: item.is_lost,
        issued_to_event_id: open_issue.map(|issue| issue.event_id.value()),
        message,
    })
}

// ============================================================================
// Catalog
// ============================================================================

/// Creates a category.
///
/// # Errors
///
/// Returns an error if the name is empty or the parent does not exist.
pub fn create_category(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &CreateCategoryRequest,
    actor: &Actor,
) -> Result<CategoryResponse, ApiError> {
    let category: Category = persistence
        .create_category(&request.name, request.parent_id.map(CategoryId::new))
        .map_err(translate_persistence_error)?;

    let message: String = format!("Created category '{}'", category.name);
    collaborators.record(&AuditEvent::new(
        actor.clone(),
        AuditAction::Create,
        "category",
        category.category_id.value(),
        message.clone(),
    ));

    Ok(CategoryResponse {
        category_id: category.category_id.value(),
        name: category.name,
        parent_id: category.parent_id.map(CategoryId::value),
        message,
    })
}

/// Creates a fungible equipment type.
///
/// # Errors
///
/// Returns an error if the name is empty or the category does not exist.
pub fn create_equipment_type(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &CreateEquipmentTypeRequest,
    actor: &Actor,
) -> Result<EquipmentTypeResponse, ApiError> {
    let equipment_type: EquipmentType = persistence
        .create_equipment_type(
            CategoryId::new(request.category_id),
            &request.name,
            request.quantity_total,
        )
        .map_err(translate_persistence_error)?;

    let message: String = format!(
        "Created equipment type '{}' with {} units",
        equipment_type.name, equipment_type.quantity_total
    );
    collaborators.record(&AuditEvent::new(
        actor.clone(),
        AuditAction::Create,
        "equipment_type",
        equipment_type.equipment_type_id.value(),
        message.clone(),
    ));

    Ok(EquipmentTypeResponse {
        equipment_type_id: equipment_type.equipment_type_id.value(),
        name: equipment_type.name,
        quantity_total: equipment_type.quantity_total,
        message,
    })
}

/// Changes the owned quantity of a fungible equipment type.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the type does not exist.
pub fn set_equipment_quantity(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    equipment_type_id: i64,
    quantity_total: u32,
    actor: &Actor,
) -> Result<EquipmentTypeResponse, ApiError> {
    let equipment_type: EquipmentType = persistence
        .set_equipment_quantity(EquipmentTypeId::new(equipment_type_id), quantity_total)
        .map_err(translate_persistence_error)?;

    let message: String = format!(
        "Equipment type '{}' now has {} units",
        equipment_type.name, equipment_type.quantity_total
    );
    collaborators.record(&AuditEvent::new(
        actor.clone(),
        AuditAction::Update,
        "equipment_type",
        equipment_type_id,
        message.clone(),
    ));

    Ok(EquipmentTypeResponse {
        equipment_type_id,
        name: equipment_type.name,
        quantity_total: equipment_type.quantity_total,
        message,
    })
}

/// Creates a serialized stock type.
///
/// # Errors
///
/// Returns an error if the name is empty or a category does not exist.
pub fn create_stock_type(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &CreateStockTypeRequest,
    actor: &Actor,
) -> Result<StockTypeResponse, ApiError> {
    let stock_type: StockType = persistence
        .create_stock_type(&NewStockType {
            category_id: CategoryId::new(request.category_id),
            subcategory_id: request.subcategory_id.map(CategoryId::new),
            name: request.name.clone(),
            attributes: request.attributes.clone(),
        })
        .map_err(translate_persistence_error)?;

    let message: String = format!("Created stock type '{}'", stock_type.name);
    collaborators.record(&AuditEvent::new(
        actor.clone(),
        AuditAction::Create,
        "stock_type",
        stock_type.stock_type_id.value(),
        message.clone(),
    ));

    Ok(StockTypeResponse {
        stock_type_id: stock_type.stock_type_id.value(),
        name: stock_type.name,
        is_active: stock_type.is_active,
        message,
    })
}

/// Registers a serialized unit in storage.
///
/// # Errors
///
/// Returns an error if the inventory number is empty or taken, or the type
/// does not exist.
pub fn create_item(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &CreateItemRequest,
    actor: &Actor,
) -> Result<ItemResponse, ApiError> {
    let item: StockItem = persistence
        .create_item(&NewStockItem {
            stock_type_id: StockTypeId::new(request.stock_type_id),
            inventory_number: request.inventory_number.clone(),
            comment: request.comment.clone(),
            photo: request.photo.clone(),
        })
        .map_err(translate_persistence_error)?;

    let message: String = format!("Registered item {}", item.inventory_number);
    collaborators.record(&AuditEvent::new(
        actor.clone(),
        AuditAction::Create,
        "item",
        item.item_id.value(),
        message.clone(),
    ));

    item_response(persistence, &item, message)
}

/// Looks up a serialized unit and where it currently is.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if no unit matches.
pub fn get_item(persistence: &mut Persistence, item: &ItemRef) -> Result<ItemResponse, ApiError> {
    let stored: StockItem = resolve_item(persistence, item)?;
    let message: String = format!("Item {} is {}", stored.inventory_number, stored.status);
    item_response(persistence, &stored, message)
}

/// Adds a unit to a kit.
///
/// # Errors
///
/// Returns an error if either unit does not exist or the kit rules are broken.
pub fn add_kit_component(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &AddKitComponentRequest,
    actor: &Actor,
) -> Result<KitResponse, ApiError> {
    let parent: StockItem = resolve_item(persistence, &request.parent)?;
    let component: StockItem = resolve_item(persistence, &request.component)?;

    persistence
        .add_kit_component(parent.item_id, component.item_id)
        .map_err(translate_persistence_error)?;

    let message: String = format!(
        "Added {} to kit {}",
        component.inventory_number, parent.inventory_number
    );
    collaborators.record(&AuditEvent::new(
        actor.clone(),
        AuditAction::Update,
        "item",
        parent.item_id.value(),
        message.clone(),
    ));

    kit_response(persistence, parent.item_id, message)
}

/// Lists the components of a kit.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the unit does not exist.
pub fn get_kit(persistence: &mut Persistence, parent: &ItemRef) -> Result<KitResponse, ApiError> {
    let parent: StockItem = resolve_item(persistence, parent)?;
    let message: String = format!("Kit {}", parent.inventory_number);
    kit_response(persistence, parent.item_id, message)
}

fn kit_response(
    persistence: &mut Persistence,
    parent_id: ItemId,
    message: String,
) -> Result<KitResponse, ApiError> {
    let components: Vec<KitComponent> = persistence
        .list_kit_components(parent_id)
        .map_err(translate_persistence_error)?;
    Ok(KitResponse {
        parent_id: parent_id.value(),
        component_ids: components
            .iter()
            .map(|component| component.component_id.value())
            .collect(),
        message,
    })
}

// ============================================================================
// Events
// ============================================================================

/// Creates a planned event.
///
/// # Errors
///
/// Returns an error if the name is empty or the date range is inverted.
pub fn create_event(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &CreateEventRequest,
    actor: &Actor,
) -> Result<EventResponse, ApiError> {
    let range: DateRange = date_range(request.start_date, request.end_date)?;
    let event: Event = persistence
        .create_event(
            &request.name,
            range,
            request.responsible_user_id.map(UserId::new),
        )
        .map_err(translate_persistence_error)?;

    let message: String = format!("Created event '{}' ({range})", event.name);
    collaborators.record(&AuditEvent::new(
        actor.clone(),
        AuditAction::Create,
        "event",
        event.event_id.value(),
        message.clone(),
    ));

    Ok(event_response(&event, message))
}

/// Summarizes an event's reservations and outstanding units.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the event does not exist.
pub fn get_event_summary(
    persistence: &mut Persistence,
    event_id: i64,
) -> Result<EventSummaryResponse, ApiError> {
    let event_id: EventId = EventId::new(event_id);
    let event: Event = persistence
        .get_event(event_id)
        .map_err(translate_persistence_error)?;
    let tallies: Vec<ReservationTally> = persistence
        .list_reservations(event_id)
        .map_err(translate_persistence_error)?;
    let unreturned: Vec<String> = persistence
        .list_open_issues(event_id)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|issue| issue.inventory_number.to_string())
        .collect();

    Ok(EventSummaryResponse {
        event: event_response(
            &event,
            format!("Event '{}' is {}", event.name, event.status),
        ),
        reservations: tallies
            .iter()
            .map(|tally| ReservationInfo {
                stock_type_id: tally.stock_type_id.value(),
                stock_type_name: tally.stock_type_name.clone(),
                reserved: tally.reserved,
                open_issued: tally.open_issued,
                ever_issued: tally.ever_issued,
                remaining: tally.remaining(),
            })
            .collect(),
        unreturned,
    })
}

/// Reports whether an event could be cancelled now.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the event does not exist.
pub fn check_cancel(
    persistence: &mut Persistence,
    event_id: i64,
) -> Result<LifecycleCheckResponse, ApiError> {
    let event_id: EventId = EventId::new(event_id);
    let decision: GuardDecision = persistence
        .can_cancel(event_id)
        .map_err(translate_persistence_error)?;
    Ok(lifecycle_response(event_id, &decision))
}

/// Reports whether an event could be closed now.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the event does not exist.
pub fn check_close(
    persistence: &mut Persistence,
    event_id: i64,
) -> Result<LifecycleCheckResponse, ApiError> {
    let event_id: EventId = EventId::new(event_id);
    let decision: GuardDecision = persistence
        .can_close(event_id)
        .map_err(translate_persistence_error)?;
    Ok(lifecycle_response(event_id, &decision))
}

/// Cancels an event.
///
/// # Errors
///
/// Returns `ApiError::DomainRuleViolation` if equipment has already touched
/// the event or the event is no longer planned.
pub fn cancel_event(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    event_id: i64,
    actor: &Actor,
) -> Result<EventResponse, ApiError> {
    let event_id: EventId = EventId::new(event_id);
    let decision: GuardDecision = persistence
        .cancel_event(event_id)
        .map_err(translate_persistence_error)?;
    finish_transition(
        persistence,
        collaborators,
        event_id,
        &decision,
        "cancel",
        actor,
    )
}

/// Closes an event.
///
/// # Errors
///
/// Returns `ApiError::DomainRuleViolation` if a unit is still out, a
/// reservation was never met, or the event is no longer planned.
pub fn close_event(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    event_id: i64,
    actor: &Actor,
) -> Result<EventResponse, ApiError> {
    let event_id: EventId = EventId::new(event_id);
    let decision: GuardDecision = persistence
        .close_event(event_id)
        .map_err(translate_persistence_error)?;
    finish_transition(
        persistence,
        collaborators,
        event_id,
        &decision,
        "close",
        actor,
    )
}

fn finish_transition(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    event_id: EventId,
    decision: &GuardDecision,
    verb: &str,
    actor: &Actor,
) -> Result<EventResponse, ApiError> {
    if let Some(reason) = decision.reason() {
        return Err(ApiError::DomainRuleViolation {
            rule: format!("event_{verb}_guard"),
            message: format!("Cannot {verb} event {event_id}: {reason}"),
        });
    }

    let event: Event = persistence
        .get_event(event_id)
        .map_err(translate_persistence_error)?;
    let message: String = format!("Event '{}' is now {}", event.name, event.status);
    info!(event_id = %event_id, status = %event.status, "Event lifecycle transition");

    collaborators.record(&AuditEvent::new(
        actor.clone(),
        AuditAction::Update,
        "event",
        event_id.value(),
        message.clone(),
    ));
    collaborators.notify_responsible(
        persistence,
        event_id,
        "Event status changed",
        message.clone(),
    );

    Ok(event_response(&event, message))
}

// ============================================================================
// Fungible bookings & availability
// ============================================================================

/// Books a fungible type for an event.
///
/// Over-commitment never blocks the booking; it is reported in the response
/// and to the event's responsible user.
///
/// # Errors
///
/// Returns an error if the event or type does not exist or the input is invalid.
pub fn set_booking(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &SetBookingRequest,
    actor: &Actor,
) -> Result<BookingResponse, ApiError> {
    let range: DateRange = date_range(request.start_date, request.end_date)?;
    let event_id: EventId = EventId::new(request.event_id);
    let report: BookingReport = retry_on_conflict("set_booking", || {
        persistence.set_booking(
            event_id,
            EquipmentTypeId::new(request.equipment_type_id),
            request.quantity,
            range,
        )
    })
    .map_err(translate_persistence_error)?;

    let message: String = if report.over_committed {
        format!(
            "Booked {} units for {range}, but only {} are free",
            request.quantity, report.availability.available
        )
    } else {
        format!("Booked {} units for {range}", request.quantity)
    };
    collaborators.record(&AuditEvent::new(
        actor.clone(),
        AuditAction::Update,
        "booking",
        report.booking.booking_id.value(),
        message.clone(),
    ));
    if report.over_committed {
        collaborators.notify_responsible(
            persistence,
            event_id,
            "Booking over-committed",
            message.clone(),
        );
    }

    Ok(BookingResponse {
        booking_id: report.booking.booking_id.value(),
        event_id: request.event_id,
        equipment_type_id: request.equipment_type_id,
        quantity: report.booking.quantity,
        available: report.availability.available,
        over_committed: report.over_committed,
        message,
    })
}

/// Computes fungible availability over a date range.
///
/// # Errors
///
/// Returns an error if the type does not exist or the range is inverted.
pub fn get_availability(
    persistence: &mut Persistence,
    request: &AvailabilityRequest,
) -> Result<AvailabilityResponse, ApiError> {
    let range: DateRange = date_range(request.start_date, request.end_date)?;
    let report: AvailabilityReport = persistence
        .availability(EquipmentTypeId::new(request.equipment_type_id), range, None)
        .map_err(translate_persistence_error)?;

    Ok(AvailabilityResponse {
        equipment_type_id: request.equipment_type_id,
        quantity_total: report.quantity_total,
        reserved: report.reserved,
        in_repair: report.in_repair,
        available: report.available,
    })
}

/// Withdraws fungible units for repair.
///
/// # Errors
///
/// Returns an error if the type does not exist or the input is invalid.
pub fn open_repair_hold(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &OpenRepairHoldRequest,
    actor: &Actor,
) -> Result<RepairHoldResponse, ApiError> {
    let hold: RepairHold = persistence
        .open_repair_hold(
            EquipmentTypeId::new(request.equipment_type_id),
            request.quantity,
            request.start_date,
            request.end_date,
        )
        .map_err(translate_persistence_error)?;

    let message: String = format!("{} units withdrawn for repair", hold.quantity);
    collaborators.record(&AuditEvent::new(
        actor.clone(),
        AuditAction::Create,
        "repair_hold",
        hold.repair_hold_id.value(),
        message.clone(),
    ));
    Ok(repair_hold_response(&hold, message))
}

/// Marks a repair hold returned.
///
/// # Errors
///
/// Returns an error if the hold does not exist or is already returned.
pub fn close_repair_hold(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    repair_hold_id: i64,
    end_date: Date,
    actor: &Actor,
) -> Result<RepairHoldResponse, ApiError> {
    let hold: RepairHold = persistence
        .close_repair_hold(RepairHoldId::new(repair_hold_id), end_date)
        .map_err(translate_persistence_error)?;

    let message: String = format!("{} units back from repair", hold.quantity);
    collaborators.record(&AuditEvent::new(
        actor.clone(),
        AuditAction::Update,
        "repair_hold",
        repair_hold_id,
        message.clone(),
    ));
    Ok(repair_hold_response(&hold, message))
}

fn repair_hold_response(hold: &RepairHold, message: String) -> RepairHoldResponse {
    RepairHoldResponse {
        repair_hold_id: hold.repair_hold_id.value(),
        equipment_type_id: hold.equipment_type_id.value(),
        quantity: hold.quantity,
        status: hold.status.as_str().to_string(),
        start_date: hold.start_date,
        end_date: hold.end_date,
        message,
    }
}

// ============================================================================
// Reservations & issuance
// ============================================================================

/// Sets how many units of a serialized type may be issued to an event.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the event or type does not exist.
pub fn set_reservation(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &SetReservationRequest,
    actor: &Actor,
) -> Result<ReservationResponse, ApiError> {
    let event_id: EventId = EventId::new(request.event_id);
    let stock_type_id: StockTypeId = StockTypeId::new(request.stock_type_id);

    retry_on_conflict("set_reservation", || {
        persistence.set_reservation(event_id, stock_type_id, request.quantity)
    })
    .map_err(translate_persistence_error)?;
    let remaining: u32 = persistence
        .remaining_capacity(event_id, stock_type_id)
        .map_err(translate_persistence_error)?;

    let message: String = format!(
        "Reserved {} units of stock type {stock_type_id} for event {event_id}",
        request.quantity
    );
    collaborators.record(&AuditEvent::new(
        actor.clone(),
        AuditAction::Update,
        "event",
        request.event_id,
        message.clone(),
    ));

    Ok(ReservationResponse {
        event_id: request.event_id,
        stock_type_id: request.stock_type_id,
        reserved: request.quantity,
        remaining,
        message,
    })
}

/// Issues a unit from storage to an event.
///
/// # Errors
///
/// Returns `ApiError::PolicyRejection` if an issuance rule refuses, or
/// another error if the unit or event does not exist.
pub fn issue_item(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &IssueRequest,
    actor: &Actor,
) -> Result<IssuanceResponse, ApiError> {
    let item: StockItem = resolve_item(persistence, &request.item)?;
    let command: Command = Command::Issue {
        event_id: EventId::new(request.event_id),
        item_id: item.item_id,
    };
    run_command(persistence, collaborators, command, actor)
}

/// Returns a unit from an event.
///
/// # Errors
///
/// Returns `ApiError::PolicyRejection` if the unit is not out at the event.
pub fn return_item(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &ReturnRequest,
    actor: &Actor,
) -> Result<IssuanceResponse, ApiError> {
    let item: StockItem = resolve_item(persistence, &request.item)?;
    let command: Command = Command::Return {
        event_id: EventId::new(request.event_id),
        item_id: item.item_id,
    };
    run_command(persistence, collaborators, command, actor)
}

/// Moves a unit from one event to another in one step.
///
/// # Errors
///
/// Returns `ApiError::PolicyRejection` if an issuance rule refuses; the unit
/// then stays at the source event.
pub fn transfer_item(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &TransferRequest,
    actor: &Actor,
) -> Result<IssuanceResponse, ApiError> {
    let item: StockItem = resolve_item(persistence, &request.item)?;
    let command: Command = Command::Transfer {
        source_event_id: EventId::new(request.source_event_id),
        target_event_id: EventId::new(request.target_event_id),
        item_id: item.item_id,
    };
    run_command(persistence, collaborators, command, actor)
}

fn run_command(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    command: Command,
    actor: &Actor,
) -> Result<IssuanceResponse, ApiError> {
    let outcome: IssuanceOutcome<IssuanceRecord> =
        retry_on_conflict(command.name(), || persistence.execute(command, actor))
            .map_err(translate_persistence_error)?;
    let record: IssuanceRecord = match outcome {
        IssuanceOutcome::Completed(record) => record,
        IssuanceOutcome::Rejected(rejection) => return Err(rejection.into()),
    };

    let message: String = match command {
        Command::Issue { event_id, .. } => {
            format!("Issued {} to event {event_id}", record.inventory_number)
        }
        Command::Return { event_id, .. } => format!(
            "Returned {} from event {event_id} to {}",
            record.inventory_number, record.new_status
        ),
        Command::Transfer {
            source_event_id,
            target_event_id,
            ..
        } => format!(
            "Transferred {} from event {source_event_id} to event {target_event_id}",
            record.inventory_number
        ),
    };

    collaborators.record(&AuditEvent::new(
        actor.clone(),
        AuditAction::Update,
        "item",
        command.item_id().value(),
        message.clone(),
    ));
    match command {
        Command::Issue { event_id, .. } => {
            collaborators.notify_responsible(
                persistence,
                event_id,
                "Equipment issued",
                message.clone(),
            );
        }
        Command::Return { event_id, .. } => {
            collaborators.notify_responsible(
                persistence,
                event_id,
                "Equipment returned",
                message.clone(),
            );
        }
        Command::Transfer {
            source_event_id,
            target_event_id,
            ..
        } => {
            collaborators.notify_responsible(
                persistence,
                source_event_id,
                "Equipment transferred out",
                message.clone(),
            );
            collaborators.notify_responsible(
                persistence,
                target_event_id,
                "Equipment transferred in",
                message.clone(),
            );
        }
    }

    Ok(IssuanceResponse {
        item_id: command.item_id().value(),
        inventory_number: record.inventory_number.to_string(),
        command: command.name().to_string(),
        event_id: command.destination().value(),
        previous_status: record.previous_status.to_string(),
        status: record.new_status.to_string(),
        issue_id: record.opened_issue.map(|issue_id| issue_id.value()),
        message,
    })
}

// ============================================================================
// Repairs & lost items
// ============================================================================

/// Opens a repair ticket on a unit.
///
/// # Errors
///
/// Returns `ApiError::DomainRuleViolation` if a ticket is already open.
pub fn open_repair(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &OpenRepairRequest,
    actor: &Actor,
) -> Result<RepairResponse, ApiError> {
    let item: StockItem = resolve_item(persistence, &request.item)?;
    let repair: StockRepair = persistence
        .open_repair(item.item_id, &request.reason, actor)
        .map_err(translate_persistence_error)?;

    let message: String = format!(
        "Opened repair on {}: {}",
        item.inventory_number, repair.reason
    );
    repair_response(
        persistence,
        collaborators,
        &repair,
        AuditAction::Create,
        message,
        actor,
    )
}

/// Closes the open repair ticket of a unit.
///
/// # Errors
///
/// Returns `ApiError::DomainRuleViolation` if no ticket is open.
pub fn close_repair(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &CloseRepairRequest,
    actor: &Actor,
) -> Result<RepairResponse, ApiError> {
    let item: StockItem = resolve_item(persistence, &request.item)?;
    let repair: StockRepair = persistence
        .close_repair(item.item_id, request.note.as_deref(), actor)
        .map_err(translate_persistence_error)?;

    let message: String = format!("Closed repair on {}", item.inventory_number);
    repair_response(
        persistence,
        collaborators,
        &repair,
        AuditAction::Update,
        message,
        actor,
    )
}

fn repair_response(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    repair: &StockRepair,
    action: AuditAction,
    message: String,
    actor: &Actor,
) -> Result<RepairResponse, ApiError> {
    collaborators.record(&AuditEvent::new(
        actor.clone(),
        action,
        "item",
        repair.item_id.value(),
        message.clone(),
    ));
    let status = persistence
        .item_status(repair.item_id)
        .map_err(translate_persistence_error)?;

    Ok(RepairResponse {
        repair_id: repair.repair_id.value(),
        item_id: repair.item_id.value(),
        is_open: repair.is_open(),
        status: status.to_string(),
        message,
    })
}

/// Sets or clears the lost flag of a unit.
///
/// A unit that is out at an event keeps its open issue and can still be
/// returned.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the unit does not exist.
pub fn mark_lost(
    persistence: &mut Persistence,
    collaborators: &Collaborators<'_>,
    request: &MarkLostRequest,
    actor: &Actor,
) -> Result<ItemResponse, ApiError> {
    let item: StockItem = resolve_item(persistence, &request.item)?;
    let updated: StockItem = if request.lost {
        persistence.mark_item_lost(item.item_id, &request.reason, actor)
    } else {
        persistence.mark_item_found(item.item_id, &request.reason, actor)
    }
    .map_err(translate_persistence_error)?;

    let message: String = if request.lost {
        format!(
            "Reported {} lost: {}",
            updated.inventory_number, request.reason
        )
    } else {
        format!(
            "Reported {} found: {}",
            updated.inventory_number, request.reason
        )
    };
    collaborators.record(&AuditEvent::new(
        actor.clone(),
        AuditAction::Update,
        "item",
        updated.item_id.value(),
        message.clone(),
    ));

    item_response(persistence, &updated, message)
}
