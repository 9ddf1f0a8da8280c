// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gearbook_audit::AuditAction;

use super::helpers::TestContext;
use crate::{
    AddKitComponentRequest, ApiError, Collaborators, CreateCategoryRequest, CreateItemRequest,
    ItemRef, MarkLostRequest, add_kit_component, create_category, create_item, get_item,
    get_kit, mark_lost,
};

#[test]
fn test_catalog_creation_is_audited() {
    let ctx = TestContext::new();

    let subjects: Vec<(AuditAction, String)> = ctx
        .audit
        .events()
        .into_iter()
        .map(|event| (event.action, event.subject_type))
        .collect();
    assert_eq!(
        subjects,
        vec![
            (AuditAction::Create, String::from("category")),
            (AuditAction::Create, String::from("stock_type")),
        ]
    );
}

#[test]
fn test_subcategory_with_unknown_parent_is_not_found() {
    let mut ctx = TestContext::new();
    let collaborators = Collaborators::new(&ctx.audit, &ctx.notifier);

    let err: ApiError = create_category(
        &mut ctx.persistence,
        &collaborators,
        &CreateCategoryRequest {
            name: String::from("Spots"),
            parent_id: Some(999),
        },
        &ctx.actor,
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_blank_inventory_number_is_invalid() {
    let mut ctx = TestContext::new();
    let collaborators = Collaborators::new(&ctx.audit, &ctx.notifier);

    let err: ApiError = create_item(
        &mut ctx.persistence,
        &collaborators,
        &CreateItemRequest {
            stock_type_id: ctx.stock_type_id,
            inventory_number: String::from("   "),
            comment: None,
            photo: None,
        },
        &ctx.actor,
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "inventory_number"));
}

#[test]
fn test_duplicate_inventory_number_conflicts() {
    let mut ctx = TestContext::new();
    ctx.item("MH-001");
    let collaborators = Collaborators::new(&ctx.audit, &ctx.notifier);

    let err: ApiError = create_item(
        &mut ctx.persistence,
        &collaborators,
        &CreateItemRequest {
            stock_type_id: ctx.stock_type_id,
            inventory_number: String::from("MH-001"),
            comment: None,
            photo: None,
        },
        &ctx.actor,
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_kit_components_in_order() {
    let mut ctx = TestContext::new();
    let case: i64 = ctx.item("CASE-1");
    let first: i64 = ctx.item("MH-001");
    let second: i64 = ctx.item("MH-002");

    for component in [first, second] {
        let collaborators = Collaborators::new(&ctx.audit, &ctx.notifier);
        add_kit_component(
            &mut ctx.persistence,
            &collaborators,
            &AddKitComponentRequest {
                parent: ItemRef::InventoryNumber(String::from("CASE-1")),
                component: ItemRef::Id(component),
            },
            &ctx.actor,
        )
        .unwrap();
    }

    let kit = get_kit(&mut ctx.persistence, &ItemRef::Id(case)).unwrap();
    assert_eq!(kit.component_ids, vec![first, second]);

    let collaborators = Collaborators::new(&ctx.audit, &ctx.notifier);
    let err: ApiError = add_kit_component(
        &mut ctx.persistence,
        &collaborators,
        &AddKitComponentRequest {
            parent: ItemRef::Id(first),
            component: ItemRef::Id(case),
        },
        &ctx.actor,
    )
    .unwrap_err();
    let ApiError::DomainRuleViolation { rule, .. } = &err else {
        panic!("expected a domain rule violation, got {err:?}");
    };
    assert_eq!(rule, "kit_structure");
}

#[test]
fn test_lost_and_found_reported_in_item_view() {
    let mut ctx = TestContext::new();
    let item_id: i64 = ctx.item("MH-001");
    let collaborators = Collaborators::new(&ctx.audit, &ctx.notifier);

    let lost = mark_lost(
        &mut ctx.persistence,
        &collaborators,
        &MarkLostRequest {
            item: ItemRef::Id(item_id),
            lost: true,
            reason: String::from("missing after load-out"),
        },
        &ctx.actor,
    )
    .unwrap();
    assert!(lost.is_lost);
    assert_eq!(lost.status, "lost");

    mark_lost(
        &mut ctx.persistence,
        &collaborators,
        &MarkLostRequest {
            item: ItemRef::Id(item_id),
            lost: false,
            reason: String::from("found in van"),
        },
        &ctx.actor,
    )
    .unwrap();
    let item = get_item(&mut ctx.persistence, &ItemRef::Id(item_id)).unwrap();
    assert!(!item.is_lost);
    assert_eq!(item.status, "storage");
}
