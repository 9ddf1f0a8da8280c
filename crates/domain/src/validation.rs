// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{ItemId, KitComponent};

/// Validates that a booking or hold quantity is positive.
///
/// # Errors
///
/// Returns `DomainError::ZeroQuantity` if `quantity` is zero.
pub const fn validate_positive_quantity(
    quantity: u32,
    context: &'static str,
) -> Result<(), DomainError> {
    if quantity == 0 {
        return Err(DomainError::ZeroQuantity { context });
    }
    Ok(())
}

/// Validates a display name and returns it trimmed.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is empty after trimming.
pub fn validate_name(name: &str, field: &str) -> Result<String, DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Converts a stored quantity to the domain's unsigned form.
///
/// # Errors
///
/// Returns `DomainError::QuantityOutOfRange` if the value is negative or too large.
pub fn quantity_from_store(value: i64) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| DomainError::QuantityOutOfRange(value))
}

/// Validates adding `component` to the kit of `parent`.
///
/// Kits are one-directional groupings: an item cannot contain itself, a
/// component cannot list its parent as a component, and a component appears
/// at most once per kit.
///
/// # Arguments
///
/// * `parent` - The kit parent
/// * `component` - The item being added
/// * `parent_components` - Current components of `parent`
/// * `component_components` - Current components of `component`
///
/// # Errors
///
/// Returns an error if any of the rules above is broken.
pub fn validate_kit_component(
    parent: ItemId,
    component: ItemId,
    parent_components: &[KitComponent],
    component_components: &[KitComponent],
) -> Result<(), DomainError> {
    if parent == component {
        return Err(DomainError::SelfReferencingKit(parent));
    }
    if parent_components
        .iter()
        .any(|c| c.component_id == component)
    {
        return Err(DomainError::DuplicateKitComponent { parent, component });
    }
    if component_components
        .iter()
        .any(|c| c.component_id == parent)
    {
        return Err(DomainError::ReciprocalKit { parent, component });
    }
    Ok(())
}
