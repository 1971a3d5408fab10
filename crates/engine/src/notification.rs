//! Shortage notifications for customers

use crate::result::{BulkStockValidationResult, InsufficientStockNotification};

/// Turn a bulk validation into the message shown to the customer
pub fn insufficient_stock_notification(
    validation: &BulkStockValidationResult,
) -> InsufficientStockNotification {
    if validation.all_valid {
        return InsufficientStockNotification {
            title: "Stock Available".to_string(),
            message: "All items are available in the requested quantities".to_string(),
            product_messages: Vec::new(),
            suggested_actions: Vec::new(),
            can_proceed_with_available_stock: true,
        };
    }

    let mut product_messages = Vec::with_capacity(validation.failed_results.len());
    let mut suggested_actions = Vec::with_capacity(validation.failed_results.len());
    let mut can_proceed = true;

    for failed in &validation.failed_results {
        let available = failed.available_stock.max(0);
        product_messages.push(format!(
            "{}: Requested {}, but only {} available",
            failed.product_title, failed.requested_quantity, available
        ));
        if available > 0 {
            suggested_actions.push(format!("Reduce quantity to {}", available));
        } else {
            suggested_actions.push("Remove from cart — out of stock".to_string());
            can_proceed = false;
        }
    }

    InsufficientStockNotification {
        title: "Insufficient Stock".to_string(),
        message: format!(
            "{} item(s) in your order cannot be fulfilled in the requested quantity",
            validation.total_failed_products
        ),
        product_messages,
        suggested_actions,
        can_proceed_with_available_stock: can_proceed,
    }
}
