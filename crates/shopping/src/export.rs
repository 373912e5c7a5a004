use crate::presenter::{ShoppingListItemRecord, ShoppingListResponse};

/// Plain-text rendering of a presented shopping list, suitable for printing
/// or pasting into a note.
pub fn render_text(response: &ShoppingListResponse) -> String {
    let summary = &response.summary;
    let mut lines = vec![
        format!(
            "Shopping list {} to {}",
            summary.date_range_start, summary.date_range_end
        ),
        format!("Items: {}", summary.total_items),
    ];

    if let Some(cost) = summary.total_estimated_cost {
        lines.push(format!("Estimated total: {cost}"));
    }

    if !summary.categories.is_empty() {
        lines.push(format!("Categories: {}", summary.categories.join(", ")));
    }

    lines.push(String::new());

    if response.items.is_empty() {
        lines.push("Nothing to buy.".to_owned());
    }

    lines.extend(response.items.iter().map(item_line));

    if !response.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings:".to_owned());
        lines.extend(
            response
                .warnings
                .iter()
                .map(|warning| format!("! {}", warning.message)),
        );
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn item_line(item: &ShoppingListItemRecord) -> String {
    let mut line = format!("- {}: {} {}", item.name, item.total_quantity, item.unit);

    if let Some(shop) = &item.shop_suggestion {
        line.push_str(&format!(" [{shop}]"));
    }

    if let Some(cost) = item.estimated_cost {
        line.push_str(&format!(" ~{cost}"));
    }

    if !item.planned_meals.is_empty() {
        line.push_str(&format!(" (used in: {})", item.planned_meals.join(", ")));
    }

    line
}
