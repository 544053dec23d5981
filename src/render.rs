use std::fmt::Write;

use routine_core::{ApplyReport, Product, RoutineState, Slot};
use routine_engine::SessionEvent;

/// Card text for one product: name, id, brand and category, the first two
/// concerns, then notes when present.
pub fn product_card(product: &Product) -> String {
    let mut out = format!("{}  [{}]\n  {}", product.name, product.id, product.brand);
    if !product.category.is_empty() {
        let _ = write!(out, " · {}", product.category);
    }
    let concerns: Vec<&str> = product.concerns.iter().take(2).map(String::as_str).collect();
    if !concerns.is_empty() {
        let _ = write!(out, "\n  for: {}", concerns.join(", "));
    }
    if let Some(notes) = &product.notes {
        let _ = write!(out, "\n  {notes}");
    }
    out
}

pub fn routine(state: &RoutineState) -> String {
    let mut out = String::new();
    for slot in Slot::ALL {
        let _ = writeln!(out, "{slot}:");
        let products = state.slot(slot);
        if products.is_empty() {
            out.push_str("  (empty)\n");
        }
        for p in products {
            let _ = writeln!(out, "  - {} ({})", p.name, p.id);
        }
    }
    out
}

fn report(report: &ApplyReport) -> Option<String> {
    if !report.changed() {
        return None;
    }
    let added: Vec<String> = report
        .added
        .iter()
        .map(|(slot, id)| format!("{id} → {slot}"))
        .collect();
    Some(format!("added to routine: {}", added.join(", ")))
}

/// Transcript line(s) for a session event. `None` for events the chat view
/// does not draw.
pub fn event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::UserMessage { content } => Some(format!("you> {content}")),
        SessionEvent::AssistantPending { placeholder } => Some(format!("advisor> {placeholder}")),
        SessionEvent::AssistantReplied { content, report: r } => {
            let mut out = format!("advisor> {content}");
            if let Some(line) = report(r) {
                let _ = write!(out, "\n  ({line})");
            }
            Some(out)
        }
        SessionEvent::AssistantFailed { notice } => Some(format!("advisor> {notice}")),
        SessionEvent::RoutineChanged { .. } => None,
    }
}
