//! Terminal output for annotated events.

use chrono::{DateTime, Local, Utc};
use console::{style, Style};
use quakewatch::annotate::AnnotatedEvent;
use quakewatch::cities::NeighborResult;

/// Magnitude at or above which events are highlighted in red.
const STRONG_MAGNITUDE: f64 = 6.0;

/// Magnitude at or above which events are highlighted in yellow.
const MODERATE_MAGNITUDE: f64 = 4.5;

/// Prints one accepted snapshot: a header line, then one block per event.
pub fn print_batch(generated_at: Option<DateTime<Utc>>, events: &[AnnotatedEvent]) {
    let generated = generated_at
        .map(format_local_time)
        .unwrap_or_else(|| "unknown time".to_string());

    println!();
    println!(
        "{}",
        style(format!(
            "── Feed generated {} ({} events) ──",
            generated,
            events.len()
        ))
        .bold()
    );

    if events.is_empty() {
        println!("  No events in feed");
        return;
    }

    for event in events {
        println!("{}", event_line(event));
        if !event.nearest.is_empty() {
            println!("      near {}", event.nearest_summary());
        }
    }
}

/// One-line event summary: local time, magnitude, depth, place.
pub fn event_line(annotated: &AnnotatedEvent) -> String {
    let event = &annotated.event;
    let magnitude = format!("{:>5}", format_magnitude(event.magnitude));
    let place = event.place.as_deref().unwrap_or("(unnamed location)");

    format!(
        "  {}  {}  {:>6.1} km deep  {}",
        format_local_time(event.timestamp),
        magnitude_style(event.magnitude).apply_to(magnitude),
        event.depth_km,
        place
    )
}

/// Ranked neighbor line for the `nearest` command.
pub fn neighbor_line(rank: usize, neighbor: &NeighborResult) -> String {
    format!(
        "  {:>2}. {:<32} {:>9.1} km",
        rank,
        neighbor.point.label,
        neighbor.distance_km()
    )
}

/// `M4.5`, or `M?` when the feed has no magnitude.
pub fn format_magnitude(magnitude: Option<f64>) -> String {
    match magnitude {
        Some(m) => format!("M{:.1}", m),
        None => "M?".to_string(),
    }
}

/// Timestamp in the local time zone.
pub fn format_local_time(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn magnitude_style(magnitude: Option<f64>) -> Style {
    match magnitude {
        Some(m) if m >= STRONG_MAGNITUDE => Style::new().red().bold(),
        Some(m) if m >= MODERATE_MAGNITUDE => Style::new().yellow(),
        _ => Style::new(),
    }
}
