//! Table / JSON rendering.

use agenda_core::date::{DatePattern, brasilia, format_date_at};
use agenda_core::{Event, EventPage, Registration, SavedEvent, User, is_event_past};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Output {
    Table,
    Json,
}

impl Output {
    pub fn is_json(&self) -> bool {
        *self == Output::Json
    }
}

pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Dates are shown in Brasília time.
pub fn when(date: &str) -> String {
    format_date_at(Some(date), DatePattern::Long, brasilia())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub fn events(out: Output, page: &EventPage) -> Result<()> {
    if out.is_json() {
        return json(page);
    }
    if page.events.is_empty() {
        println!("No events.");
        return Ok(());
    }
    event_rows(&page.events);
    let p = &page.pagination;
    println!();
    println!("page {}/{} ({} total)", p.page, p.total_pages.max(1), p.total);
    Ok(())
}

fn event_rows(events: &[Event]) {
    println!(
        "{:26} {:32} {:30} {:10} {:>9}",
        "ID", "TITULO", "INICIO", "STATUS", "INSCRITOS"
    );
    for ev in events {
        let status = if is_event_past(Some(&ev.end_date)) {
            format!("{}*", ev.status)
        } else {
            ev.status.to_string()
        };
        println!(
            "{:26} {:32} {:30} {:10} {:>9}",
            truncate(&ev.id, 26),
            truncate(&ev.title, 32),
            when(&ev.start_date),
            status,
            ev.registrant_count
        );
    }
}

pub fn event(out: Output, ev: &Event) -> Result<()> {
    if out.is_json() {
        return json(ev);
    }
    println!("{}", ev.title);
    println!("  id:        {}", ev.id);
    println!("  status:    {}", ev.status);
    println!("  local:     {}", ev.location);
    println!("  inicio:    {}", when(&ev.start_date));
    println!("  fim:       {}", when(&ev.end_date));
    println!("  inscritos: {}", ev.registrant_count);
    if ev.requires_registration {
        println!("  requer inscrição");
    }
    if let Some(p) = &ev.promoter {
        println!("  promoter:  {} <{}>", p.name, p.email);
    }
    if let Some(reason) = &ev.rejection_reason {
        println!("  motivo:    {reason}");
    }
    if is_event_past(Some(&ev.end_date)) {
        println!("  (encerrado)");
    }
    if !ev.description.is_empty() {
        println!();
        println!("{}", ev.description);
    }
    Ok(())
}

pub fn users(out: Output, users: &[User]) -> Result<()> {
    if out.is_json() {
        return json(users);
    }
    if users.is_empty() {
        println!("No users.");
        return Ok(());
    }
    println!("{:26} {:24} {:32} {:10}", "ID", "NOME", "EMAIL", "TIPO");
    for u in users {
        println!(
            "{:26} {:24} {:32} {:10}",
            truncate(&u.id, 26),
            truncate(&u.name, 24),
            truncate(&u.email, 32),
            u.role.wire_name()
        );
    }
    Ok(())
}

pub fn saved(out: Output, items: &[SavedEvent]) -> Result<()> {
    if out.is_json() {
        return json(items);
    }
    if items.is_empty() {
        println!("No saved events.");
        return Ok(());
    }
    println!("{:26} {:32} {:30}", "EVENTO", "TITULO", "INICIO");
    for item in items {
        let (title, start) = item
            .event
            .as_ref()
            .map(|e| (truncate(&e.title, 32), when(&e.start_date)))
            .unwrap_or_default();
        println!("{:26} {:32} {:30}", truncate(&item.event_id, 26), title, start);
    }
    Ok(())
}

pub fn registrations(out: Output, items: &[Registration]) -> Result<()> {
    if out.is_json() {
        return json(items);
    }
    if items.is_empty() {
        println!("No registrations.");
        return Ok(());
    }
    println!("{:26} {:26} {:26} {:30}", "ID", "EVENTO", "USUARIO", "CRIADO");
    for r in items {
        println!(
            "{:26} {:26} {:26} {:30}",
            truncate(&r.id, 26),
            truncate(&r.event_id, 26),
            truncate(&r.user_id, 26),
            when(&r.created_at)
        );
    }
    Ok(())
}
