//! Trace output formatters.

use std::fmt::Write;

use super::record::{TraceEvent, TraceRecord};

/// Formats trace records.
pub trait TraceFormatter {
    /// Formats a single record.
    fn format(&self, record: &TraceRecord) -> String;

    /// Formats several records, one per line.
    fn format_many(&self, records: &[&TraceRecord]) -> String {
        records
            .iter()
            .map(|r| self.format(r))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Human-Readable Formatter
// =============================================================================

/// Formats trace records for reading in a terminal.
#[derive(Clone, Debug, Default)]
pub struct HumanFormatter {
    /// Whether to include timestamps.
    pub show_timestamps: bool,
    /// Whether to include record IDs.
    pub show_ids: bool,
}

impl HumanFormatter {
    /// Creates a formatter with no ids or timestamps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to show timestamps.
    #[must_use]
    pub fn with_timestamps(mut self) -> Self {
        self.show_timestamps = true;
        self
    }

    /// Builder method to show record IDs.
    #[must_use]
    pub fn with_ids(mut self) -> Self {
        self.show_ids = true;
        self
    }

    #[allow(clippy::cast_precision_loss)]
    fn format_timestamp(ns: u64) -> String {
        let us = ns / 1000;
        if us >= 1_000_000 {
            format!("{:.3}s", us as f64 / 1_000_000.0)
        } else if us >= 1000 {
            format!("{:.3}ms", us as f64 / 1000.0)
        } else {
            format!("{us}us")
        }
    }

    fn by(plugin: Option<&String>) -> String {
        plugin.map(|p| format!(" ({p})")).unwrap_or_default()
    }
}

impl TraceFormatter for HumanFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        let mut prefix = String::new();
        if self.show_ids {
            let _ = write!(prefix, "[{:06}] ", record.id);
        }
        let _ = write!(prefix, "C{:04} ", record.cycle);
        if self.show_timestamps {
            let _ = write!(
                prefix,
                "{:>10} ",
                Self::format_timestamp(record.timestamp_ns)
            );
        }

        let line = match &record.event {
            TraceEvent::CycleStart { cycle, input } => {
                format!("=== CYCLE {cycle} START {input:?} ===")
            }
            TraceEvent::CycleEnd {
                cycle,
                failures,
                mutated,
            } => {
                let status = if *failures == 0 {
                    "OK".to_string()
                } else {
                    format!("{failures} FAILED")
                };
                let changed = if *mutated { ", world changed" } else { "" };
                format!("=== CYCLE {cycle} END ({status}{changed}) ===")
            }
            TraceEvent::Parsed { mood, events } => {
                format!("  PARSED {mood}, {events} event(s)")
            }
            TraceEvent::MoodRejected { mood } => format!("  REJECTED {mood}"),
            TraceEvent::ParseFailed { message } => format!("  UNPARSEABLE {message}"),
            TraceEvent::Dispatched {
                predicate,
                plugin,
                specificity,
            } => format!("  DISPATCH {predicate} -> {plugin} [{specificity}]"),
            TraceEvent::DispatchFailed { predicate, message } => {
                format!("  NO HANDLER {predicate}: {message}")
            }
            TraceEvent::HandlerFailed {
                predicate,
                plugin,
                message,
            } => format!("  FAILED {predicate} in {plugin}: {message}"),
            TraceEvent::EntityCreated { entity, plugin } => {
                format!("    NEW{} {entity}", Self::by(plugin.as_ref()))
            }
            TraceEvent::ValueWritten {
                entity,
                value,
                plugin,
            } => format!("    VALUE{} {entity} = {value:?}", Self::by(plugin.as_ref())),
            TraceEvent::FactAsserted { predicate, plugin } => {
                format!("    ASSERT{} {predicate}", Self::by(plugin.as_ref()))
            }
            TraceEvent::FactsRetracted {
                predicate,
                count,
                plugin,
            } => format!("    RETRACT ({plugin}) {predicate} x{count}"),
            TraceEvent::DescriptionRefreshed { events } => {
                format!("  DESCRIBED {events} event(s)")
            }
            TraceEvent::SetupFinished {
                plugins,
                symbols,
                words,
            } => format!("SETUP {plugins} plugin(s), {symbols} symbol(s), {words} word(s)"),
        };

        format!("{prefix}{line}")
    }
}

// =============================================================================
// JSON Formatter
// =============================================================================

/// Formats trace records as JSON objects.
#[derive(Clone, Debug, Default)]
pub struct JsonFormatter {
    /// Whether `format_many` puts each record on its own line.
    pub pretty: bool,
}

impl JsonFormatter {
    /// Creates a compact JSON formatter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method for one record per line in `format_many`.
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn string(s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => {
                    let _ = write!(out, "\\u{:04x}", c as u32);
                }
                c => out.push(c),
            }
        }
        out.push('"');
        out
    }

    fn plugin(plugin: Option<&String>) -> String {
        plugin
            .map(|p| format!(",\"plugin\":{}", Self::string(p)))
            .unwrap_or_default()
    }
}

impl TraceFormatter for JsonFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        let s = Self::string;
        let data = match &record.event {
            TraceEvent::CycleStart { cycle, input } => {
                format!("\"cycle\":{cycle},\"input\":{}", s(input))
            }
            TraceEvent::CycleEnd {
                cycle,
                failures,
                mutated,
            } => format!("\"cycle\":{cycle},\"failures\":{failures},\"mutated\":{mutated}"),
            TraceEvent::Parsed { mood, events } => {
                format!("\"mood\":\"{mood}\",\"events\":{events}")
            }
            TraceEvent::MoodRejected { mood } => format!("\"mood\":\"{mood}\""),
            TraceEvent::ParseFailed { message } => format!("\"message\":{}", s(message)),
            TraceEvent::Dispatched {
                predicate,
                plugin,
                specificity,
            } => format!(
                "\"predicate\":{},\"plugin\":{},\"specificity\":{specificity}",
                s(predicate),
                s(plugin)
            ),
            TraceEvent::DispatchFailed { predicate, message } => format!(
                "\"predicate\":{},\"message\":{}",
                s(predicate),
                s(message)
            ),
            TraceEvent::HandlerFailed {
                predicate,
                plugin,
                message,
            } => format!(
                "\"predicate\":{},\"plugin\":{},\"message\":{}",
                s(predicate),
                s(plugin),
                s(message)
            ),
            TraceEvent::EntityCreated { entity, plugin } => {
                format!("\"entity\":\"{entity}\"{}", Self::plugin(plugin.as_ref()))
            }
            TraceEvent::ValueWritten {
                entity,
                value,
                plugin,
            } => format!(
                "\"entity\":\"{entity}\",\"value\":{}{}",
                s(value),
                Self::plugin(plugin.as_ref())
            ),
            TraceEvent::FactAsserted { predicate, plugin } => format!(
                "\"predicate\":{}{}",
                s(predicate),
                Self::plugin(plugin.as_ref())
            ),
            TraceEvent::FactsRetracted {
                predicate,
                count,
                plugin,
            } => format!(
                "\"predicate\":{},\"count\":{count},\"plugin\":{}",
                s(predicate),
                s(plugin)
            ),
            TraceEvent::DescriptionRefreshed { events } => format!("\"events\":{events}"),
            TraceEvent::SetupFinished {
                plugins,
                symbols,
                words,
            } => format!("\"plugins\":{plugins},\"symbols\":{symbols},\"words\":{words}"),
        };

        format!(
            "{{\"id\":{},\"cycle\":{},\"timestamp_ns\":{},\"type\":\"{}\",{data}}}",
            record.id,
            record.cycle,
            record.timestamp_ns,
            record.event_type()
        )
    }

    fn format_many(&self, records: &[&TraceRecord]) -> String {
        let items: Vec<_> = records.iter().map(|r| self.format(r)).collect();
        if self.pretty {
            format!("[\n  {}\n]", items.join(",\n  "))
        } else {
            format!("[{}]", items.join(","))
        }
    }
}
