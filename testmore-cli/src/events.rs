//! Tracing configuration for the `testmore` command.

use std::{collections::HashSet, fmt::Display};

use testmore_core::trace_categories;
use tracing_subscriber::{
    Layer, Registry, filter::Targets, layer::SubscriberExt, reload::Handle,
    util::SubscriberInitExt,
};

use crate::error::Error;

/// Type of event to trace.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceEvent {
    /// Traces assertion outcomes.
    #[clap(name = "assert")]
    Assert,
    /// Traces file comparisons.
    #[clap(name = "diff")]
    Diff,
    /// Traces glob and regex matching.
    #[clap(name = "pattern")]
    Pattern,
    /// Traces TAP output.
    #[clap(name = "report")]
    Report,
}

impl Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assert => write!(f, "assert"),
            Self::Diff => write!(f, "diff"),
            Self::Pattern => write!(f, "pattern"),
            Self::Report => write!(f, "report"),
        }
    }
}

/// Tracks which trace events are enabled, and applies changes to the installed subscriber.
#[derive(Default)]
pub struct TraceEventConfig {
    enabled_trace_events: HashSet<TraceEvent>,
    disabled_trace_events: HashSet<TraceEvent>,
    handle: Option<Handle<Targets, Registry>>,
}

impl TraceEventConfig {
    /// Installs a tracing subscriber writing to stderr, with debug output for the given
    /// events. Disabled events stay disabled even if later enabled.
    ///
    /// # Arguments
    ///
    /// * `enabled_events` - Events to trace at debug level.
    /// * `disabled_events` - Events never to trace at debug level.
    pub fn init(enabled_events: &[TraceEvent], disabled_events: &[TraceEvent]) -> Self {
        let disabled_trace_events: HashSet<TraceEvent> = disabled_events.iter().copied().collect();
        let enabled_trace_events: HashSet<TraceEvent> = enabled_events
            .iter()
            .filter(|event| !disabled_trace_events.contains(event))
            .copied()
            .collect();

        let mut config = Self {
            enabled_trace_events,
            disabled_trace_events,
            ..Default::default()
        };

        let filter = config.compose_filter();

        // Reloadable so that events named in the config file can be enabled after startup.
        let (reload_filter, handle) = tracing_subscriber::reload::Layer::new(filter);

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
            .with_filter(reload_filter);

        if tracing_subscriber::registry()
            .with(layer)
            .try_init()
            .is_ok()
        {
            config.handle = Some(handle);
        } else {
            eprintln!("warning: failed to initialize tracing.");
        }

        config
    }

    fn compose_filter(&self) -> Targets {
        let mut filter =
            Targets::new().with_default(tracing_subscriber::filter::LevelFilter::INFO);

        for event in &self.enabled_trace_events {
            let target = match event {
                TraceEvent::Assert => trace_categories::ASSERT,
                TraceEvent::Diff => trace_categories::DIFF,
                TraceEvent::Pattern => trace_categories::PATTERN,
                TraceEvent::Report => trace_categories::REPORT,
            };

            filter = filter.with_target(target, tracing::Level::DEBUG);
        }

        filter
    }

    /// Returns the events currently traced at debug level.
    pub const fn enabled_events(&self) -> &HashSet<TraceEvent> {
        &self.enabled_trace_events
    }

    /// Enables debug tracing for an event, unless it was explicitly disabled.
    pub fn enable(&mut self, event: TraceEvent) -> Result<(), Error> {
        if self.disabled_trace_events.contains(&event) {
            return Ok(());
        }

        // Don't bother to reload config if nothing has changed.
        if !self.enabled_trace_events.insert(event) {
            return Ok(());
        }

        self.reload_filter()
    }

    fn reload_filter(&self) -> Result<(), Error> {
        let Some(handle) = &self.handle else {
            return Err(Error::TracingNotInitialized);
        };

        handle
            .reload(self.compose_filter())
            .map_err(|_| Error::TracingReload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn disabled_events_win() {
        let mut config = TraceEventConfig {
            disabled_trace_events: [TraceEvent::Pattern].into_iter().collect(),
            ..Default::default()
        };

        // Disabled events are ignored before the subscriber is ever consulted.
        assert!(config.enable(TraceEvent::Pattern).is_ok());
        assert!(config.enabled_events().is_empty());

        // Without an installed subscriber there is nothing to reload.
        assert!(matches!(
            config.enable(TraceEvent::Diff),
            Err(Error::TracingNotInitialized)
        ));
        assert!(config.enabled_events().contains(&TraceEvent::Diff));
    }

    #[test]
    fn event_names() {
        assert_eq!(TraceEvent::Assert.to_string(), "assert");
        assert_eq!(TraceEvent::Report.to_string(), "report");
    }
}
