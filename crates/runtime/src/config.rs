//! Runtime configuration.
use std::env;
use std::time::Duration;

use arena_core::ArenaConfig;

/// Settings shared by every battle a [`SessionRegistry`](crate::SessionRegistry)
/// starts.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub arena: ArenaConfig,
    /// Wall-clock time between ticks. `None` disables the ticker: battles
    /// advance only through [`BattleHandle::step`](crate::BattleHandle::step).
    pub tick_interval: Option<Duration>,
    /// How long a finished battle stays queryable before it is retired.
    pub retention: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            tick_interval: Some(Duration::from_millis(100)),
            retention: Duration::from_secs(30),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_TICK_MS` - Milliseconds between ticks, `0` for manual stepping (default: 100)
    /// - `ARENA_RETENTION_SECS` - Seconds a finished battle stays queryable (default: 30)
    /// - `ARENA_EVENT_BUFFER` - Broadcast capacity per topic (default: 100)
    /// - `ARENA_COMMAND_BUFFER` - Worker command queue size (default: 32)
    /// - `ARENA_TICK_LIMIT` - Ticks before a battle ends in a stalemate (default: none)
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// raw value. Unparseable values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key);

        if let Some(ms) = parse::<u64>(read("ARENA_TICK_MS")) {
            self.tick_interval = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(secs) = parse::<u64>(read("ARENA_RETENTION_SECS")) {
            self.retention = Duration::from_secs(secs);
        }
        if let Some(capacity) = parse::<usize>(read("ARENA_EVENT_BUFFER")) {
            self.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = parse::<usize>(read("ARENA_COMMAND_BUFFER")) {
            self.command_buffer_size = capacity.max(1);
        }
        if let Some(limit) = parse::<u64>(read("ARENA_TICK_LIMIT")) {
            self.arena.tick_limit = (limit > 0).then_some(limit);
        }

        self
    }

    /// Same configuration with the ticker disabled.
    pub fn manual(mut self) -> Self {
        self.tick_interval = None;
        self
    }

    pub fn with_arena(mut self, arena: ArenaConfig) -> Self {
        self.arena = arena;
        self
    }
}

fn parse<T>(raw: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    raw?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn overrides_are_applied() {
        let config = RuntimeConfig::default().with_overrides(lookup(&[
            ("ARENA_TICK_MS", "16"),
            ("ARENA_RETENTION_SECS", "5"),
            ("ARENA_EVENT_BUFFER", "0"),
            ("ARENA_TICK_LIMIT", "9000"),
        ]));

        assert_eq!(config.tick_interval, Some(Duration::from_millis(16)));
        assert_eq!(config.retention, Duration::from_secs(5));
        assert_eq!(config.event_buffer_size, 1);
        assert_eq!(config.command_buffer_size, 32);
        assert_eq!(config.arena.tick_limit, Some(9000));
    }

    #[test]
    fn zero_tick_ms_means_manual() {
        let config = RuntimeConfig::default().with_overrides(lookup(&[("ARENA_TICK_MS", "0")]));
        assert_eq!(config.tick_interval, None);
    }

    #[test]
    fn garbage_is_ignored() {
        let config =
            RuntimeConfig::default().with_overrides(lookup(&[("ARENA_RETENTION_SECS", "soon")]));
        assert_eq!(config.retention, Duration::from_secs(30));
    }
}
