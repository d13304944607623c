//! # Platform-specific utilities
//!
//! Questo modulo centralizza la logica cross-platform per i comandi
//! esterni: interprete Python, Ghostscript e apertura file con
//! l'applicazione di sistema.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Platform-specific command manager
pub struct PlatformCommands {
    commands: HashMap<&'static str, &'static str>,
    opener: &'static [&'static str],
}

impl PlatformCommands {
    /// Get the singleton instance
    pub fn instance() -> &'static Self {
        static INSTANCE: OnceLock<PlatformCommands> = OnceLock::new();
        INSTANCE.get_or_init(Self::new)
    }

    /// Initialize platform-specific commands
    fn new() -> Self {
        let (commands, opener) = if cfg!(windows) {
            let mut commands = HashMap::new();
            commands.insert("python", "python");
            commands.insert("gs", "gswin64c");
            (
                commands,
                &["cmd", "/C", "start", ""] as &'static [&'static str],
            )
        } else {
            let mut commands = HashMap::new();
            commands.insert("python", "python3");
            commands.insert("gs", "gs");
            let opener: &'static [&'static str] = if cfg!(target_os = "macos") {
                &["open"]
            } else {
                &["xdg-open"]
            };
            (commands, opener)
        };

        Self { commands, opener }
    }

    /// Get the platform-specific command name
    pub fn get_command<'a>(&self, base_name: &'a str) -> &'a str {
        self.commands.get(base_name).unwrap_or(&base_name)
    }

    /// Command line (program + leading args) that opens a file with the
    /// system handler
    pub fn opener(&self) -> &'static [&'static str] {
        self.opener
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_commands() {
        let platform = PlatformCommands::instance();

        let python = platform.get_command("python");
        assert!(!python.is_empty());

        // Unmapped names pass through unchanged
        assert_eq!(platform.get_command("frobnicate"), "frobnicate");

        assert!(!platform.opener().is_empty());
        assert!(!platform.opener()[0].is_empty());
    }
}
