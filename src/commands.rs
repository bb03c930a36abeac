//! Command metadata for tab completion and help

/// Information about a browser command
#[derive(Debug, Clone, Copy)]
pub struct CommandInfo {
    /// Token the user types
    pub name: &'static str,
    /// Usage line, including the argument placeholder if any
    pub usage: &'static str,
    /// One-line description shown in help and completion
    pub summary: &'static str,
    /// Whether the command takes an argument
    pub takes_arg: bool,
}

const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "?",
        usage: "?",
        summary: "List all top-level nodes",
        takes_arg: false,
    },
    CommandInfo {
        name: "??",
        usage: "??",
        summary: "Recursively expand all paths",
        takes_arg: false,
    },
    CommandInfo {
        name: "/f",
        usage: "/f WORD",
        summary: "Case-insensitive filter paths by WORD",
        takes_arg: true,
    },
    CommandInfo {
        name: "/F",
        usage: "/F WORD",
        summary: "Case-sensitive filter paths by WORD",
        takes_arg: true,
    },
    CommandInfo {
        name: "/k",
        usage: "/k TERM",
        summary: "Search for TERM in JSON values",
        takes_arg: true,
    },
    CommandInfo {
        name: "/ks",
        usage: "/ks",
        summary: "Save the results of the previous /k search",
        takes_arg: false,
    },
    CommandInfo {
        name: "/kl",
        usage: "/kl",
        summary: "List search results saved this session",
        takes_arg: false,
    },
    CommandInfo {
        name: "/p",
        usage: "/p PATH",
        summary: "Print the JSON value at PATH",
        takes_arg: true,
    },
    CommandInfo {
        name: "/h",
        usage: "/h",
        summary: "Display help message",
        takes_arg: false,
    },
    CommandInfo {
        name: "%",
        usage: "%",
        summary: "Exit the browser",
        takes_arg: false,
    },
];

/// Registry of all browser commands
pub struct CommandRegistry {
    commands: &'static [CommandInfo],
}

impl CommandRegistry {
    /// Create the registry over the fixed command table
    pub fn new() -> Self {
        Self { commands: COMMANDS }
    }

    /// Every command, in help order
    pub fn all(&self) -> &'static [CommandInfo] {
        self.commands
    }

    /// Commands whose name starts with `prefix`, in table order
    pub fn get_completions(&self, prefix: &str) -> Vec<&'static CommandInfo> {
        self.commands
            .iter()
            .filter(|info| info.name.starts_with(prefix))
            .collect()
    }

    /// Exact lookup by name
    pub fn get_command(&self, name: &str) -> Option<&'static CommandInfo> {
        self.commands.iter().find(|info| info.name == name)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
