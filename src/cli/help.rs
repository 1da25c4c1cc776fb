use std::fmt::Write;

use crate::config::CONFIG_BASENAME;
use crate::logging::{FORMAT_ENV, LEVEL_ENV};

#[derive(Debug, Clone)]
struct OptionGuide {
    flag: &'static str,
    description: &'static str,
}

#[derive(Debug, Clone)]
struct CommandGuide {
    names: &'static [&'static str],
    summary: &'static str,
    usage: &'static [&'static str],
    options: &'static [OptionGuide],
    examples: &'static [&'static str],
}

const GLOBAL_OPTIONS: &[OptionGuide] = &[
    OptionGuide {
        flag: "-h, --help",
        description: "Show contextual help information.",
    },
    OptionGuide {
        flag: "-V, --version",
        description: "Print the tasksynth version.",
    },
];

const COMMAND_GUIDES: &[CommandGuide] = &[
    CommandGuide {
        names: &["generate", "gen"],
        summary: "Synthesize cancellable overloads and postfix await wrappers from a snapshot.",
        usage: &["tasksynth generate <snapshot.json> [options]"],
        options: &[
            OptionGuide {
                flag: "-o, --out <dir>",
                description: "Directory receiving generated files (defaults to ./generated).",
            },
            OptionGuide {
                flag: "-c, --config <file>",
                description: "Generator configuration; otherwise tasksynth.yaml is searched upwards from the snapshot.",
            },
            OptionGuide {
                flag: "--no-cancellable",
                description: "Skip cancellable overload generation.",
            },
            OptionGuide {
                flag: "--no-postfix",
                description: "Skip postfix await wrappers and their support files.",
            },
            OptionGuide {
                flag: "--runtime-namespace <ns>",
                description: "Namespace of the cancellable result types and support files.",
            },
            OptionGuide {
                flag: "--stdout",
                description: "Print fragments to stdout instead of writing files.",
            },
            OptionGuide {
                flag: "--log-format <format>",
                description: "Select log output format (auto, text, json).",
            },
            OptionGuide {
                flag: "--log-level <level>",
                description: "Set log verbosity (error, warn, info, debug, trace).",
            },
            OptionGuide {
                flag: "--trace",
                description: "Log every pipeline stage at trace level.",
            },
        ],
        examples: &[
            "tasksynth generate obj/snapshot.json --out obj/generated",
            "tasksynth generate snapshot.json --no-postfix --stdout",
        ],
    },
    CommandGuide {
        names: &["help"],
        summary: "Show general help or help for one command.",
        usage: &["tasksynth help [command]"],
        options: &[],
        examples: &["tasksynth help generate"],
    },
    CommandGuide {
        names: &["version", "--version", "-V"],
        summary: "Display the tasksynth version.",
        usage: &["tasksynth --version", "tasksynth version"],
        options: &[],
        examples: &["tasksynth --version"],
    },
];

pub(crate) fn render_general_help() -> String {
    let mut out = String::new();
    out.push_str("tasksynth – task API source synthesis\n\n");
    out.push_str("USAGE:\n  tasksynth <command> [options]\n\n");
    out.push_str("COMMANDS:\n");
    for guide in COMMAND_GUIDES {
        let canonical = guide.names[0];
        let _ = writeln!(out, "  {:11} {}", canonical, guide.summary);
    }
    out.push('\n');
    out.push_str("GLOBAL OPTIONS:\n");
    for option in GLOBAL_OPTIONS {
        let _ = writeln!(out, "  {:18} {}", option.flag, option.description);
    }
    out.push('\n');
    out.push_str("ENVIRONMENT:\n");
    let _ = writeln!(out, "  {FORMAT_ENV:22} Default log format.");
    let _ = writeln!(out, "  {LEVEL_ENV:22} Default log level.");
    out.push('\n');
    let _ = writeln!(
        out,
        "Settings are read from {CONFIG_BASENAME} when present."
    );
    out.push_str("Use `tasksynth help <command>` to view detailed usage and examples.");
    out.push('\n');
    out
}

pub(crate) fn render_command_help(topic: &str) -> Option<String> {
    let guide = find_guide(topic)?;
    let mut out = String::new();
    let canonical = guide.names[0];
    let _ = writeln!(out, "tasksynth {canonical} – {}", guide.summary);
    out.push('\n');

    out.push_str("USAGE:\n");
    for usage in guide.usage {
        let _ = writeln!(out, "  {usage}");
    }

    if guide.names.len() > 1 {
        out.push('\n');
        out.push_str("ALIASES:\n");
        for alias in &guide.names[1..] {
            let _ = writeln!(out, "  {alias}");
        }
    }

    if !guide.options.is_empty() {
        out.push('\n');
        out.push_str("OPTIONS:\n");
        for option in guide.options {
            let _ = writeln!(out, "  {:26} {}", option.flag, option.description);
        }
    }

    if !guide.examples.is_empty() {
        out.push('\n');
        out.push_str("EXAMPLES:\n");
        for example in guide.examples {
            let _ = writeln!(out, "  {example}");
        }
    }

    out.push('\n');
    out.push_str("All commands accept `-h`/`--help` for contextual guidance.");
    out.push('\n');
    Some(out)
}

pub(crate) fn available_topics() -> impl Iterator<Item = &'static str> {
    COMMAND_GUIDES.iter().map(|guide| guide.names[0])
}

pub(crate) fn format_unknown_topic(topic: &str) -> String {
    let mut known = available_topics().collect::<Vec<_>>();
    known.sort_unstable();
    format!(
        "unknown help topic '{topic}'; available commands: {}",
        known.join(", ")
    )
}

fn find_guide(topic: &str) -> Option<&'static CommandGuide> {
    COMMAND_GUIDES.iter().find(|guide| {
        guide
            .names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(topic))
    })
}
