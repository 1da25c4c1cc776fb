pub(crate) mod common;

mod generate;

use super::CommandDescriptor;

const COMMANDS: &[CommandDescriptor] = &[CommandDescriptor {
    name: "generate",
    aliases: &["gen"],
    parser: generate::parse,
}];

pub(crate) fn descriptors() -> &'static [CommandDescriptor] {
    COMMANDS
}
