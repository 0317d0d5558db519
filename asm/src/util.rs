use arch::op;
use color_print::cprintln;
use m11asm::{
    ast::{Body, Command, Program},
    layout::command_size,
    Generated,
};

/// A command in assembler syntax, e.g. `MOV #12, 4(R1)`.
pub fn command_text(command: &Command) -> String {
    if let Body::Raw(word) = command.body {
        return format!(".WORD {:06o}", word);
    }
    let name = op::mnemonic(command.opcode)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{:06o}", command.opcode));
    let operands = command
        .operands()
        .map(|operand| operand.to_string())
        .collect::<Vec<_>>();
    if operands.is_empty() {
        name
    } else {
        format!("{} {}", name, operands.join(", "))
    }
}

pub fn print_listing(program: &Program, generated: &Generated) {
    let mut offset = 0;
    for (id, command) in program.iter() {
        let addr = generated.layout.address(id);
        // bindings that survived redefinition
        for name in generated.layout.labels().at(addr) {
            cprintln!("{:29}| {:>4}: <g>{}:</>", "", command.line, name);
        }
        let size = command_size(command) as usize;
        let words = generated
            .words
            .get(offset..offset + size)
            .unwrap_or_default()
            .iter()
            .map(|word| format!("{:06o}", word))
            .collect::<Vec<_>>()
            .join(" ");
        offset += size;
        cprintln!(
            "<c>[{:06o}]</> {:<20} | {:>4}:   {}",
            addr,
            words,
            command.line,
            command_text(command)
        );
    }
    println!("-----------------------------+-----------------------------------------");
}
