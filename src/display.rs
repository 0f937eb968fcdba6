//! Text front panel: the trace table, register summary and memory dump listing.

use std::fmt::{self, Write};

use crate::machine::TraceStep;
use crate::registers::{Flag, Registers};
use crate::utils::join_word;
use crate::word::Word;

pub const TRACE_HEADER:&str = " addr   cmd  |  AC   DR   BR   CR   PS   IP   IR   SP   AR  C V Z N | \n";

/// Address-sized registers are shown with three digits.
fn pointer(word: &Word) -> String {
    match word.to_unsigned() {
        Ok(value) => format!("{:03X}", value),
        Err(_) => "???".to_string(),
    }
}

fn flag_char(registers: &Registers, flag: Flag) -> char {
    match registers.flag(flag) {
        Ok(true) => '+',
        Ok(false) => '0',
        Err(_) => '?',
    }
}

pub fn trace_row<I: fmt::Display>(step: &TraceStep<'_, I>) -> String {
    let r = step.registers;
    format!(
        "0x{:03X} - {} | {} {} {} {} {}  {} {}  {}  {} {} {} {} {} | {}\n",
        step.address,
        step.opcode,
        r.accumulator,
        r.data,
        r.buffer,
        r.command,
        r.program_state,
        pointer(&r.instruction_pointer),
        r.input,
        pointer(&r.stack_pointer),
        pointer(&r.address),
        flag_char(r, Flag::Carry),
        flag_char(r, Flag::Overflow),
        flag_char(r, Flag::Zero),
        flag_char(r, Flag::Sign),
        step.instruction,
    )
}

pub fn register_summary(registers: &Registers) -> String {
    let mut out = String::new();
    let named = [
        ("AC", &registers.accumulator),
        ("DR", &registers.data),
        ("BR", &registers.buffer),
        ("CR", &registers.command),
        ("PS", &registers.program_state),
        ("IP", &registers.instruction_pointer),
        ("IR", &registers.input),
        ("SP", &registers.stack_pointer),
        ("AR", &registers.address),
    ];
    for (name, word) in named.iter() {
        let _ = writeln!(out, "{} = {}", name, word);
    }
    let flags: Vec<String> = Flag::ALL
        .iter()
        .map(|flag| format!("{:?}={}", flag, flag_char(registers, *flag)))
        .collect();
    let _ = writeln!(out, "{}", flags.join(" "));
    out
}

/// Hex listing of an image, `per_row` items per line.
///
/// With `words` set the items are big-endian cells and rows are labelled with cell
/// addresses; otherwise they are single bytes labelled with byte offsets.
pub fn view_bin(image: &[u8], per_row: usize, words: bool) -> String {
    let mut out = String::new();
    let per_row = per_row.max(1);
    if !words {
        for (row, chunk) in image.chunks(per_row).enumerate() {
            let _ = write!(out, "0x{:03X}:", row * per_row);
            for byte in chunk {
                let _ = write!(out, " {:02X}", byte);
            }
            out.push('\n');
        }
        return out;
    }

    for (row, chunk) in image.chunks(per_row * 2).enumerate() {
        let _ = write!(out, "0x{:03X}:", row * per_row);
        for pair in chunk.chunks(2) {
            match pair {
                [high, low] => {
                    let _ = write!(out, " {:04X}", join_word([*high, *low]));
                }
                [odd] => {
                    let _ = write!(out, " {:02X}", odd);
                }
                _ => {}
            }
        }
        out.push('\n');
    }
    out
}
